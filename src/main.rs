#[macro_use]
extern crate log;

use chrono::Utc;
use cite_runner::app::{self, App, Error};
use cite_runner::configuration::command_line::{Command, LogLevel, Opt, OutputOpt};
use cite_runner::configuration::constants::defaults;
use cite_runner::configuration::settings::Settings;
use cite_runner::connection::http;
use cite_runner::model::{SerializationDetails, TestSuiteResult};
use cite_runner::parser;
use cite_runner::reporter::RenderConfig;
use log::LevelFilter;
use signal_hook::{iterator::Signals, SIGINT};
use std::{fs, path::PathBuf, process::exit, thread};
use structopt::StructOpt;

const IUT_INPUT: &str = "iut";

fn main() {
    let options = Opt::from_args();

    if let Err(err) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    ) {
        eprintln!("Failed to initialise logging: {}", err);
        exit(1);
    }

    match Signals::new(&[SIGINT]) {
        Ok(signals) => {
            thread::spawn(move || {
                for sig in signals.forever() {
                    info!("Received signal {:?}, stopping", sig);
                    exit(1);
                }
            });
        }
        Err(err) => warn!("Cannot register signal handler: {}", err),
    }

    let mut settings = match Settings::load(options.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            error!("Failed to load settings {}", err);
            exit(1);
        }
    };
    if let Some(timeout) = options.network_timeout {
        settings.network_timeout = timeout;
    }
    debug!("Initiated settings {:#?}", settings);

    match run(options.command, &settings) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    }
}

fn run(command: Command, settings: &Settings) -> Result<String, Error> {
    match command {
        Command::ExecuteTestSuite {
            teamengine_base_url,
            test_suite_identifier,
            test_suite_inputs,
            persist_response,
            output,
        } => {
            let client = http::client(settings.network_timeout)
                .map_err(|err| Error::Connection(err.to_string()))?;
            let app = App::new(client, &teamengine_base_url, settings);
            app.wait_for_teamengine()?;
            let raw_report = app.execute_test_suite(&test_suite_identifier, &test_suite_inputs)?;
            if let Some(path) = persist_response {
                app::persist_response(&path, &raw_report)?;
            }
            let result = parser::parse(&raw_report)?;
            let target = test_suite_inputs
                .iter()
                .find(|(name, _)| name == IUT_INPUT)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| defaults::TARGET_UNDER_TEST.to_owned());
            let details = SerializationDetails::builder()
                .target_under_test(target)
                .suite_identifier(test_suite_identifier)
                .executed_at(Utc::now())
                .build()
                .map_err(|err| Error::Details(err.to_string()))?;
            render(&result, &details, &output, settings)
        }
        Command::ParseResult {
            path,
            target,
            suite,
            output,
        } => {
            let raw_report = fs::read(&path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            let result = parser::parse(&raw_report)?;
            let details = SerializationDetails::builder()
                .target_under_test(
                    target.unwrap_or_else(|| defaults::TARGET_UNDER_TEST.to_owned()),
                )
                .suite_identifier(
                    suite.unwrap_or_else(|| result.suite_identifier().to_owned()),
                )
                .build()
                .map_err(|err| Error::Details(err.to_string()))?;
            render(&result, &details, &output, settings)
        }
    }
}

fn render(
    result: &TestSuiteResult,
    details: &SerializationDetails,
    output: &OutputOpt,
    settings: &Settings,
) -> Result<String, Error> {
    let mut config = RenderConfig::from(settings);
    if let Some(template) = &output.template {
        config.template_name = template.clone();
    }
    info!(
        "Suite '{}' finished with outcome {}",
        result.suite_identifier(),
        result.outcome()
    );
    app::render(result, details, output.format, &config)
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        // stdout carries the rendered report
        .chain(std::io::stderr());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    info!("Logging level {} enabled", level);
    Ok(())
}
