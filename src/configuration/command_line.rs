use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::time::parse_duration;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum OutputFormat {
        Json, Text,
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Settings file. Supported: YAML, JSON, TOML, HJSON
    #[structopt(long, short = "c", parse(from_os_str), env = "CITE_RUNNER_SETTINGS")]
    pub config: Option<PathBuf>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    /// Timeout of every request to the test engine, e.g. `20s`
    #[structopt(long, parse(try_from_str = parse_duration))]
    pub network_timeout: Option<Duration>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Waits for the test engine, runs a suite and prints the parsed result
    ExecuteTestSuite {
        /// Base URL of the test engine, e.g. http://localhost:8080/teamengine
        teamengine_base_url: String,

        /// Identifier of the suite to run, e.g. ogcapi-features-1.0
        test_suite_identifier: String,

        /// Suite input as `name=value`. May be repeated
        #[structopt(long = "test-suite-input", short = "i", parse(try_from_str = parse_suite_input))]
        test_suite_inputs: Vec<(String, String)>,

        /// Write the raw engine response to this file
        #[structopt(long, parse(from_os_str))]
        persist_response: Option<PathBuf>,

        #[structopt(flatten)]
        output: OutputOpt,
    },
    /// Parses a previously saved engine response and prints the result
    ParseResult {
        /// File holding the raw engine response
        #[structopt(parse(from_os_str))]
        path: PathBuf,

        /// System that was tested, shown next to the result
        #[structopt(long)]
        target: Option<String>,

        /// Overrides the suite identifier read from the report
        #[structopt(long)]
        suite: Option<String>,

        #[structopt(flatten)]
        output: OutputOpt,
    },
}

#[derive(StructOpt, Debug)]
pub struct OutputOpt {
    /// Output representation
    #[structopt(case_insensitive = true, long, short = "f", possible_values = &OutputFormat::variants(), default_value = "json")]
    pub format: OutputFormat,

    /// Template used for text output, overrides the settings file
    #[structopt(long, short = "t")]
    pub template: Option<String>,
}

pub fn parse_suite_input(s: &str) -> Result<(String, String), String> {
    match s.find('=') {
        Some(position) if position > 0 => {
            Ok((s[..position].to_owned(), s[position + 1..].to_owned()))
        }
        _ => Err(format!("'{}' is not a name=value pair", s)),
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_input_pairs() {
        assert_eq!(
            parse_suite_input("iut=http://localhost:5000/?a=b"),
            Ok(("iut".to_owned(), "http://localhost:5000/?a=b".to_owned()))
        );
        assert_eq!(
            parse_suite_input("noauthz="),
            Ok(("noauthz".to_owned(), String::new()))
        );
        assert!(parse_suite_input("=value").is_err());
        assert!(parse_suite_input("novalue").is_err());
    }

    #[test]
    fn test_execute_test_suite_arguments() {
        let opt = Opt::from_iter(vec![
            "cite-runner",
            "--network-timeout",
            "30s",
            "execute-test-suite",
            "http://localhost:8080/teamengine",
            "ogcapi-features-1.0",
            "-i",
            "iut=http://localhost:5000",
            "-i",
            "noofcollections=-1",
            "--format",
            "text",
        ]);
        assert_eq!(opt.network_timeout, Some(Duration::from_secs(30)));
        match opt.command {
            Command::ExecuteTestSuite {
                test_suite_identifier,
                test_suite_inputs,
                output,
                ..
            } => {
                assert_eq!(test_suite_identifier, "ogcapi-features-1.0");
                assert_eq!(test_suite_inputs.len(), 2);
                assert_eq!(test_suite_inputs[1].1, "-1");
                assert_eq!(output.format, OutputFormat::Text);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
