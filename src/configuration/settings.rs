use crate::configuration::constants::{defaults, env::SETTINGS_PREFIX};
use crate::time::parse_duration;
use config::{Config, ConfigError, Environment, File};
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings, merged from an optional settings file (YAML, JSON,
/// TOML, ...) and `CITE_RUNNER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_disclaimer")]
    pub disclaimer: String,
    #[serde(default = "default_template_name")]
    pub simple_serializer_template: String,
    #[serde(default, with = "crate::configuration::deserialize::optional_path")]
    pub template_dir: Option<PathBuf>,
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
    #[serde(
        default = "default_network_timeout",
        with = "crate::configuration::deserialize::duration"
    )]
    pub network_timeout: Duration,
    #[serde(
        default = "default_poll_interval",
        with = "crate::configuration::deserialize::duration"
    )]
    pub poll_interval: Duration,
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_teamengine_username")]
    pub teamengine_username: String,
    #[serde(default = "default_teamengine_password")]
    pub teamengine_password: String,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file));
        }
        builder
            .add_source(Environment::with_prefix(SETTINGS_PREFIX))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            disclaimer: default_disclaimer(),
            simple_serializer_template: default_template_name(),
            template_dir: None,
            pretty_json: default_pretty_json(),
            network_timeout: default_network_timeout(),
            poll_interval: default_poll_interval(),
            poll_attempts: default_poll_attempts(),
            teamengine_username: default_teamengine_username(),
            teamengine_password: default_teamengine_password(),
        }
    }
}

fn default_disclaimer() -> String {
    defaults::DISCLAIMER.to_owned()
}

fn default_template_name() -> String {
    defaults::TEMPLATE_NAME.to_owned()
}

fn default_pretty_json() -> bool {
    true
}

fn default_network_timeout() -> Duration {
    parse_duration(defaults::NETWORK_TIMEOUT).unwrap_or_else(|_| Duration::from_secs(20))
}

fn default_poll_interval() -> Duration {
    parse_duration(defaults::POLL_INTERVAL).unwrap_or_else(|_| Duration::from_secs(5))
}

fn default_poll_attempts() -> u32 {
    defaults::POLL_ATTEMPTS
}

fn default_teamengine_username() -> String {
    defaults::TEAMENGINE_USERNAME.to_owned()
}

fn default_teamengine_password() -> String {
    defaults::TEAMENGINE_PASSWORD.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.simple_serializer_template, "markdown");
        assert_eq!(settings.network_timeout, Duration::from_secs(20));
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.poll_attempts, 10);
        assert_eq!(settings.teamengine_username, "ogctest");
        assert!(settings.template_dir.is_none());
        assert!(settings.pretty_json);
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let settings = from_toml(
            r#"
            disclaimer = "custom disclaimer"
            simple_serializer_template = "plain"
            template_dir = "/etc/cite-runner/templates"
            network_timeout = "1m"
            poll_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.disclaimer, "custom disclaimer");
        assert_eq!(settings.simple_serializer_template, "plain");
        assert_eq!(
            settings.template_dir,
            Some(PathBuf::from("/etc/cite-runner/templates"))
        );
        assert_eq!(settings.network_timeout, Duration::from_secs(60));
        assert_eq!(settings.poll_attempts, 3);
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        assert!(from_toml(r#"poll_interval = "soon""#).is_err());
    }
}
