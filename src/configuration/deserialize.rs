pub mod duration {
    use crate::time::timeunit::DurationUnit;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value
            .parse::<DurationUnit>()
            .map(Duration::from)
            .map_err(|err| D::Error::custom(err.to_string()))
    }
}

pub mod optional_path {
    use serde::{Deserialize, Deserializer};
    use std::path::PathBuf;

    /// An empty string means "not set", so environment variables can clear a path.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|path| !path.is_empty()).map(PathBuf::from))
    }
}
