use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde_derive::Serialize;

pub const DEFAULT_ENGINE: &str = "teamengine";

/// Metadata attached to a parsed result at render time.
///
/// Built once per invocation and never mutated afterwards. The suite
/// identifier here is not checked against the parsed result.
#[derive(Debug, Serialize, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct SerializationDetails {
    target_under_test: String,
    suite_identifier: String,
    #[builder(default)]
    executed_at: Option<DateTime<Utc>>,
    #[builder(default = "DEFAULT_ENGINE.to_owned()")]
    engine: String,
}

impl SerializationDetails {
    pub fn builder() -> SerializationDetailsBuilder {
        SerializationDetailsBuilder::default()
    }

    pub fn target_under_test(&self) -> &str {
        &self.target_under_test
    }

    pub fn suite_identifier(&self) -> &str {
        &self.suite_identifier
    }

    pub fn executed_at(&self) -> Option<&DateTime<Utc>> {
        self.executed_at.as_ref()
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_fills_defaults() {
        let details = SerializationDetails::builder()
            .target_under_test("http://localhost:5000")
            .suite_identifier("ogcapi-features-1.0")
            .build()
            .unwrap();
        assert_eq!(details.engine(), DEFAULT_ENGINE);
        assert!(details.executed_at().is_none());
    }

    #[test]
    fn test_builder_requires_target() {
        let result = SerializationDetails::builder()
            .suite_identifier("ogcapi-features-1.0")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_serializes_as_rfc3339() {
        let executed_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let details = SerializationDetails::builder()
            .target_under_test("http://localhost:5000")
            .suite_identifier("wfs20")
            .executed_at(executed_at)
            .build()
            .unwrap();
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["executed_at"], "2024-03-01T12:30:00Z");
        assert_eq!(value["engine"], "teamengine");
    }
}
