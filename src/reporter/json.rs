use crate::model::{Outcome, SerializationDetails, TestSuiteResult};
use crate::reporter::error::SerializationError;
use crate::reporter::RenderConfig;
use serde_derive::Serialize;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    result: &'a TestSuiteResult,
    outcome: Outcome,
    disclaimer: &'a str,
    #[serde(flatten)]
    details: &'a SerializationDetails,
}

/// Lossless JSON form of a result.
///
/// The disclaimer and the serialization details sit next to the result tree
/// so the same result can be rendered again with other values.
pub fn to_json(
    result: &TestSuiteResult,
    details: &SerializationDetails,
    config: &RenderConfig,
) -> Result<String, SerializationError> {
    ensure_representable(result)?;
    let report = JsonReport {
        result,
        outcome: result.outcome(),
        disclaimer: &config.disclaimer,
        details,
    };
    let serialized = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(serialized)
}

// serde_json writes non-finite floats as null, which would quietly change
// the record, so they are refused up front.
fn ensure_representable(result: &TestSuiteResult) -> Result<(), SerializationError> {
    for (path, case) in result.cases() {
        if let Some(seconds) = case.duration_seconds() {
            if !seconds.is_finite() {
                let mut field = path.join(" / ");
                if !field.is_empty() {
                    field.push_str(" / ");
                }
                field.push_str(case.name());
                field.push_str(".duration_seconds");
                return Err(SerializationError::NonFiniteNumber { field });
            }
        }
    }
    Ok(())
}
