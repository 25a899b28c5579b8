//! Turns the raw execution report of the test engine into a [`TestSuiteResult`].
//!
//! TEAM Engine answers an XML suite run with a TestNG results document. Only
//! the top-level structure is mandatory. Entries that cannot be classified
//! are kept as indeterminate cases and reported as [`LeafDecodeWarning`]s.

pub mod error;
mod testng;

pub use self::error::{LeafDecodeWarning, ReportParseError};

use crate::model::TestSuiteResult;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a report, logging every non-fatal warning.
pub fn parse(raw_report: &[u8]) -> Result<TestSuiteResult, ReportParseError> {
    let (result, warnings) = parse_with_warnings(raw_report)?;
    for warning in &warnings {
        warn!("Unrecognised report entry {}", warning);
    }
    debug!(
        "Parsed suite '{}' with {} cases",
        result.suite_identifier(),
        result.statistics().total
    );
    Ok(result)
}

pub fn parse_with_warnings(
    raw_report: &[u8],
) -> Result<(TestSuiteResult, Vec<LeafDecodeWarning>), ReportParseError> {
    let text = std::str::from_utf8(raw_report).map_err(ReportParseError::Encoding)?;
    testng::decode(text.trim_start_matches(BYTE_ORDER_MARK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = parse(&[0x3c, 0xff, 0xfe, 0x3e]);
        match result {
            Err(ReportParseError::Encoding(_)) => {}
            other => panic!("expected an encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let report = "\u{feff}<testng-results><suite name=\"s\"><test name=\"t\">\
                      <test-method status=\"PASS\" name=\"m\"/></test></suite></testng-results>";
        let result = parse(report.as_bytes()).unwrap();
        assert_eq!(result.outcome(), Outcome::Passed);
    }
}
