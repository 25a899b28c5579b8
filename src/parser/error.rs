use std::fmt;
use std::str::Utf8Error;

/// The report could not be recognised at all. No partial result exists.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportParseError {
    Encoding(Utf8Error),
    Xml(String),
    UnexpectedRoot(String),
    MissingSuite,
}

/// A single entry could not be classified. The parse carries on and the
/// entry ends up indeterminate.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDecodeWarning {
    pub path: String,
    pub reason: String,
}

impl std::error::Error for ReportParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportParseError::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ReportParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReportParseError::Encoding(err) => write!(f, "Report is not valid UTF-8: {}", err),
            ReportParseError::Xml(err) => write!(f, "Report is not well-formed XML: {}", err),
            ReportParseError::UnexpectedRoot(name) => {
                write!(f, "Expected a <testng-results> root element, found <{}>", name)
            }
            ReportParseError::MissingSuite => write!(f, "Report does not contain any <suite>"),
        }
    }
}

impl LeafDecodeWarning {
    pub fn new<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LeafDecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}
