use std::fmt;

/// A duration string could not be understood.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    Syntax(String),
    UnitNotSupported(String),
}

impl ::std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(err) => write!(f, "Invalid duration: {}", err),
            Error::UnitNotSupported(unit) => write!(f, "Unit '{}' not supported", unit),
        }
    }
}
