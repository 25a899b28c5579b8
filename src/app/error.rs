use crate::parser::ReportParseError;
use crate::reporter::{SerializationError, TextRenderError};
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Request(String),
    Connection(String),
    Status { status: u16, body: String },
    Unavailable { attempts: u32 },
    Io { path: PathBuf, source: io::Error },
    Details(String),
    Parse(ReportParseError),
    Serialize(SerializationError),
    Render(TextRenderError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Parse(err) => Some(err),
            Error::Serialize(err) => Some(err),
            Error::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Request(err) => write!(f, "Cannot build request: {}", err),
            Error::Connection(err) => write!(f, "Failed to send request: {}", err),
            Error::Status { status, body } => {
                write!(f, "teamengine answered with status {}: {}", status, body)
            }
            Error::Unavailable { attempts } => {
                write!(f, "teamengine is not available after {} attempts", attempts)
            }
            Error::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Error::Details(err) => write!(f, "Incomplete serialization details: {}", err),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Serialize(err) => write!(f, "{}", err),
            Error::Render(err) => write!(f, "{}", err),
        }
    }
}

impl From<ReportParseError> for Error {
    fn from(err: ReportParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<SerializationError> for Error {
    fn from(err: SerializationError) -> Self {
        Error::Serialize(err)
    }
}

impl From<TextRenderError> for Error {
    fn from(err: TextRenderError) -> Self {
        Error::Render(err)
    }
}
