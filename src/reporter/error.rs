use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SerializationError {
    /// JSON has no representation for NaN or infinities.
    NonFiniteNumber { field: String },
    Json(serde_json::Error),
}

#[derive(Debug)]
pub enum TextRenderError {
    /// The liquid parser itself could not be set up.
    Setup(String),
    TemplateNotFound { name: String },
    Syntax { name: String, message: String },
    Render { name: String, message: String },
    Io { path: PathBuf, source: io::Error },
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializationError::Json(err) => Some(err),
            SerializationError::NonFiniteNumber { .. } => None,
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SerializationError::NonFiniteNumber { field } => {
                write!(f, "Field '{}' holds a non-finite number", field)
            }
            SerializationError::Json(err) => write!(f, "Cannot serialize result to JSON: {}", err),
        }
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Json(err)
    }
}

impl std::error::Error for TextRenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextRenderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for TextRenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TextRenderError::Setup(message) => {
                write!(f, "Cannot set up the template parser: {}", message)
            }
            TextRenderError::TemplateNotFound { name } => {
                write!(f, "Template '{}' not found", name)
            }
            TextRenderError::Syntax { name, message } => {
                write!(f, "Cannot parse template '{}': {}", name, message)
            }
            TextRenderError::Render { name, message } => {
                write!(f, "Cannot render template '{}': {}", name, message)
            }
            TextRenderError::Io { path, source } => {
                write!(f, "Cannot read template {}: {}", path.display(), source)
            }
        }
    }
}
