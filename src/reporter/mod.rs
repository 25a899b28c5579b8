//! Projections of a [`TestSuiteResult`](crate::model::TestSuiteResult) into output strings.
//!
//! JSON is the lossless form. The templated text form is a summary and may
//! leave out passing-case detail.

pub mod error;
pub mod json;
pub mod text;

pub use self::error::{SerializationError, TextRenderError};
pub use self::json::to_json;
pub use self::text::{to_text, TextRenderer};

use crate::configuration::constants::defaults;
use crate::configuration::settings::Settings;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub disclaimer: String,
    pub template_name: String,
    pub template_dir: Option<PathBuf>,
    pub pretty: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            disclaimer: defaults::DISCLAIMER.to_owned(),
            template_name: defaults::TEMPLATE_NAME.to_owned(),
            template_dir: None,
            pretty: true,
        }
    }
}

impl From<&Settings> for RenderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            disclaimer: settings.disclaimer.clone(),
            template_name: settings.simple_serializer_template.clone(),
            template_dir: settings.template_dir.clone(),
            pretty: settings.pretty_json,
        }
    }
}
