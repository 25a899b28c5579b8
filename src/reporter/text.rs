use crate::model::{
    NodeRef, Outcome, SerializationDetails, Statistics, TestGroup, TestSuiteResult,
};
use crate::reporter::error::TextRenderError;
use crate::reporter::RenderConfig;
use derivative::*;
use liquid::Parser;
use serde_derive::Serialize;
use std::fs;
use std::path::Path;

pub const TEMPLATE_EXTENSION: &str = "liquid";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    ("markdown", include_str!("templates/markdown.liquid")),
    ("plain", include_str!("templates/plain.liquid")),
];

const INDENT: &str = "  ";

#[derive(Serialize)]
struct TemplateInputs<'a> {
    result: ResultView<'a>,
    serialization_details: &'a SerializationDetails,
    disclaimer: &'a str,
}

#[derive(Serialize)]
struct ResultView<'a> {
    suite_identifier: &'a str,
    outcome: Outcome,
    statistics: Statistics,
    groups: &'a [TestGroup],
    rows: Vec<Row<'a>>,
    failures: Vec<Failure<'a>>,
}

#[derive(Serialize)]
struct Row<'a> {
    depth: usize,
    indent: String,
    kind: &'static str,
    name: &'a str,
    outcome: Outcome,
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct Failure<'a> {
    path: String,
    name: &'a str,
    message: Option<&'a str>,
}

impl<'a> ResultView<'a> {
    fn new(result: &'a TestSuiteResult) -> Self {
        let mut rows = Vec::new();
        let mut failures = Vec::new();
        for entry in result.entries() {
            let message = match entry.node {
                NodeRef::Case(case) => case.message(),
                NodeRef::Group(_) => None,
            };
            let outcome = entry.node.outcome();
            if let NodeRef::Case(case) = entry.node {
                if outcome == Outcome::Failed {
                    let mut path = entry.path.clone();
                    path.push(case.name());
                    failures.push(Failure {
                        path: path.join(" / "),
                        name: case.name(),
                        message,
                    });
                }
            }
            rows.push(Row {
                depth: entry.path.len(),
                indent: INDENT.repeat(entry.path.len()),
                kind: entry.node.kind(),
                name: entry.node.name(),
                outcome,
                message,
            });
        }
        Self {
            suite_identifier: result.suite_identifier(),
            outcome: result.outcome(),
            statistics: result.statistics(),
            groups: result.groups(),
            rows,
            failures,
        }
    }
}

/// Renders results through named liquid templates.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TextRenderer {
    #[derivative(Debug = "ignore")]
    parser: Parser,
}

impl TextRenderer {
    pub fn new() -> Result<Self, TextRenderError> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|err| TextRenderError::Setup(err.to_string()))?;
        Ok(Self { parser })
    }

    pub fn render(
        &self,
        result: &TestSuiteResult,
        details: &SerializationDetails,
        config: &RenderConfig,
    ) -> Result<String, TextRenderError> {
        let name = config.template_name.as_str();
        let source = load_template(name, config.template_dir.as_deref())?;
        let template = self
            .parser
            .parse(&source)
            .map_err(|err| TextRenderError::Syntax {
                name: name.to_owned(),
                message: err.to_string(),
            })?;
        let inputs = TemplateInputs {
            result: ResultView::new(result),
            serialization_details: details,
            disclaimer: &config.disclaimer,
        };
        let render_error = |err: liquid::Error| TextRenderError::Render {
            name: name.to_owned(),
            message: err.to_string(),
        };
        let globals = liquid::to_object(&inputs).map_err(render_error)?;
        template.render(&globals).map_err(render_error)
    }
}

/// Renders a human-oriented summary with the template named in `config`.
pub fn to_text(
    result: &TestSuiteResult,
    details: &SerializationDetails,
    config: &RenderConfig,
) -> Result<String, TextRenderError> {
    TextRenderer::new()?.render(result, details, config)
}

/// Looks the template up in `dir` first, then among the built-in ones.
fn load_template(name: &str, dir: Option<&Path>) -> Result<String, TextRenderError> {
    let suffix = format!(".{}", TEMPLATE_EXTENSION);
    let stem = name.strip_suffix(suffix.as_str()).unwrap_or(name);
    if let Some(dir) = dir {
        let path = dir.join(format!("{}{}", stem, suffix));
        if path.is_file() {
            debug!("Loading template '{}' from {}", name, path.display());
            return fs::read_to_string(&path).map_err(|source| TextRenderError::Io { path, source });
        }
        trace!("Template '{}' not in {}", name, dir.display());
    }
    BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == stem)
        .map(|(_, source)| (*source).to_owned())
        .ok_or_else(|| TextRenderError::TemplateNotFound {
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCase;
    use std::env;

    fn details() -> SerializationDetails {
        SerializationDetails::builder()
            .target_under_test("http://localhost:5000")
            .suite_identifier("wfs20")
            .build()
            .unwrap()
    }

    fn config(template_name: &str) -> RenderConfig {
        RenderConfig {
            template_name: template_name.to_owned(),
            disclaimer: "Not an official OGC certification".to_owned(),
            ..RenderConfig::default()
        }
    }

    fn result() -> TestSuiteResult {
        let group = TestGroup::new(
            "Capabilities",
            vec![
                TestCase::new("GetCapabilities", Outcome::Passed).into(),
                TestCase::new("DescribeFeatureType", Outcome::Failed)
                    .with_message("missing required element")
                    .into(),
            ],
        );
        TestSuiteResult::new("wfs20", vec![group])
    }

    #[test]
    fn test_markdown_surfaces_failures_and_disclaimer() {
        let text = to_text(&result(), &details(), &config("markdown")).unwrap();
        assert!(text.contains("# Test suite wfs20"));
        assert!(text.contains("**FAILED**"));
        assert!(text.contains("### Capabilities / DescribeFeatureType"));
        assert!(text.contains("missing required element"));
        assert!(text.contains("Not an official OGC certification"));
        assert!(!text.contains("INDETERMINATE"));
    }

    #[test]
    fn test_plain_template_with_extension() {
        let text = to_text(&result(), &details(), &config("plain.liquid")).unwrap();
        assert!(text.starts_with("Test suite wfs20: FAILED"));
        assert!(text.contains("* Capabilities / DescribeFeatureType"));
        assert!(text.contains("missing required element"));
    }

    #[test]
    fn test_passing_suite_has_no_failure_section() {
        let group = TestGroup::new("g", vec![TestCase::new("ok", Outcome::Passed).into()]);
        let result = TestSuiteResult::new("s", vec![group]);
        let text = to_text(&result, &details(), &config("markdown")).unwrap();
        assert!(!text.contains("## Failures"));
        assert!(!text.contains("FAILED"));
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        match to_text(&result(), &details(), &config("does-not-exist")) {
            Err(TextRenderError::TemplateNotFound { name }) => assert_eq!(name, "does-not-exist"),
            other => panic!("expected a missing template, got {:?}", other),
        }
    }

    #[test]
    fn test_template_directory_takes_precedence() {
        let dir = env::temp_dir().join(format!("cite-runner-templates-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("markdown.liquid"),
            "{{ result.outcome }} for {{ serialization_details.target_under_test }}",
        )
        .unwrap();
        fs::write(dir.join("broken.liquid"), "{{ undefined_field }}").unwrap();
        let mut config = config("markdown");
        config.template_dir = Some(dir.clone());

        let text = to_text(&result(), &details(), &config).unwrap();
        assert_eq!(text, "FAILED for http://localhost:5000");

        config.template_name = "broken".to_owned();
        match to_text(&result(), &details(), &config) {
            Err(TextRenderError::Render { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected a render error, got {:?}", other),
        }

        config.template_name = "plain".to_owned();
        assert!(to_text(&result(), &details(), &config).is_ok());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unparseable_template_is_a_syntax_error() {
        let dir = env::temp_dir().join(format!("cite-runner-syntax-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("unbalanced.liquid"), "{% if %}").unwrap();
        let mut config = config("unbalanced");
        config.template_dir = Some(dir.clone());

        let rendered = to_text(&result(), &details(), &config);
        fs::remove_dir_all(&dir).unwrap();
        match rendered {
            Err(TextRenderError::Syntax { name, .. }) => assert_eq!(name, "unbalanced"),
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_are_indented_by_depth() {
        let result = result();
        let view = ResultView::new(&result);
        let rows: Vec<(usize, &str)> = view.rows.iter().map(|row| (row.depth, row.name)).collect();
        assert_eq!(
            rows,
            vec![
                (0, "Capabilities"),
                (1, "GetCapabilities"),
                (1, "DescribeFeatureType")
            ]
        );
        assert_eq!(view.failures.len(), 1);
    }
}
