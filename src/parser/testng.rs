use crate::model::{Outcome, TestCase, TestGroup, TestNode, TestSuiteResult};
use crate::parser::error::{LeafDecodeWarning, ReportParseError};
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_xpath::{Context, Factory, Value, XPath};

const ROOT_ELEMENT: &str = "testng-results";
const SUITE_ELEMENT: &str = "suite";
const GROUP_ELEMENTS: [&str; 3] = ["suite", "test", "class"];
const CASE_ELEMENT: &str = "test-method";
const MESSAGE_XPATH: &str = "exception/message";
const UNNAMED: &str = "<unnamed>";

/// Builds a suite result out of a TestNG results document.
pub(crate) fn decode(
    text: &str,
) -> Result<(TestSuiteResult, Vec<LeafDecodeWarning>), ReportParseError> {
    let package = sxd_document::parser::parse(text)
        .map_err(|err| ReportParseError::Xml(format!("{:?}", err)))?;
    let document = package.as_document();
    let root = document
        .root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
        .ok_or_else(|| ReportParseError::UnexpectedRoot(String::new()))?;

    let root_name = root.name().local_part();
    if root_name != ROOT_ELEMENT {
        return Err(ReportParseError::UnexpectedRoot(root_name.to_owned()));
    }

    let suites: Vec<Element> = child_elements(root)
        .filter(|element| element.name().local_part() == SUITE_ELEMENT)
        .collect();
    let mut decoder = Decoder::new();
    let result = match suites.as_slice() {
        [] => return Err(ReportParseError::MissingSuite),
        [suite] => decoder.decode_single_suite(*suite),
        _ => {
            let groups: Vec<TestGroup> = suites
                .iter()
                .map(|suite| decoder.decode_group(*suite, ""))
                .collect();
            let identifier = groups
                .iter()
                .map(TestGroup::name)
                .collect::<Vec<_>>()
                .join(",");
            TestSuiteResult::new(identifier, groups)
        }
    };
    Ok((result, decoder.warnings))
}

fn child_elements<'d>(element: Element<'d>) -> impl Iterator<Item = Element<'d>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Element(element) => Some(element),
            _ => None,
        })
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{} / {}", parent, name)
    }
}

fn status_outcome(status: &str) -> Option<Outcome> {
    match status {
        "PASS" => Some(Outcome::Passed),
        "FAIL" => Some(Outcome::Failed),
        "SKIP" => Some(Outcome::Skipped),
        _ => None,
    }
}

struct Decoder {
    message: XPath,
    warnings: Vec<LeafDecodeWarning>,
}

impl Decoder {
    fn new() -> Self {
        Self {
            message: Factory::new()
                .build(MESSAGE_XPATH)
                .expect("XPath compilation error")
                .expect("XPath expression is empty"),
            warnings: Vec::new(),
        }
    }

    fn warn<R: Into<String>>(&mut self, path: &str, reason: R) {
        self.warnings.push(LeafDecodeWarning::new(path, reason));
    }

    /// A lone suite is unwrapped so its tests become the top-level groups,
    /// unless it holds cases directly.
    fn decode_single_suite(&mut self, suite: Element) -> TestSuiteResult {
        let identifier = self.group_name(suite, "");
        let children = self.decode_children(suite, &identifier);
        if children.iter().all(|child| matches!(child, TestNode::Group(_))) {
            let groups = children
                .into_iter()
                .filter_map(|child| match child {
                    TestNode::Group(group) => Some(group),
                    TestNode::Case(_) => None,
                })
                .collect();
            TestSuiteResult::new(identifier, groups)
        } else {
            let group = TestGroup::new(identifier.clone(), children);
            TestSuiteResult::new(identifier, vec![group])
        }
    }

    fn group_name(&mut self, element: Element, parent: &str) -> String {
        match element.attribute_value("name") {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => {
                let kind = element.name().local_part();
                self.warn(&join(parent, UNNAMED), format!("<{}> has no name", kind));
                UNNAMED.to_owned()
            }
        }
    }

    fn decode_group(&mut self, element: Element, parent: &str) -> TestGroup {
        let name = self.group_name(element, parent);
        let children = self.decode_children(element, &join(parent, &name));
        TestGroup::new(name, children)
    }

    fn decode_children(&mut self, element: Element, path: &str) -> Vec<TestNode> {
        let mut nodes = Vec::new();
        for child in child_elements(element) {
            let kind = child.name().local_part();
            if GROUP_ELEMENTS.contains(&kind) {
                nodes.push(TestNode::Group(self.decode_group(child, path)));
            } else if kind == CASE_ELEMENT {
                if let Some(case) = self.decode_case(child, path) {
                    nodes.push(TestNode::Case(case));
                }
            } else {
                trace!("Skipping <{}> in {}", kind, path);
            }
        }
        nodes
    }

    fn decode_case(&mut self, element: Element, parent: &str) -> Option<TestCase> {
        if element.attribute_value("is-config") == Some("true") {
            debug!(
                "Skipping configuration method {:?} in {}",
                element.attribute_value("name"),
                parent
            );
            return None;
        }

        let (name, named) = match element.attribute_value("name") {
            Some(name) if !name.is_empty() => (name.to_owned(), true),
            _ => {
                let fallback = element.attribute_value("signature").unwrap_or(UNNAMED);
                self.warn(&join(parent, fallback), "<test-method> has no name");
                (fallback.to_owned(), false)
            }
        };
        let path = join(parent, &name);

        let status = element.attribute_value("status");
        let outcome = match status.and_then(status_outcome) {
            Some(outcome) if named => outcome,
            Some(_) => Outcome::Indeterminate,
            None => {
                self.warn(&path, format!("unrecognised status {:?}", status));
                Outcome::Indeterminate
            }
        };

        let mut case = TestCase::new(name, outcome);
        if let Some(description) = element.attribute_value("description") {
            case = case.with_description(description);
        }
        if let Some(raw) = element.attribute_value("duration-ms") {
            match raw.trim().parse::<f64>() {
                Ok(millis) if millis.is_finite() => {
                    case = case.with_duration_seconds(millis / 1000.0)
                }
                _ => self.warn(&path, format!("unusable duration-ms {:?}", raw)),
            }
        }
        if let Some(message) = self.message(element, &path) {
            case = case.with_message(message);
        }
        Some(case)
    }

    fn message(&mut self, element: Element, path: &str) -> Option<String> {
        let context = Context::new();
        match self.message.evaluate(&context, element) {
            Ok(Value::Nodeset(nodes)) => {
                let parts: Vec<String> = nodes
                    .document_order()
                    .iter()
                    .map(|node| node.string_value())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n"))
                }
            }
            Ok(other) => Some(other.string()),
            Err(err) => {
                self.warn(path, format!("cannot read message: {:?}", err));
                None
            }
        }
    }
}
