use crate::model::outcome::{Outcome, Statistics};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_derive::Serialize;

/// One completed run of a named suite.
///
/// Owns the whole tree. Outcome and statistics are folded from the tree on
/// every call and never stored, so they cannot drift from the groups.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuiteResult {
    suite_identifier: String,
    groups: Vec<TestGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestGroup {
    name: String,
    children: Vec<TestNode>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestNode {
    Group(TestGroup),
    Case(TestCase),
}

/// A leaf check. Its outcome is the only one stored rather than derived.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TestCase {
    name: String,
    outcome: Outcome,
    message: Option<String>,
    description: Option<String>,
    duration_seconds: Option<f64>,
}

/// Node reached while walking a suite depth-first.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Group(&'a TestGroup),
    Case(&'a TestCase),
}

#[derive(Debug, Clone)]
pub struct Entry<'a> {
    /// Names of the enclosing groups, outermost first.
    pub path: Vec<&'a str>,
    pub node: NodeRef<'a>,
}

impl TestSuiteResult {
    pub fn new<S: Into<String>>(suite_identifier: S, groups: Vec<TestGroup>) -> Self {
        Self {
            suite_identifier: suite_identifier.into(),
            groups,
        }
    }

    pub fn suite_identifier(&self) -> &str {
        &self.suite_identifier
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::aggregate(self.groups.iter().map(TestGroup::outcome))
    }

    pub fn statistics(&self) -> Statistics {
        self.groups.iter().map(TestGroup::statistics).sum()
    }

    /// Every group and case in document order, parents before children.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        let mut entries = Vec::new();
        let mut path = Vec::new();
        for group in &self.groups {
            collect_entries(NodeRef::Group(group), &mut path, &mut entries);
        }
        entries
    }

    /// Cases only, in document order, paired with their enclosing group names.
    pub fn cases(&self) -> Vec<(Vec<&str>, &TestCase)> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry.node {
                NodeRef::Case(case) => Some((entry.path, case)),
                NodeRef::Group(_) => None,
            })
            .collect()
    }
}

fn collect_entries<'a>(node: NodeRef<'a>, path: &mut Vec<&'a str>, entries: &mut Vec<Entry<'a>>) {
    entries.push(Entry {
        path: path.clone(),
        node,
    });
    if let NodeRef::Group(group) = node {
        path.push(group.name());
        for child in group.children() {
            collect_entries(child.as_node_ref(), path, entries);
        }
        path.pop();
    }
}

impl TestGroup {
    pub fn new<S: Into<String>>(name: S, children: Vec<TestNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[TestNode] {
        &self.children
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::aggregate(self.children.iter().map(TestNode::outcome))
    }

    pub fn statistics(&self) -> Statistics {
        self.children.iter().map(TestNode::statistics).sum()
    }
}

impl TestNode {
    pub fn name(&self) -> &str {
        match self {
            TestNode::Group(group) => group.name(),
            TestNode::Case(case) => case.name(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            TestNode::Group(group) => group.outcome(),
            TestNode::Case(case) => case.outcome(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        match self {
            TestNode::Group(group) => group.statistics(),
            TestNode::Case(case) => Statistics::of(case.outcome()),
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            TestNode::Group(group) => NodeRef::Group(group),
            TestNode::Case(case) => NodeRef::Case(case),
        }
    }
}

impl From<TestGroup> for TestNode {
    fn from(group: TestGroup) -> Self {
        TestNode::Group(group)
    }
}

impl From<TestCase> for TestNode {
    fn from(case: TestCase) -> Self {
        TestNode::Case(case)
    }
}

impl TestCase {
    pub fn new<S: Into<String>>(name: S, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            outcome,
            message: None,
            description: None,
            duration_seconds: None,
        }
    }

    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration_seconds(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            NodeRef::Group(group) => group.name(),
            NodeRef::Case(case) => case.name(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match *self {
            NodeRef::Group(group) => group.outcome(),
            NodeRef::Case(case) => case.outcome(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match *self {
            NodeRef::Group(_) => "group",
            NodeRef::Case(_) => "case",
        }
    }
}

// Derived fields are written next to the stored ones, so the output carries
// outcome and statistics even though the structs do not.
impl Serialize for TestSuiteResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TestSuiteResult", 4)?;
        state.serialize_field("suite_identifier", &self.suite_identifier)?;
        state.serialize_field("outcome", &self.outcome())?;
        state.serialize_field("statistics", &self.statistics())?;
        state.serialize_field("groups", &self.groups)?;
        state.end()
    }
}

impl Serialize for TestGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TestGroup", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("outcome", &self.outcome())?;
        state.serialize_field("statistics", &self.statistics())?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}
