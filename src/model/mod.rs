pub mod details;
pub mod outcome;
pub mod result;

pub use self::details::{SerializationDetails, SerializationDetailsBuilder};
pub use self::outcome::{Outcome, Statistics};
pub use self::result::{Entry, NodeRef, TestCase, TestGroup, TestNode, TestSuiteResult};
