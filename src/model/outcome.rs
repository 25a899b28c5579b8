use serde_derive::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Indeterminate,
}

/// Amount of outcomes of each kind.
///
/// Used both for the per-node leaf statistics and as the multiset that
/// [`Outcome::aggregate`] folds over, so addition must stay commutative.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub indeterminate: usize,
}

impl Outcome {
    /// Derives a group outcome from the outcomes of its immediate children.
    ///
    /// Failed dominates, then indeterminate. A group where every child was
    /// skipped is skipped, anything else with at least one pass is passed.
    /// No children means there is no evidence, which is indeterminate.
    pub fn aggregate<I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        let tally: Statistics = outcomes.into_iter().map(Statistics::of).sum();
        if tally.failed > 0 {
            Outcome::Failed
        } else if tally.indeterminate > 0 || tally.total == 0 {
            Outcome::Indeterminate
        } else if tally.skipped == tally.total {
            Outcome::Skipped
        } else {
            Outcome::Passed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed => "FAILED",
            Outcome::Skipped => "SKIPPED",
            Outcome::Indeterminate => "INDETERMINATE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Statistics {
    pub fn of(outcome: Outcome) -> Self {
        let mut statistics = Statistics {
            total: 1,
            ..Statistics::default()
        };
        match outcome {
            Outcome::Passed => statistics.passed = 1,
            Outcome::Failed => statistics.failed = 1,
            Outcome::Skipped => statistics.skipped = 1,
            Outcome::Indeterminate => statistics.indeterminate = 1,
        }
        statistics
    }
}

impl Add for Statistics {
    type Output = Statistics;

    fn add(self, other: Statistics) -> Statistics {
        Statistics {
            total: self.total + other.total,
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
            indeterminate: self.indeterminate + other.indeterminate,
        }
    }
}

impl Sum for Statistics {
    fn sum<I: Iterator<Item = Statistics>>(iter: I) -> Self {
        iter.fold(Statistics::default(), Add::add)
    }
}
