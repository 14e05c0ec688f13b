use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens taken from each side of a span.
pub const WINDOW: usize = 5;

/// Attribute names in column order.
pub const ATTRIBUTE_NAMES: [&str; 2 * WINDOW] =
    ["l5", "l4", "l3", "l2", "l1", "r1", "r2", "r3", "r4", "r5"];

pub const CLASS_ATTRIBUTE: &str = "class";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("Invalid class label {0:?}: expected \"True\" or \"False\"")]
    Invalid(String),
}

/// The class of a training row: is the span a study reference?
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    True,
    False,
}

impl ClassLabel {
    /// Permitted values, in declaration order.
    pub const VALUES: [ClassLabel; 2] = [ClassLabel::True, ClassLabel::False];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::True => "True",
            ClassLabel::False => "False",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(ClassLabel::True),
            "False" => Ok(ClassLabel::False),
            other => Err(LabelError::Invalid(other.to_string())),
        }
    }
}

/// One training example: ten context tokens and a class.
///
/// Values are stored in column order `l5 l4 l3 l2 l1 r1 r2 r3 r4 r5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureRow {
    values: [String; 2 * WINDOW],
    class: ClassLabel,
}

impl FeatureRow {
    pub fn new(values: [String; 2 * WINDOW], class: ClassLabel) -> Self {
        Self { values, class }
    }

    pub fn values(&self) -> &[String; 2 * WINDOW] {
        &self.values
    }

    pub fn class(&self) -> ClassLabel {
        self.class
    }

    /// `l<n>`, where `l1` is the nearest left neighbour. `n` is 1..=5.
    pub fn left(&self, n: usize) -> &str {
        assert!((1..=WINDOW).contains(&n), "left position {n} out of range");
        &self.values[WINDOW - n]
    }

    /// `r<n>`, where `r1` is the nearest right neighbour. `n` is 1..=5.
    pub fn right(&self, n: usize) -> &str {
        assert!((1..=WINDOW).contains(&n), "right position {n} out of range");
        &self.values[WINDOW + n - 1]
    }

    /// Value by attribute name (`l5`..`r5`).
    pub fn get(&self, attribute: &str) -> Option<&str> {
        ATTRIBUTE_NAMES
            .iter()
            .position(|name| *name == attribute)
            .map(|i| self.values[i].as_str())
    }
}
