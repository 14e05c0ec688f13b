use std::collections::BTreeSet;

use crate::diagnostics::{DiagnosticSink, LogSink};

use super::examples::ContextExample;
use super::normalize::normalize;
use super::row::{ClassLabel, FeatureRow, LabelError, ATTRIBUTE_NAMES, CLASS_ATTRIBUTE};

/// Relation name written into exported training sets.
pub const RELATION: &str = "IsStudyReference";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Open-vocabulary string.
    String,
    /// Closed set of permitted values.
    Nominal(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
}

const CLASS_VALUES: &[&str] = &["True", "False"];

/// Ten string attributes `l5..r5`, then the nominal `class`.
pub fn schema() -> Vec<Attribute> {
    ATTRIBUTE_NAMES
        .iter()
        .map(|&name| Attribute {
            name,
            kind: AttributeKind::String,
        })
        .chain(std::iter::once(Attribute {
            name: CLASS_ATTRIBUTE,
            kind: AttributeKind::Nominal(CLASS_VALUES),
        }))
        .collect()
}

/// Distinct feature rows with a fixed schema.
///
/// Structurally equal rows collapse. Iteration order is the row ordering,
/// not insertion order. Built once by [`FeatureRowBuilder`]; there is no
/// way to add rows afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingSet {
    rows: BTreeSet<FeatureRow>,
}

impl TrainingSet {
    pub fn relation(&self) -> &'static str {
        RELATION
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        schema()
    }

    pub fn rows(&self) -> impl Iterator<Item = &FeatureRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: &FeatureRow) -> bool {
        self.rows.contains(row)
    }
}

impl FromIterator<FeatureRow> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = FeatureRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Folds context examples into a [`TrainingSet`], reporting short contexts.
pub struct FeatureRowBuilder<D = LogSink> {
    diagnostics: D,
}

impl Default for FeatureRowBuilder<LogSink> {
    fn default() -> Self {
        Self {
            diagnostics: LogSink,
        }
    }
}

impl<D: DiagnosticSink> FeatureRowBuilder<D> {
    pub fn new(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Normalize every example with the same class; drop the rejected ones.
    ///
    /// `label` must be exactly `"True"` or `"False"`.
    pub fn build_training_set<'a, I>(&self, examples: I, label: &str) -> Result<TrainingSet, LabelError>
    where
        I: IntoIterator<Item = &'a ContextExample>,
    {
        let class: ClassLabel = label.parse()?;
        Ok(self.build_with_class(examples, class))
    }

    pub fn build_with_class<'a, I>(&self, examples: I, class: ClassLabel) -> TrainingSet
    where
        I: IntoIterator<Item = &'a ContextExample>,
    {
        let mut seen = 0usize;
        let set: TrainingSet = examples
            .into_iter()
            .inspect(|_| seen += 1)
            .filter_map(|example| normalize(example, class, &self.diagnostics))
            .collect();
        log::info!(
            "{} distinct row(s) from {seen} example(s) labelled {class}",
            set.len()
        );
        set
    }
}

/// [`FeatureRowBuilder::build_training_set`] with warnings sent to the log.
pub fn build_training_set<'a, I>(examples: I, label: &str) -> Result<TrainingSet, LabelError>
where
    I: IntoIterator<Item = &'a ContextExample>,
{
    FeatureRowBuilder::default().build_training_set(examples, label)
}
