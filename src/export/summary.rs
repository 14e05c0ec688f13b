use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::features::{AttributeKind, TrainingSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSummary {
    pub name: String,
    pub nominal: bool,
    /// Number of distinct values in the data.
    pub distinct: usize,
}

/// Human-readable overview of an exported training set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub relation: String,
    pub rows: usize,
    pub attributes: Vec<AttributeSummary>,
}

impl ExportSummary {
    pub fn of(set: &TrainingSet) -> Self {
        let attributes = set
            .attributes()
            .into_iter()
            .enumerate()
            .map(|(i, attribute)| {
                let distinct: BTreeSet<&str> = set
                    .rows()
                    .map(|row| match row.values().get(i) {
                        Some(value) => value.as_str(),
                        None => row.class().as_str(),
                    })
                    .collect();
                AttributeSummary {
                    name: attribute.name.to_string(),
                    nominal: matches!(attribute.kind, AttributeKind::Nominal(_)),
                    distinct: distinct.len(),
                }
            })
            .collect();

        Self {
            relation: set.relation().to_string(),
            rows: set.len(),
            attributes,
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Relation Name:  {}", self.relation)?;
        writeln!(f, "Num Instances:  {}", self.rows)?;
        writeln!(f, "Num Attributes: {}", self.attributes.len())?;
        writeln!(f)?;
        writeln!(f, "     {:<8}{:<6}{:>8}", "Name", "Type", "Distinct")?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            let kind = if attribute.nominal { "Nom" } else { "Str" };
            write!(
                f,
                "{:>4} {:<8}{:<6}{:>8}",
                i + 1,
                attribute.name,
                kind,
                attribute.distinct
            )?;
            if i + 1 < self.attributes.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
