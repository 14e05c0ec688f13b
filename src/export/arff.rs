//! Weka ARFF serialization of training sets.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::features::{
    AttributeKind, ClassLabel, FeatureRow, TrainingSet, ATTRIBUTE_NAMES, CLASS_ATTRIBUTE, WINDOW,
};

use super::summary::ExportSummary;
use super::ExportError;

/// Write `set` as ARFF to `out`.
pub fn write_arff<W: Write>(set: &TrainingSet, out: &mut W) -> io::Result<()> {
    writeln!(out, "@relation {}", quote(set.relation()))?;
    writeln!(out)?;
    for attribute in set.attributes() {
        match attribute.kind {
            AttributeKind::String => writeln!(out, "@attribute {} string", attribute.name)?,
            AttributeKind::Nominal(values) => {
                writeln!(out, "@attribute {} {{{}}}", attribute.name, values.join(","))?
            }
        }
    }
    writeln!(out)?;
    writeln!(out, "@data")?;
    for row in set.rows() {
        let mut fields: Vec<String> = row.values().iter().map(|v| quote(v)).collect();
        fields.push(row.class().to_string());
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Write `set` to `path`, log a summary, and return it.
///
/// On failure nothing is retried; the error names the destination.
pub fn export(set: &TrainingSet, path: &Path) -> Result<ExportSummary, ExportError> {
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write_arff(set, &mut out).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    let summary = ExportSummary::of(set);
    log::info!("{summary}");
    log::info!("Wrote {}", path.display());
    Ok(summary)
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|c| {
            c.is_whitespace() || matches!(c, ',' | '\'' | '"' | '%' | '{' | '}' | '\\' | '?')
        })
}

/// Single-quote `value` if ARFF would otherwise misread it.
pub fn quote(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '%' => out.push_str("\\%"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Contents of a parsed ARFF training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArffData {
    pub relation: String,
    pub attributes: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<FeatureRow>,
}

/// Parse ARFF written by [`write_arff`] (or any ARFF with the same schema).
pub fn read_arff(text: &str) -> Result<ArffData, ExportError> {
    let mut relation = String::new();
    let mut attributes = Vec::new();
    let mut rows = Vec::new();
    let mut in_data = false;

    for (i, raw) in text.lines().enumerate() {
        let line_number = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let parse_err = |message: String| ExportError::Parse {
            line_number,
            message,
        };

        if in_data {
            let fields = split_fields(line).map_err(parse_err)?;
            rows.push(row_from_fields(fields).map_err(parse_err)?);
            continue;
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match keyword.to_ascii_lowercase().as_str() {
            "@relation" => {
                relation = split_fields(rest.trim())
                    .map_err(parse_err)?
                    .into_iter()
                    .next()
                    .unwrap_or_default();
            }
            "@attribute" => {
                let name = rest.split_whitespace().next().unwrap_or_default();
                attributes.push(name.to_string());
            }
            "@data" => {
                let expected: Vec<&str> = ATTRIBUTE_NAMES
                    .iter()
                    .copied()
                    .chain(std::iter::once(CLASS_ATTRIBUTE))
                    .collect();
                if attributes != expected {
                    return Err(parse_err(format!(
                        "unexpected attributes {attributes:?}, expected {expected:?}"
                    )));
                }
                in_data = true;
            }
            other => return Err(parse_err(format!("unexpected header line starting with {other:?}"))),
        }
    }

    Ok(ArffData {
        relation,
        attributes,
        rows,
    })
}

fn row_from_fields(mut fields: Vec<String>) -> Result<FeatureRow, String> {
    if fields.len() != 2 * WINDOW + 1 {
        return Err(format!(
            "expected {} values, found {}",
            2 * WINDOW + 1,
            fields.len()
        ));
    }
    let class: ClassLabel = fields
        .pop()
        .unwrap_or_default()
        .parse()
        .map_err(|e| format!("{e}"))?;
    let values: [String; 2 * WINDOW] = fields
        .try_into()
        .map_err(|_| "wrong number of string values".to_string())?;
    Ok(FeatureRow::new(values, class))
}

/// Split one data line on commas, honouring quotes and backslash escapes.
fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let mut field = String::new();
        match chars.peek().copied() {
            Some(q @ ('\'' | '"')) => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('n') => field.push('\n'),
                            Some('r') => field.push('\r'),
                            Some('t') => field.push('\t'),
                            Some(c) => field.push(c),
                            None => return Err("dangling escape".to_string()),
                        },
                        Some(c) if c == q => break,
                        Some(c) => field.push(c),
                        None => return Err("unterminated quoted value".to_string()),
                    }
                }
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            _ => {
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    field.push(c);
                    chars.next();
                }
                field = field.trim_end().to_string();
            }
        }
        fields.push(field);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => return Err(format!("unexpected {c:?} after value")),
        }
    }
    Ok(fields)
}
