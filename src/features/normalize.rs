use crate::diagnostics::{Diagnostic, DiagnosticSink};

use super::examples::ContextExample;
use super::row::{ClassLabel, FeatureRow, WINDOW};

/// Why a context example produced no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The raw context string that was too short.
    pub context: String,
    pub tokens: usize,
}

impl From<Rejection> for Diagnostic {
    fn from(r: Rejection) -> Self {
        Diagnostic::ShortContext {
            context: r.context,
            tokens: r.tokens,
        }
    }
}

/// Turn an example into a feature row, or say which context was too short.
///
/// Both contexts must split into at least five tokens on ASCII whitespace;
/// other spaces (no-break space, line separator) stay inside a token. The first
/// five of each side are kept; the left side fills `l5..l1`, the right side
/// `r1..r5`. The left side is checked first.
pub fn try_normalize(example: &ContextExample, class: ClassLabel) -> Result<FeatureRow, Rejection> {
    let left = window(&example.left_context)?;
    let right = window(&example.right_context)?;

    let values = std::array::from_fn(|i| {
        if i < WINDOW {
            normalize_token(left[i])
        } else {
            normalize_token(right[i - WINDOW])
        }
    });
    Ok(FeatureRow::new(values, class))
}

/// Like [`try_normalize`], reporting rejections to `sink`.
pub fn normalize<D: DiagnosticSink>(
    example: &ContextExample,
    class: ClassLabel,
    sink: &D,
) -> Option<FeatureRow> {
    match try_normalize(example, class) {
        Ok(row) => Some(row),
        Err(rejection) => {
            sink.emit(rejection.into());
            None
        }
    }
}

fn window(context: &str) -> Result<Vec<&str>, Rejection> {
    let tokens: Vec<&str> = context
        .split(is_token_separator)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < WINDOW {
        return Err(Rejection {
            context: context.to_string(),
            tokens: tokens.len(),
        });
    }
    Ok(tokens.into_iter().take(WINDOW).collect())
}

// Space, tab, newline, vertical tab, form feed, carriage return.
fn is_token_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Unescape markup entities, then escape regex metacharacters.
pub fn normalize_token(token: &str) -> String {
    escape_regex(&unescape_entities(token))
}

const NAMED_ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Replace XML character entities in one pass, so `&amp;lt;` becomes `&lt;`.
///
/// Numeric references (`&#39;`, `&#x27;`) are decoded too. Anything that
/// does not parse as an entity is kept verbatim.
pub fn unescape_entities(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_entity(rest) {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(s: &str) -> Option<(char, usize)> {
    for (name, c) in NAMED_ENTITIES {
        if s.starts_with(name) {
            return Some((c, name.len()));
        }
    }
    let body = s.strip_prefix("&#")?;
    let end = body.find(';')?;
    let digits = &body[..end];
    let hex = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'));
    let code = match hex {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code).map(|c| (c, 2 + end + 1))
}

const REGEX_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '(', ')', '[', ']', '{', '}', '|', '\\',
];

/// Backslash-escape every regex metacharacter so the token matches literally.
pub fn escape_regex(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        if REGEX_METACHARACTERS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
