/// Splits document text into index terms.
pub trait Analyzer {
    fn name(&self) -> &'static str;

    fn terms<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Alphanumeric runs, case preserved.
///
/// `ALLBUS` and `allbus` stay distinct terms, which is what study-name
/// lookups need.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseSensitiveAnalyzer;

impl Analyzer for CaseSensitiveAnalyzer {
    fn name(&self) -> &'static str {
        "case-sensitive-standard"
    }

    fn terms<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
