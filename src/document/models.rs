// src/document/models.rs

/// A single text line from a document page.
///
/// The raw text is kept as extracted; comparisons and output use the
/// whitespace-trimmed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    raw: String,
}

impl Line {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self { raw: raw.into() }
    }

    #[cfg(test)]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Leading and trailing whitespace removed.
    pub fn cleaned(&self) -> &str {
        self.raw.trim()
    }

    /// Cleaned and lower-cased, for keyword comparisons.
    pub fn lowered(&self) -> String {
        self.cleaned().to_lowercase()
    }

    /// A heading is longer than 10 characters, entirely upper-case and
    /// free of digits.
    pub fn is_heading(&self) -> bool {
        let text = self.cleaned();
        if text.chars().count() <= 10 {
            return false;
        }

        let mut has_cased = false;
        for c in text.chars() {
            if is_digit(c) || c.is_lowercase() {
                return false;
            }
            if c.is_uppercase() {
                has_cased = true;
            }
        }
        has_cased
    }
}

/// Decimal digits plus their superscript and subscript forms. Other numeric
/// characters such as `½` or `Ⅳ` are not digits.
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '\u{00B2}' | '\u{00B3}' | '\u{00B9}' | '\u{2070}')
        || ('\u{2074}'..='\u{2079}').contains(&c)
        || ('\u{2080}'..='\u{2089}').contains(&c)
}

/// Text of one source page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

impl PageText {
    /// Splits on `\n`, keeping empty lines (including a trailing one).
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.text.split('\n').map(Line::new)
    }
}

/// Flattens pages into one ordered line sequence.
pub fn collect_lines(pages: &[PageText]) -> Vec<Line> {
    pages.iter().flat_map(PageText::lines).collect()
}
