//! Source provenance for selectors, used for diagnostics only.

use core::fmt;
use url::Url;

/// Where a selector (or a parse error) was found.
///
/// Locators never influence matching, and selectors that differ only in their locators compare
/// equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocator {
    /// Byte offset into the parsed text.
    pub offset: usize,
    /// 1-based line number, including any configured line offset.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// The stylesheet or document the text came from.
    pub source: Option<Url>,
}

impl SourceLocator {
    #[inline]
    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
            source: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: Option<Url>) -> Self {
        self.source = source;
        self
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(formatter, "{source}:")?;
        }
        write!(formatter, "{}:{}", self.line, self.column)
    }
}
