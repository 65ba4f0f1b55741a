//! Parser configuration.

use crate::Namespace;
use url::Url;

/// Knobs for [`parse_selector_group_with`](crate::parse_selector_group_with).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Namespace given to type selectors written without a prefix (`div`).
    /// Selectors Level 3 §6.1.1: with no default namespace declared, this is any namespace.
    pub default_namespace: Namespace,
    /// Recorded in every `SourceLocator` the parser produces.
    pub source_uri: Option<Url>,
    /// Added to line numbers, for selectors embedded further down a document.
    pub line_offset: u32,
}

impl ParserOptions {
    #[inline]
    #[must_use]
    pub fn with_default_namespace(mut self, namespace: Namespace) -> Self {
        self.default_namespace = namespace;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_source_uri(mut self, source_uri: Url) -> Self {
        self.source_uri = Some(source_uri);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_line_offset(mut self, line_offset: u32) -> Self {
        self.line_offset = line_offset;
        self
    }
}
