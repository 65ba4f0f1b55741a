//! Selectors Level 3 — Element matching and specificity.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! Selectors are immutable trees evaluated against a caller-supplied [`SelectorModel`]:
//! - Simple selectors: universal, type, id, class, pseudo-classes, `:not()`, attribute operators
//! - Combinators: and, descendant, child, adjacent sibling, general sibling
//! - Selector groups with last-wins specificity resolution
//! - Specificity as the flattened `100a + 10b + c` integer and as an `(a, b, c)` triple
//! - Token production and serialization through `cssparser`
//!
//! The same tree can be matched against any number of document models, from any number of threads.

#![forbid(unsafe_code)]

mod group;
mod index;
mod locator;
mod matcher;
mod options;
mod parser;
mod specificity;
mod tokens;
mod type_constraint;

use core::fmt;
use core::hash::{Hash, Hasher};
use cssparser::ToCss as _;

// Re-export public API
pub use group::SelectorGroup;
pub use index::{MatchedRule, SelectorMap};
pub use locator::SourceLocator;
pub use matcher::{matches_selector, matches_selector_group};
pub use options::ParserOptions;
pub use parser::{
    SelectorParseError, SelectorParseErrorKind, parse_selector, parse_selector_group,
    parse_selector_group_with,
};
pub use specificity::Specificity;
pub use tokens::serialize_tokens;

/// An adapter that abstracts document access for selector matching.
/// Implement this for your DOM layer.
///
/// The engine only ever reads through this trait. Implementations must present a consistent
/// view of the tree for the duration of a single top-level match call.
pub trait SelectorModel {
    type Element: Copy;

    /// True if the element's type (local name) matches `name` within `namespace`.
    /// Selectors Level 3 §6.1 — Type selectors
    fn has_type(&self, element: Self::Element, namespace: &Namespace, name: &str) -> bool;

    /// True if the element carries the given ID.
    /// Selectors Level 3 §6.5 — ID selectors
    fn has_id(&self, element: Self::Element, id: &str) -> bool;

    /// True if the element has the given class token.
    /// Selectors Level 3 §6.4 — Class selectors
    fn has_style_class(&self, element: Self::Element, class: &str) -> bool;

    /// True if the element is currently in the named pseudo-class state (`hover`, `first-child`, ...).
    /// Selectors Level 3 §6.6 — Pseudo-classes
    fn has_pseudo_class(&self, element: Self::Element, name: &str) -> bool;

    /// Returns the attribute value if present.
    /// Selectors Level 3 §6.3 — Attribute selectors
    fn attribute_value(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
    ) -> Option<&str>;

    /// Parent element if any.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Previous sibling element (skip non-elements if your DOM has mixed nodes).
    fn previous_sibling(&self, element: Self::Element) -> Option<Self::Element>;

    /// `[attr]`
    fn has_attribute(&self, element: Self::Element, namespace: &Namespace, name: &str) -> bool {
        self.attribute_value(element, namespace, name).is_some()
    }

    /// `[attr=value]`
    fn attribute_value_equals(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        self.attribute_value(element, namespace, name)
            .is_some_and(|value| value == operand)
    }

    /// `[attr|=value]`: exactly `value`, or `value` followed by `-`.
    fn attribute_value_dash_match(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        self.attribute_value(element, namespace, name)
            .is_some_and(|value| {
                value
                    .strip_prefix(operand)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
            })
    }

    /// `[attr^=value]`; an empty operand never matches.
    fn attribute_value_starts_with(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        !operand.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|value| value.starts_with(operand))
    }

    /// `[attr$=value]`; an empty operand never matches.
    fn attribute_value_ends_with(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        !operand.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|value| value.ends_with(operand))
    }

    /// `[attr*=value]`; an empty operand never matches.
    fn attribute_value_contains(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        !operand.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|value| value.contains(operand))
    }

    /// `[attr~=word]`: the value is a whitespace-separated list containing `operand`.
    /// An empty operand, or one that itself contains whitespace, never matches.
    fn attribute_value_contains_word(
        &self,
        element: Self::Element,
        namespace: &Namespace,
        name: &str,
        operand: &str,
    ) -> bool {
        if operand.is_empty() || operand.contains(|chr: char| chr.is_ascii_whitespace()) {
            return false;
        }
        self.attribute_value(element, namespace, name)
            .is_some_and(|value| value.split_ascii_whitespace().any(|word| word == operand))
    }
}

/// Namespace constraint carried by type and attribute selectors.
/// Selectors Level 3 §6.1.1 — Type selectors and namespaces
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `*|name`: any namespace, including none.
    #[default]
    Any,
    /// `|name`: elements or attributes without a namespace.
    None,
    /// `prefix|name`: the namespace bound to `prefix`. Prefix resolution belongs to the model.
    Named(String),
}

/// A type selector, `ns|name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeSelector {
    pub namespace: Namespace,
    pub name: String,
}

impl TypeSelector {
    /// A type selector in any namespace.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::Any,
            name: name.into(),
        }
    }

    /// A type selector with an explicit namespace constraint.
    #[inline]
    pub fn with_namespace(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

/// The operator of an attribute selector together with its operand.
/// Selectors Level 3 §6.3.1, §6.3.2
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeOperation {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals(String),
    /// `[attr~=value]`
    Includes(String),
    /// `[attr|=value]`
    DashMatch(String),
    /// `[attr^=value]`
    Prefix(String),
    /// `[attr*=value]`
    Substring(String),
    /// `[attr$=value]`
    Suffix(String),
}

impl AttributeOperation {
    /// The operand, or `None` for `[attr]`.
    pub fn operand(&self) -> Option<&str> {
        match self {
            Self::Exists => None,
            Self::Equals(value)
            | Self::Includes(value)
            | Self::DashMatch(value)
            | Self::Prefix(value)
            | Self::Substring(value)
            | Self::Suffix(value) => Some(value.as_str()),
        }
    }
}

/// An attribute selector, `[ns|name op value]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    pub namespace: Namespace,
    pub name: String,
    pub operation: AttributeOperation,
}

impl AttributeSelector {
    /// An attribute selector on an attribute without a namespace.
    #[inline]
    pub fn new(name: impl Into<String>, operation: AttributeOperation) -> Self {
        Self {
            namespace: Namespace::None,
            name: name.into(),
            operation,
        }
    }
}

/// Simple selectors.
/// Selectors Level 3 §6
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `ns|name`
    Type(TypeSelector),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `:name`
    PseudoClass(String),
    /// `:name(arguments)`. Arguments are kept as raw CSS text and do not take part in matching.
    FunctionPseudoClass { name: String, arguments: String },
    /// `:not(inner)`
    Negation(Box<SimpleSelector>),
    /// `[attr]`, `[attr=value]`, ...
    Attribute(AttributeSelector),
    /// Stands in for a construct the engine does not support. Never matches.
    SelectNothing,
}

/// Combinators between a simple selector and the rest of a selector.
/// Selectors Level 3 §8
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Both operands match the same element. Has no textual form of its own; a compound
    /// selector such as `div.card` is an `And` chain.
    And,
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// A combinator applied to two operands.
///
/// `first` is always a simple selector; `second` is the subject side and may itself be complex,
/// so `a > b.c` is `Child(a, And(b, .c))`.
#[derive(Clone, Debug)]
pub struct ComplexSelector {
    pub combinator: Combinator,
    pub first: SimpleSelector,
    pub second: Box<Selector>,
    /// Where the selector came from, if known. Not part of equality.
    pub locator: Option<SourceLocator>,
}

impl ComplexSelector {
    #[inline]
    pub fn new(combinator: Combinator, first: SimpleSelector, second: Selector) -> Self {
        Self {
            combinator,
            first,
            second: Box::new(second),
            locator: None,
        }
    }

    /// Attach provenance.
    #[inline]
    #[must_use]
    pub fn located(mut self, locator: SourceLocator) -> Self {
        self.locator = Some(locator);
        self
    }
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.combinator == other.combinator
            && self.first == other.first
            && self.second == other.second
    }
}

impl Eq for ComplexSelector {}

impl Hash for ComplexSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.combinator.hash(state);
        self.first.hash(state);
        self.second.hash(state);
    }
}

/// Any matchable selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    Simple(SimpleSelector),
    Complex(ComplexSelector),
}

impl Selector {
    /// `first && second` on the same element.
    #[inline]
    pub fn and(first: SimpleSelector, second: impl Into<Self>) -> Self {
        Self::Complex(ComplexSelector::new(
            Combinator::And,
            first,
            second.into(),
        ))
    }

    /// `first second`
    #[inline]
    pub fn descendant(first: SimpleSelector, second: impl Into<Self>) -> Self {
        Self::Complex(ComplexSelector::new(
            Combinator::Descendant,
            first,
            second.into(),
        ))
    }

    /// `first > second`
    #[inline]
    pub fn child(first: SimpleSelector, second: impl Into<Self>) -> Self {
        Self::Complex(ComplexSelector::new(Combinator::Child, first, second.into()))
    }

    /// `first + second`
    #[inline]
    pub fn adjacent_sibling(first: SimpleSelector, second: impl Into<Self>) -> Self {
        Self::Complex(ComplexSelector::new(
            Combinator::AdjacentSibling,
            first,
            second.into(),
        ))
    }

    /// `first ~ second`
    #[inline]
    pub fn general_sibling(first: SimpleSelector, second: impl Into<Self>) -> Self {
        Self::Complex(ComplexSelector::new(
            Combinator::GeneralSibling,
            first,
            second.into(),
        ))
    }

    /// Provenance of the outermost combinator, if any.
    pub fn locator(&self) -> Option<&SourceLocator> {
        match self {
            Self::Simple(_) => None,
            Self::Complex(complex) => complex.locator.as_ref(),
        }
    }
}

impl From<SimpleSelector> for Selector {
    #[inline]
    fn from(simple: SimpleSelector) -> Self {
        Self::Simple(simple)
    }
}

impl From<ComplexSelector> for Selector {
    #[inline]
    fn from(complex: ComplexSelector) -> Self {
        Self::Complex(complex)
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}
