//! CSS selector specificity calculation.
//! Spec: <https://www.w3.org/TR/selectors-3/#specificity>
//!
//! Every node contributes a fixed weight and composite nodes add up their operands. The
//! flattened integer is `100a + 10b + c`, so ten or more class-level selectors carry into the ID
//! digit; [`Specificity`] keeps the digits apart for callers that need an exact ordering.

use crate::{ComplexSelector, Selector, SelectorGroup, SimpleSelector};
use core::ops::Add;

/// Specificity triple (a, b, c).
///
/// `a` counts ID selectors, `b` class and attribute selectors, `c` type selectors and
/// pseudo-classes. Negation contributes its argument's weight and nothing of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    pub const ZERO: Self = Self(0, 0, 0);
    pub const ID: Self = Self(1, 0, 0);
    pub const CLASS: Self = Self(0, 1, 0);
    pub const TYPE: Self = Self(0, 0, 1);

    /// The flattened weight used for cascade tie-breaks.
    #[inline]
    pub fn value(self) -> u32 {
        100 * u32::from(self.0) + 10 * u32::from(self.1) + u32::from(self.2)
    }
}

impl Add for Specificity {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl SimpleSelector {
    /// Specificity of this simple selector as an (a, b, c) triple.
    pub fn specificity_triple(&self) -> Specificity {
        match self {
            Self::Universal | Self::SelectNothing => Specificity::ZERO,
            Self::Type(_) | Self::PseudoClass(_) | Self::FunctionPseudoClass { .. } => {
                Specificity::TYPE
            }
            Self::Id(_) => Specificity::ID,
            Self::Class(_) | Self::Attribute(_) => Specificity::CLASS,
            Self::Negation(inner) => inner.specificity_triple(),
        }
    }

    #[inline]
    pub fn specificity(&self) -> u32 {
        self.specificity_triple().value()
    }
}

impl ComplexSelector {
    /// Sum of both operands, whatever the combinator.
    pub fn specificity_triple(&self) -> Specificity {
        self.first.specificity_triple() + self.second.specificity_triple()
    }

    #[inline]
    pub fn specificity(&self) -> u32 {
        self.first.specificity() + self.second.specificity()
    }
}

impl Selector {
    pub fn specificity_triple(&self) -> Specificity {
        match self {
            Self::Simple(simple) => simple.specificity_triple(),
            Self::Complex(complex) => complex.specificity_triple(),
        }
    }

    pub fn specificity(&self) -> u32 {
        match self {
            Self::Simple(simple) => simple.specificity(),
            Self::Complex(complex) => complex.specificity(),
        }
    }
}

impl SelectorGroup {
    /// Sum over all members. Cascade resolution uses the members' own weights instead, see
    /// [`SelectorGroup::match_selector`].
    pub fn specificity(&self) -> u32 {
        self.selectors().iter().map(Selector::specificity).sum()
    }
}
