//! Static analysis: which element type, if any, a selector is restricted to.
//!
//! Style tables use this to file selectors under a type name and skip them for elements of any
//! other type.

use crate::{Combinator, ComplexSelector, Selector, SelectorGroup, SimpleSelector, TypeSelector};

impl SimpleSelector {
    /// A type selector constrains to itself; nothing else constrains.
    #[inline]
    pub fn matches_only_on_a_specific_type(&self) -> Option<&TypeSelector> {
        match self {
            Self::Type(type_selector) => Some(type_selector),
            _ => None,
        }
    }
}

impl ComplexSelector {
    /// The subject side decides, except for `And` where either operand may.
    pub fn matches_only_on_a_specific_type(&self) -> Option<&TypeSelector> {
        match self.combinator {
            Combinator::And => self
                .first
                .matches_only_on_a_specific_type()
                .or_else(|| self.second.matches_only_on_a_specific_type()),
            Combinator::Descendant
            | Combinator::Child
            | Combinator::AdjacentSibling
            | Combinator::GeneralSibling => self.second.matches_only_on_a_specific_type(),
        }
    }
}

impl Selector {
    pub fn matches_only_on_a_specific_type(&self) -> Option<&TypeSelector> {
        match self {
            Self::Simple(simple) => simple.matches_only_on_a_specific_type(),
            Self::Complex(complex) => complex.matches_only_on_a_specific_type(),
        }
    }
}

impl SelectorGroup {
    /// `Some(type)` only when every member is restricted to that same type.
    pub fn matches_only_on_a_specific_type(&self) -> Option<&TypeSelector> {
        let (first, rest) = self.selectors().split_first()?;
        let constraint = first.matches_only_on_a_specific_type()?;
        rest.iter()
            .all(|selector| selector.matches_only_on_a_specific_type() == Some(constraint))
            .then_some(constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Namespace;

    fn named(name: &str) -> SimpleSelector {
        SimpleSelector::Type(TypeSelector::new(name))
    }

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.to_owned())
    }

    /// # Panics
    /// Panics if a combinator reports the constraint of its non-subject side.
    #[test]
    fn structural_combinators_follow_the_subject() {
        let child = Selector::child(named("ul"), named("li"));
        assert_eq!(
            child.matches_only_on_a_specific_type(),
            Some(&TypeSelector::new("li"))
        );
        let loose = Selector::descendant(named("ul"), class("item"));
        assert_eq!(loose.matches_only_on_a_specific_type(), None);
    }

    /// # Panics
    /// Panics if `And` ignores either operand.
    #[test]
    fn and_prefers_first_then_second() {
        let leading = Selector::and(named("div"), class("card"));
        assert_eq!(
            leading.matches_only_on_a_specific_type(),
            Some(&TypeSelector::new("div"))
        );
        let trailing = Selector::and(class("card"), named("div"));
        assert_eq!(
            trailing.matches_only_on_a_specific_type(),
            Some(&TypeSelector::new("div"))
        );
        let negated = Selector::Simple(SimpleSelector::Negation(Box::new(named("div"))));
        assert_eq!(negated.matches_only_on_a_specific_type(), None);
    }

    /// # Panics
    /// Panics if a group narrows although its members disagree.
    #[test]
    fn group_needs_unanimous_members() {
        let same = SelectorGroup::new(vec![
            Selector::from(named("a")),
            Selector::and(named("a"), class("external")),
        ]);
        assert_eq!(
            same.as_ref()
                .and_then(SelectorGroup::matches_only_on_a_specific_type),
            Some(&TypeSelector::new("a"))
        );

        let mixed = SelectorGroup::new(vec![Selector::from(named("a")), named("b").into()]);
        assert_eq!(
            mixed
                .as_ref()
                .and_then(SelectorGroup::matches_only_on_a_specific_type),
            None
        );

        let other_namespace = SelectorGroup::new(vec![
            Selector::from(named("a")),
            SimpleSelector::Type(TypeSelector::with_namespace(Namespace::None, "a")).into(),
        ]);
        assert_eq!(
            other_namespace
                .as_ref()
                .and_then(SelectorGroup::matches_only_on_a_specific_type),
            None
        );
    }
}
