//! CSS selector matching engine.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! Matching returns `Some(element)` on success. For a structural combinator the payload is the
//! related element where `first` matched (the ancestor or preceding sibling), and an enclosing
//! combinator walks from that element. When several related elements qualify, the search
//! backtracks until one satisfies every outer combinator.

use crate::{
    AttributeOperation, AttributeSelector, Combinator, ComplexSelector, Selector, SelectorGroup,
    SelectorModel, SimpleSelector,
};
use core::iter::successors;

/// Match a selector against an element.
#[inline]
pub fn matches_selector<M: SelectorModel + ?Sized>(
    model: &M,
    element: M::Element,
    selector: &Selector,
) -> bool {
    selector.matches(model, element)
}

/// Match a selector group (logical OR) against an element.
#[inline]
pub fn matches_selector_group<M: SelectorModel + ?Sized>(
    model: &M,
    element: M::Element,
    group: &SelectorGroup,
) -> bool {
    group.matches(model, element)
}

impl SimpleSelector {
    /// Returns `Some(element)` if this selector matches it.
    #[inline]
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
    ) -> Option<M::Element> {
        self.matches(model, element).then_some(element)
    }

    /// Match a simple selector against a single element.
    /// Selectors Level 3 §6
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: M::Element) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(type_selector) => {
                model.has_type(element, &type_selector.namespace, &type_selector.name)
            }
            Self::Id(id) => model.has_id(element, id),
            Self::Class(class) => model.has_style_class(element, class),
            Self::PseudoClass(name) | Self::FunctionPseudoClass { name, .. } => {
                model.has_pseudo_class(element, name)
            }
            Self::Negation(inner) => inner.match_element(model, element).is_none(),
            Self::Attribute(attribute) => attribute.matches(model, element),
            Self::SelectNothing => false,
        }
    }
}

impl AttributeSelector {
    /// Selectors Level 3 §6.3.1, §6.3.2
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: M::Element) -> bool {
        let namespace = &self.namespace;
        let name = self.name.as_str();
        match &self.operation {
            AttributeOperation::Exists => model.has_attribute(element, namespace, name),
            AttributeOperation::Equals(value) => {
                model.attribute_value_equals(element, namespace, name, value)
            }
            AttributeOperation::Includes(value) => {
                model.attribute_value_contains_word(element, namespace, name, value)
            }
            AttributeOperation::DashMatch(value) => {
                model.attribute_value_dash_match(element, namespace, name, value)
            }
            AttributeOperation::Prefix(value) => {
                model.attribute_value_starts_with(element, namespace, name, value)
            }
            AttributeOperation::Substring(value) => {
                model.attribute_value_contains(element, namespace, name, value)
            }
            AttributeOperation::Suffix(value) => {
                model.attribute_value_ends_with(element, namespace, name, value)
            }
        }
    }
}

/// Callback that decides whether a candidate anchor also satisfies the enclosing combinators.
type Accept<'outer, E> = dyn FnMut(E) -> bool + 'outer;

impl ComplexSelector {
    /// Match a combinator against an element.
    /// Selectors Level 3 §8 — Right-to-left matching strategy
    #[inline]
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
    ) -> Option<M::Element> {
        self.find_anchor(model, element, &mut |_| true)
    }

    #[inline]
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: M::Element) -> bool {
        self.match_element(model, element).is_some()
    }

    /// First anchor reachable from `element` that `accept` takes.
    fn find_anchor<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
        accept: &mut Accept<'_, M::Element>,
    ) -> Option<M::Element> {
        let (step, hops): (fn(&M, M::Element) -> Option<M::Element>, usize) =
            match self.combinator {
                Combinator::And => {
                    let both = self.first.matches(model, element)
                        && self.second.find_anchor(model, element, &mut |_| true).is_some();
                    return (both && accept(element)).then_some(element);
                }
                Combinator::Descendant => (M::parent, usize::MAX),
                Combinator::Child => (M::parent, 1),
                Combinator::AdjacentSibling => (M::previous_sibling, 1),
                Combinator::GeneralSibling => (M::previous_sibling, usize::MAX),
            };

        let mut related = None;
        let reached = self.second.find_anchor(model, element, &mut |start| {
            related = successors(step(model, start), |&current| step(model, current))
                .take(hops)
                .find(|&candidate| self.first.matches(model, candidate) && accept(candidate));
            related.is_some()
        });
        reached.and(related)
    }
}

impl Selector {
    /// Returns the matched element, or `None`.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
    ) -> Option<M::Element> {
        match self {
            Self::Simple(simple) => simple.match_element(model, element),
            Self::Complex(complex) => complex.match_element(model, element),
        }
    }

    #[inline]
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: M::Element) -> bool {
        self.match_element(model, element).is_some()
    }

    fn find_anchor<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
        accept: &mut Accept<'_, M::Element>,
    ) -> Option<M::Element> {
        match self {
            Self::Simple(simple) => {
                (simple.matches(model, element) && accept(element)).then_some(element)
            }
            Self::Complex(complex) => complex.find_anchor(model, element, accept),
        }
    }
}
