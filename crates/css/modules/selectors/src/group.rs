//! Groups of selectors.
//! Spec: <https://www.w3.org/TR/selectors-3/#grouping>

use crate::{Selector, SelectorModel, SourceLocator};
use core::hash::{Hash, Hasher};
use log::trace;

/// A comma-separated selector list, combined by logical OR.
///
/// Member order does not affect [`SelectorGroup::matches`], only the tie-break in
/// [`SelectorGroup::match_selector`].
#[derive(Clone, Debug)]
pub struct SelectorGroup {
    /// Never empty.
    selectors: Vec<Selector>,
    /// Where the group came from, if known. Not part of equality.
    locator: Option<SourceLocator>,
}

impl SelectorGroup {
    /// Build a group. Returns `None` for an empty list.
    pub fn new(selectors: Vec<Selector>) -> Option<Self> {
        (!selectors.is_empty()).then_some(Self {
            selectors,
            locator: None,
        })
    }

    /// A group of exactly one selector.
    #[inline]
    pub fn single(selector: impl Into<Selector>) -> Self {
        Self {
            selectors: vec![selector.into()],
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

    #[inline]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    #[inline]
    pub fn locator(&self) -> Option<&SourceLocator> {
        self.locator.as_ref()
    }

    /// The first member's match result, scanning in order.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
    ) -> Option<M::Element> {
        self.selectors
            .iter()
            .find_map(|selector| selector.match_element(model, element))
    }

    #[inline]
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: M::Element) -> bool {
        self.match_element(model, element).is_some()
    }

    /// The member that decides the cascade for `element`.
    ///
    /// Every member is evaluated. Among the matching ones the highest specificity wins and, on
    /// equal specificity, the one declared last.
    pub fn match_selector<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
    ) -> Option<&Selector> {
        let mut winner: Option<(usize, u32)> = None;
        for (index, selector) in self.selectors.iter().enumerate() {
            if !selector.matches(model, element) {
                continue;
            }
            let specificity = selector.specificity();
            if winner.is_none_or(|(_, best)| specificity >= best) {
                winner = Some((index, specificity));
            }
        }
        let (index, specificity) = winner?;
        trace!("selector group member {index} wins with specificity {specificity}");
        self.selectors.get(index)
    }
}

impl PartialEq for SelectorGroup {
    fn eq(&self, other: &Self) -> bool {
        self.selectors == other.selectors
    }
}

impl Eq for SelectorGroup {}

impl Hash for SelectorGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.selectors.hash(state);
    }
}

impl From<Selector> for SelectorGroup {
    #[inline]
    fn from(selector: Selector) -> Self {
        Self::single(selector)
    }
}
