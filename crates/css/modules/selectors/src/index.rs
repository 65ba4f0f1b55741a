//! Type-indexed selector storage.
//!
//! Rules are filed under the local name their selector is restricted to, so matching an element
//! only evaluates the rules for its own type plus the unrestricted ones.

use crate::{Selector, SelectorModel, Specificity};
use std::collections::HashMap;

/// A stored selector and its payload.
#[derive(Clone, Debug)]
struct Entry<R> {
    selector: Selector,
    specificity: Specificity,
    source_order: usize,
    rule: R,
}

/// A rule whose selector matched, as returned by [`SelectorMap::matching_rules`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchedRule<'map, R> {
    pub selector: &'map Selector,
    pub rule: &'map R,
    pub specificity: Specificity,
    /// Insertion index within the map.
    pub source_order: usize,
}

/// Rules keyed by the element type their selector requires.
#[derive(Clone, Debug)]
pub struct SelectorMap<R> {
    /// Local name -> rules whose selector only matches elements of that name.
    local_name_hash: HashMap<String, Vec<Entry<R>>>,
    /// Rules whose selector can match any element type.
    other: Vec<Entry<R>>,
    count: usize,
}

impl<R> Default for SelectorMap<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SelectorMap<R> {
    pub fn new() -> Self {
        Self {
            local_name_hash: HashMap::new(),
            other: Vec::new(),
            count: 0,
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// File `selector` under its type constraint, or in the shared bucket if it has none.
    pub fn insert(&mut self, selector: Selector, rule: R) {
        let entry = Entry {
            specificity: selector.specificity_triple(),
            source_order: self.count,
            selector,
            rule,
        };
        self.count = self.count.saturating_add(1);
        let bucket = match entry.selector.matches_only_on_a_specific_type() {
            Some(type_selector) => self
                .local_name_hash
                .entry(type_selector.name.clone())
                .or_default(),
            None => &mut self.other,
        };
        bucket.push(entry);
    }

    /// Every stored selector that could match an element named `local_name`: its own bucket
    /// followed by the unrestricted ones.
    pub fn candidates<'map>(
        &'map self,
        local_name: &str,
    ) -> impl Iterator<Item = (&'map Selector, &'map R)> + 'map {
        self.local_name_hash
            .get(local_name)
            .into_iter()
            .flatten()
            .chain(&self.other)
            .map(|entry| (&entry.selector, &entry.rule))
    }

    /// Rules matching `element`, in cascade order: ascending flattened specificity (the weight
    /// [`SelectorGroup::match_selector`](crate::SelectorGroup::match_selector) compares), then
    /// insertion order.
    pub fn matching_rules<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: M::Element,
        local_name: &str,
    ) -> Vec<MatchedRule<'_, R>> {
        let mut matched: Vec<MatchedRule<'_, R>> = self
            .local_name_hash
            .get(local_name)
            .into_iter()
            .flatten()
            .chain(&self.other)
            .filter(|entry| entry.selector.matches(model, element))
            .map(|entry| MatchedRule {
                selector: &entry.selector,
                rule: &entry.rule,
                specificity: entry.specificity,
                source_order: entry.source_order,
            })
            .collect();
        matched.sort_unstable_by_key(|rule| (rule.specificity.value(), rule.source_order));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Namespace, SimpleSelector, TypeSelector};

    fn named(name: &str) -> SimpleSelector {
        SimpleSelector::Type(TypeSelector::new(name))
    }

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.to_owned())
    }

    /// # Panics
    /// Panics if a rule lands in the wrong bucket.
    #[test]
    fn rules_are_bucketed_by_type() {
        let mut map = SelectorMap::new();
        map.insert(Selector::and(named("p"), class("lead")), "lead");
        map.insert(class("note").into(), "note");
        map.insert(Selector::child(named("div"), named("span")), "span");
        assert_eq!(map.len(), 3);

        let for_p: Vec<_> = map.candidates("p").map(|(_, rule)| *rule).collect();
        assert_eq!(for_p, vec!["lead", "note"]);
        let for_span: Vec<_> = map.candidates("span").map(|(_, rule)| *rule).collect();
        assert_eq!(for_span, vec!["span", "note"]);
        let for_div: Vec<_> = map.candidates("div").map(|(_, rule)| *rule).collect();
        assert_eq!(for_div, vec!["note"]);
    }

    /// A lone `<p id="x">` that carries every class.
    struct Tagged;

    impl SelectorModel for Tagged {
        type Element = ();

        fn has_type(&self, _element: (), _namespace: &Namespace, name: &str) -> bool {
            name == "p"
        }
        fn has_id(&self, _element: (), id: &str) -> bool {
            id == "x"
        }
        fn has_style_class(&self, _element: (), _class: &str) -> bool {
            true
        }
        fn has_pseudo_class(&self, _element: (), _name: &str) -> bool {
            false
        }
        fn attribute_value(&self, _element: (), _namespace: &Namespace, _name: &str) -> Option<&str> {
            None
        }
        fn parent(&self, _element: ()) -> Option<()> {
            None
        }
        fn previous_sibling(&self, _element: ()) -> Option<()> {
            None
        }
    }

    /// # Panics
    /// Panics if rules are not ordered by flattened weight.
    #[test]
    fn cascade_order_uses_flattened_weight() {
        let many_classes = (1..11).fold(Selector::from(class("c0")), |inner, index| {
            Selector::and(class(&format!("c{index}")), inner)
        });
        assert_eq!(many_classes.specificity_triple(), Specificity(0, 11, 0));
        let mut map = SelectorMap::new();
        map.insert(many_classes, "classes");
        map.insert(SimpleSelector::Id("x".into()).into(), "id");
        let order: Vec<_> = map
            .matching_rules(&Tagged, (), "p")
            .iter()
            .map(|matched| (*matched.rule, matched.specificity.value()))
            .collect();
        assert_eq!(order, vec![("id", 100), ("classes", 110)]);
    }

    /// # Panics
    /// Panics if an empty map reports entries.
    #[test]
    fn empty_map() {
        let map: SelectorMap<()> = SelectorMap::default();
        assert!(map.is_empty());
        assert_eq!(map.candidates("p").count(), 0);
    }
}
