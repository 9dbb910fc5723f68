//! Filter set: the structured form of a search string.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key holding free-text terms that are not tied to an attribute.
///
/// Chosen so it cannot clash with record attributes and so it doubles as the
/// search parameter name in URLs.
pub const FREE_TEXT_KEY: &str = "q";

/// Key matched against the externally tracked selection.
pub const SELECTION_KEY: &str = "in";

/// Ordered mapping from attribute key to its filter terms.
///
/// Keys keep their insertion order, which only affects serialization. A key
/// with no terms is treated as absent everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: IndexMap<String, Vec<String>>,
}

impl FilterSet {
    /// Returns an empty filter set with an empty free-text list.
    pub fn new() -> Self {
        let mut filters = IndexMap::new();
        filters.insert(FREE_TEXT_KEY.to_string(), Vec::new());
        Self { filters }
    }

    pub fn free_text(&self) -> &[String] {
        self.terms(FREE_TEXT_KEY).unwrap_or_default()
    }

    pub fn push_free_text(&mut self, term: impl Into<String>) {
        self.filters
            .entry(FREE_TEXT_KEY.to_string())
            .or_default()
            .push(term.into());
    }

    /// Returns the terms stored for `key`, if the key is present.
    pub fn terms(&self, key: &str) -> Option<&[String]> {
        self.filters.get(key).map(Vec::as_slice)
    }

    /// Replaces the terms for `key`.
    ///
    /// An empty list removes the key, except for the free-text key which is
    /// always kept.
    pub fn set_terms(&mut self, key: impl Into<String>, terms: Vec<String>) {
        let key = key.into();
        if terms.is_empty() && key != FREE_TEXT_KEY {
            self.filters.shift_remove(&key);
            return;
        }
        self.filters.insert(key, terms);
    }

    /// Removes `key` and returns its terms. Free text is cleared, not removed.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        if key == FREE_TEXT_KEY {
            return self.filters.get_mut(key).map(std::mem::take);
        }
        self.filters.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Iterates keys that carry at least one term, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.filters
            .iter()
            .filter(|(_, terms)| !terms.is_empty())
            .map(|(key, terms)| (key.as_str(), terms.as_slice()))
    }

    /// Returns true if no key carries a term.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub(crate) fn terms_mut(&mut self, key: &str) -> &mut Vec<String> {
        self.filters.entry(key.to_string()).or_default()
    }

    pub(crate) fn drop_if_empty(&mut self, key: &str) {
        if key != FREE_TEXT_KEY && self.filters.get(key).is_some_and(Vec::is_empty) {
            self.filters.shift_remove(key);
        }
    }

    /// Canonical search string: free text first, then `key:(a,b)` groups.
    pub fn to_search_string(&self) -> String {
        self.to_string()
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let free_text = self.free_text();
        if !free_text.is_empty() {
            f.write_str(&free_text.join(" "))?;
            first = false;
        }
        for (key, terms) in self.active() {
            if key == FREE_TEXT_KEY {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{key}:({})", terms.join(","))?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn new_set_has_empty_free_text() {
        let filters = FilterSet::new();
        assert!(filters.contains_key(FREE_TEXT_KEY));
        assert!(filters.free_text().is_empty());
        assert!(filters.is_empty());
        assert_eq!(filters.to_string(), "");
    }

    #[test]
    fn serializes_free_text_before_groups() {
        let mut filters = FilterSet::new();
        filters.set_terms("status", terms(&["new"]));
        filters.push_free_text("moon");
        filters.push_free_text("star");
        assert_eq!(filters.to_string(), "moon star status:(new)");
    }

    #[test]
    fn serializes_groups_in_insertion_order() {
        let mut filters = FilterSet::new();
        filters.set_terms("zone", terms(&["!south"]));
        filters.set_terms("status", terms(&["new", "failed disk erasing"]));
        assert_eq!(
            filters.to_search_string(),
            "zone:(!south) status:(new,failed disk erasing)"
        );
    }

    #[test]
    fn empty_terms_remove_key() {
        let mut filters = FilterSet::new();
        filters.set_terms("status", terms(&["new"]));
        filters.set_terms("status", Vec::new());
        assert!(!filters.contains_key("status"));
    }

    #[test]
    fn free_text_key_survives_removal() {
        let mut filters = FilterSet::new();
        filters.push_free_text("moon");
        assert_eq!(filters.remove(FREE_TEXT_KEY), Some(terms(&["moon"])));
        assert!(filters.contains_key(FREE_TEXT_KEY));
        assert!(filters.free_text().is_empty());
    }

    #[test]
    fn active_skips_empty_lists() {
        let mut filters = FilterSet::new();
        filters.terms_mut("status");
        filters.set_terms("tags", terms(&["a"]));
        let active: Vec<_> = filters.active().map(|(key, _)| key).collect();
        assert_eq!(active, vec!["tags"]);
        assert_eq!(filters.to_string(), "tags:(a)");
    }

    #[test]
    fn serde_uses_plain_map() {
        let mut filters = FilterSet::new();
        filters.set_terms("status", terms(&["new"]));
        let json = serde_json::to_string(&filters).expect("serialize");
        assert_eq!(json, r#"{"q":[],"status":["new"]}"#);
        let back: FilterSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, filters);
    }
}
