//! Helpers for building filter sets from UI actions.

use crate::config::FilterConfig;

use super::filter_set::{FilterSet, FREE_TEXT_KEY};
use super::parser::{is_group_name_char, FilterParser, ParsedSearch};
use super::term::{equals_ignore_case, exact_term, is_modifier_only};

/// Parses, toggles and inspects filter sets for one list view.
#[derive(Debug, Clone, Default)]
pub struct FilterHandlers {
    parser: FilterParser,
}

impl FilterHandlers {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            parser: FilterParser::new(config),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        self.parser.config()
    }

    pub fn parser(&self) -> &FilterParser {
        &self.parser
    }

    /// Returns a new empty filter set.
    pub fn empty_filters(&self) -> FilterSet {
        FilterSet::new()
    }

    pub fn current_filters(&self, search: &str) -> ParsedSearch {
        self.parser.parse_search(search)
    }

    /// Returns a copy of `filters` with `value` added to or removed from `key`.
    ///
    /// Presence is decided case-insensitively. With `should_exist` unset the
    /// value is flipped; `Some(true)` only adds and `Some(false)` only removes.
    /// A key left without terms is removed. Toggling a prefixed filter name
    /// toggles the `prefix-value` key instead.
    ///
    /// Free text is toggled word by word. Values the search string cannot
    /// carry are skipped: empty values, `,` or `)` inside a group, and free
    /// text words that would parse as a key.
    pub fn toggle_filter(
        &self,
        filters: &FilterSet,
        key: &str,
        value: &str,
        exact: bool,
        should_exist: Option<bool>,
    ) -> FilterSet {
        let mut next = filters.clone();
        if let Some(prefixed) = self.config().prefixed_filter(key) {
            let prefixed_key = prefixed.key_for(value);
            if is_storable_key(&prefixed_key) {
                toggle_prefixed_filter(&mut next, &prefixed_key, should_exist);
            } else {
                tracing::debug!(key, value, "skipped unstorable prefixed filter");
            }
            return next;
        }

        if key == FREE_TEXT_KEY {
            for word in value.split_whitespace() {
                let term = marked_term(word, exact);
                if self.is_storable_free_text(&term) {
                    toggle_term(&mut next, key, term, should_exist);
                } else {
                    tracing::debug!(term = %term, "skipped unstorable free text");
                }
            }
            return next;
        }

        let term = marked_term(value, exact);
        if is_storable_key(key) && self.is_storable_group_term(key, &term) {
            toggle_term(&mut next, key, term, should_exist);
        } else {
            tracing::debug!(key, term = %term, "skipped unstorable filter value");
        }
        next
    }

    /// Whether `value` (with the exact marker when `exact`) is in `key`.
    ///
    /// For a prefixed filter name this is true when any key using the
    /// prefix exists, whatever `value` is.
    pub fn is_filter_active(
        &self,
        filters: &FilterSet,
        key: &str,
        value: &str,
        exact: bool,
    ) -> bool {
        if let Some(prefixed) = self.config().prefixed_filter(key) {
            return filters.keys().any(|existing| prefixed.owns_key(existing));
        }
        term_index(filters, key, &marked_term(value, exact)).is_some()
    }

    /// Whether the specific `prefix-value` key of a prefixed filter exists.
    pub fn is_prefixed_key_active(&self, filters: &FilterSet, filter: &str, value: &str) -> bool {
        self.config()
            .prefixed_filter(filter)
            .is_some_and(|prefixed| filters.contains_key(&prefixed.key_for(value)))
    }

    /// A free-text word must stay a single bare word when parsed back.
    fn is_storable_free_text(&self, term: &str) -> bool {
        !term.contains([':', ','])
            && !is_modifier_only(term)
            && !self.config().is_prefixed_key(term)
    }

    /// A group term must not close the group or split into two terms.
    /// Only prefixed keys may hold the empty term.
    fn is_storable_group_term(&self, key: &str, term: &str) -> bool {
        if term.contains([',', ')']) {
            return false;
        }
        !term.is_empty() || self.config().is_prefixed_key(key)
    }
}

fn marked_term(value: &str, exact: bool) -> String {
    if exact {
        exact_term(value)
    } else {
        value.to_string()
    }
}

fn is_storable_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_group_name_char)
}

fn term_index(filters: &FilterSet, key: &str, term: &str) -> Option<usize> {
    let expected = term.to_lowercase();
    filters
        .terms(key)?
        .iter()
        .position(|existing| equals_ignore_case(existing, &expected))
}

fn toggle_term(filters: &mut FilterSet, key: &str, term: String, should_exist: Option<bool>) {
    match term_index(filters, key, &term) {
        None => {
            if should_exist.unwrap_or(true) {
                filters.terms_mut(key).push(term);
            }
        }
        Some(index) => {
            if !should_exist.unwrap_or(false) {
                filters.terms_mut(key).remove(index);
                filters.drop_if_empty(key);
            }
        }
    }
}

fn toggle_prefixed_filter(filters: &mut FilterSet, key: &str, should_exist: Option<bool>) {
    let exists = filters.contains_key(key);
    match (exists, should_exist.unwrap_or(!exists)) {
        (false, true) => filters.set_terms(key, vec![String::new()]),
        (true, false) => {
            filters.remove(key);
        }
        _ => {}
    }
}
