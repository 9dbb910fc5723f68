//! Term matching and the per-attribute veto rule.

use crate::query::{contains_ignore_case, equals_ignore_case, FilterTerm};
use crate::types::AttributeValue;

use super::resolver::AttributeResolver;

/// A filter term prepared once per key, before records are scanned.
#[derive(Debug, Clone)]
pub(crate) struct CompiledTerm {
    needle: String,
    number: Option<f64>,
    integer: Option<i64>,
    negated: bool,
    exact: bool,
}

impl CompiledTerm {
    pub fn new(raw: &str) -> Self {
        let term = FilterTerm::parse(raw);
        Self {
            needle: term.value.to_lowercase(),
            number: parse_number(term.value),
            integer: term.value.trim().parse::<i64>().ok(),
            negated: term.negated,
            exact: term.exact,
        }
    }

    /// Tests one resolved value, element-wise for lists.
    pub fn matches_value(&self, value: &AttributeValue<'_>) -> bool {
        match value {
            AttributeValue::Int(value) => {
                let Some(number) = self.number else {
                    return false;
                };
                if !self.exact {
                    return *value as f64 >= number;
                }
                match self.integer {
                    Some(integer) => *value == integer,
                    None => *value as f64 == number,
                }
            }
            AttributeValue::Float(value) => {
                let Some(number) = self.number else {
                    return false;
                };
                if self.exact {
                    *value == number
                } else {
                    *value >= number
                }
            }
            AttributeValue::Text(text) => {
                if self.exact {
                    equals_ignore_case(text, &self.needle)
                } else {
                    contains_ignore_case(text, &self.needle)
                }
            }
            AttributeValue::List(items) => items.iter().any(|item| self.matches_value(item)),
            AttributeValue::Other => false,
        }
    }
}

/// Strict numeric parse: the whole term must be a finite number.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Accumulates the `matched` / `exclude` flags for one attribute.
#[derive(Debug, Default, Clone, Copy)]
struct VetoState {
    matched: bool,
    exclude: bool,
}

impl VetoState {
    fn record(&mut self, is_match: bool, negated: bool) {
        match (is_match, negated) {
            (true, true) => self.exclude = true,
            (true, false) | (false, true) => self.matched = true,
            (false, false) => {}
        }
    }

    fn passes(self) -> bool {
        self.matched && !self.exclude
    }
}

/// Applies every term of a key to one resolved value.
///
/// A negated term that matches vetoes the record even if an earlier
/// positive term matched. A negated term that does not match counts as a
/// match. An unresolved value never matches a term.
pub(crate) fn attribute_passes(value: Option<&AttributeValue<'_>>, terms: &[CompiledTerm]) -> bool {
    let mut state = VetoState::default();
    for term in terms {
        let is_match = value.is_some_and(|value| term.matches_value(value));
        state.record(is_match, term.negated);
        if state.exclude {
            break;
        }
    }
    state.passes()
}

/// Applies one free-text term across every attribute of a record.
///
/// A positive term passes when any attribute matches, a negated term when
/// none does. A record exposing no attributes therefore passes every
/// negated term and fails every positive one.
pub(crate) fn free_text_passes<R: ?Sized, A: AttributeResolver<R>>(
    record: &R,
    term: &CompiledTerm,
    resolver: &A,
) -> bool {
    let any_match = resolver.attribute_names(record).iter().any(|name| {
        resolver
            .resolve(record, name)
            .is_some_and(|value| term.matches_value(&value))
    });
    any_match != term.negated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::JsonResolver;

    fn compiled(terms: &[&str]) -> Vec<CompiledTerm> {
        terms.iter().map(|term| CompiledTerm::new(term)).collect()
    }

    fn text(value: &str) -> AttributeValue<'_> {
        AttributeValue::from(value)
    }

    fn list<'a>(values: &[&'a str]) -> AttributeValue<'a> {
        AttributeValue::List(values.iter().map(|value| AttributeValue::from(*value)).collect())
    }

    #[test]
    fn text_contains_ignoring_case() {
        let term = CompiledTerm::new("NAM");
        assert!(term.matches_value(&text("hostname")));
        assert!(!term.matches_value(&text("other")));
    }

    #[test]
    fn text_exact_requires_equality() {
        let term = CompiledTerm::new("=Other");
        assert!(term.matches_value(&text("other")));
        assert!(!term.matches_value(&text("other2")));
    }

    #[test]
    fn integers_use_threshold_unless_exact() {
        let at_least = CompiledTerm::new("3");
        assert!(at_least.matches_value(&AttributeValue::Int(4)));
        assert!(at_least.matches_value(&AttributeValue::Int(3)));
        assert!(!at_least.matches_value(&AttributeValue::Int(2)));

        let exact = CompiledTerm::new("=1");
        assert!(exact.matches_value(&AttributeValue::Int(1)));
        assert!(!exact.matches_value(&AttributeValue::Int(2)));
    }

    #[test]
    fn floats_use_threshold_unless_exact() {
        let at_least = CompiledTerm::new("1.5");
        assert!(at_least.matches_value(&AttributeValue::Float(2.2)));
        assert!(!at_least.matches_value(&AttributeValue::Float(1.1)));

        let exact = CompiledTerm::new("=1.5");
        assert!(exact.matches_value(&AttributeValue::Float(1.5)));
        assert!(!exact.matches_value(&AttributeValue::Float(2.2)));
    }

    #[test]
    fn exact_float_term_against_integer() {
        assert!(CompiledTerm::new("=2.0").matches_value(&AttributeValue::Int(2)));
        assert!(!CompiledTerm::new("=2.5").matches_value(&AttributeValue::Int(2)));
    }

    #[test]
    fn non_numeric_terms_never_match_numbers() {
        for raw in ["1nam", "", "nan", "inf", "="] {
            let term = CompiledTerm::new(raw);
            assert!(!term.matches_value(&AttributeValue::Int(1)), "term: {raw:?}");
            assert!(!term.matches_value(&AttributeValue::Float(1.0)), "term: {raw:?}");
        }
    }

    #[test]
    fn lists_match_any_element() {
        let term = CompiledTerm::new("first");
        assert!(term.matches_value(&list(&["name", "first"])));
        assert!(!term.matches_value(&list(&["other", "second"])));
        assert!(!term.matches_value(&list(&[])));
    }

    #[test]
    fn other_values_never_match() {
        assert!(!CompiledTerm::new("").matches_value(&AttributeValue::Other));
    }

    #[test]
    fn or_list_of_positive_terms() {
        let terms = compiled(&["a", "b"]);
        assert!(attribute_passes(Some(&list(&["b"])), &terms));
        assert!(!attribute_passes(Some(&list(&["c"])), &terms));
    }

    #[test]
    fn and_of_negative_terms() {
        let terms = compiled(&["!a", "!b"]);
        assert!(attribute_passes(Some(&list(&["c"])), &terms));
        assert!(!attribute_passes(Some(&list(&["b", "c"])), &terms));
    }

    #[test]
    fn positive_match_does_not_immunize_against_veto() {
        let terms = compiled(&["a", "!b"]);
        assert!(attribute_passes(Some(&list(&["a"])), &terms));
        assert!(!attribute_passes(Some(&list(&["a", "b"])), &terms));
    }

    #[test]
    fn same_value_positive_and_negative_is_vetoed() {
        let terms = compiled(&["x", "!x"]);
        assert!(!attribute_passes(Some(&text("x")), &terms));
    }

    #[test]
    fn double_negation_is_positive() {
        let terms = compiled(&["!!x"]);
        assert!(attribute_passes(Some(&text("x")), &terms));
        assert!(!attribute_passes(Some(&text("y")), &terms));
    }

    #[test]
    fn unresolved_values_never_match_or_veto() {
        assert!(!attribute_passes(None, &compiled(&["x"])));
        assert!(attribute_passes(None, &compiled(&["!x"])));
    }

    #[test]
    fn free_text_on_record_without_attributes() {
        let record = serde_json::json!({});
        let resolver = JsonResolver::default();
        assert!(free_text_passes(&record, &CompiledTerm::new("!foo"), &resolver));
        assert!(!free_text_passes(&record, &CompiledTerm::new("foo"), &resolver));
    }

    #[test]
    fn free_text_scans_every_attribute() {
        let record = serde_json::json!({"hostname": "name", "status": "New"});
        let resolver = JsonResolver::default();
        assert!(free_text_passes(&record, &CompiledTerm::new("new"), &resolver));
        assert!(!free_text_passes(&record, &CompiledTerm::new("!new"), &resolver));
        assert!(free_text_passes(&record, &CompiledTerm::new("!other"), &resolver));
    }

    #[test]
    fn empty_term_list_does_not_pass() {
        assert!(!attribute_passes(Some(&text("x")), &[]));
    }
}
