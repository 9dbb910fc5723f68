//! Filter evaluation over record lists.

use crate::query::{
    FilterHandlers, FilterSet, FilterTerm, ParsedSearch, FREE_TEXT_KEY, SELECTION_KEY,
};
use crate::types::Selection;

use super::matcher::{attribute_passes, free_text_passes, CompiledTerm};
use super::resolver::AttributeResolver;

const SELECTED_TERM: &str = "selected";

/// Returns the records of `records` that satisfy `search`, in input order.
///
/// An invalid search matches nothing; a search without terms matches
/// everything.
pub fn filter_records<'r, R, A>(
    records: &'r [R],
    search: &ParsedSearch,
    selected: &Selection,
    resolver: &A,
) -> Vec<&'r R>
where
    A: AttributeResolver<R>,
{
    match search {
        ParsedSearch::Valid(filters) => apply_filters(records, filters, selected, resolver),
        ParsedSearch::Invalid(err) => {
            tracing::debug!(error = %err, "invalid search matches no records");
            Vec::new()
        }
    }
}

/// Returns the records that pass every active key of `filters`.
///
/// Keys are combined with AND. Within a key the terms follow the veto rule,
/// except free text where every term must pass on its own.
pub fn apply_filters<'r, R, A>(
    records: &'r [R],
    filters: &FilterSet,
    selected: &Selection,
    resolver: &A,
) -> Vec<&'r R>
where
    A: AttributeResolver<R>,
{
    let mut remaining: Vec<&'r R> = records.iter().collect();

    for (key, terms) in filters.active() {
        if remaining.is_empty() {
            break;
        }
        let before = remaining.len();

        match key {
            FREE_TEXT_KEY => {
                for term in terms.iter().map(|raw| CompiledTerm::new(raw)) {
                    remaining.retain(|record| free_text_passes(*record, &term, resolver));
                }
            }
            SELECTION_KEY => match selection_requirement(terms) {
                Some(wanted) => remaining.retain(|record| {
                    let is_selected = resolver
                        .record_id(record)
                        .is_some_and(|id| selected.contains(&id));
                    is_selected == wanted
                }),
                // `in:` without a recognized term leaves nothing to match.
                None => remaining.clear(),
            },
            _ => {
                let compiled: Vec<CompiledTerm> =
                    terms.iter().map(|raw| CompiledTerm::new(raw)).collect();
                remaining.retain(|record| {
                    let value = resolver.resolve(record, key);
                    attribute_passes(value.as_ref(), &compiled)
                });
            }
        }

        tracing::trace!(key, before, after = remaining.len(), "applied filter key");
    }

    remaining
}

/// Whether an `in:` key asks for selected records.
///
/// The last `selected` term wins, `!selected` asks for unselected records.
/// `None` when no term names the selection.
fn selection_requirement(terms: &[String]) -> Option<bool> {
    terms.iter().rev().find_map(|raw| {
        let term = FilterTerm::parse(raw);
        term.value
            .eq_ignore_ascii_case(SELECTED_TERM)
            .then_some(!term.negated)
    })
}

/// Parses searches and filters records with one resolver.
#[derive(Debug, Clone)]
pub struct FilterEngine<A> {
    handlers: FilterHandlers,
    resolver: A,
}

impl<A> FilterEngine<A> {
    pub fn new(handlers: FilterHandlers, resolver: A) -> Self {
        Self { handlers, resolver }
    }

    pub fn handlers(&self) -> &FilterHandlers {
        &self.handlers
    }

    pub fn resolver(&self) -> &A {
        &self.resolver
    }

    /// Parses `search` once and filters `records` with it.
    pub fn search<'r, R>(&self, records: &'r [R], search: &str, selected: &Selection) -> Vec<&'r R>
    where
        A: AttributeResolver<R>,
    {
        let parsed = self.handlers.current_filters(search);
        let matches = filter_records(records, &parsed, selected, &self.resolver);
        tracing::debug!(
            total = records.len(),
            matched = matches.len(),
            state = ?parsed.state(),
            "filtered records"
        );
        matches
    }
}
