//! Search query language for list views.
//!
//! This module provides:
//! - The filter set type and its canonical string form
//! - Search string parsing, including the invalid-search sentinel
//! - Filter term modifiers (`!` negation, `=` exact)
//! - Toggle and is-active helpers for UI actions
//! - URL query string conversion

mod filter_set;
mod handlers;
mod parser;
mod query_string;
mod term;

pub use filter_set::{FilterSet, FREE_TEXT_KEY, SELECTION_KEY};
pub use handlers::FilterHandlers;
pub use parser::{FilterParser, ParsedSearch, SearchState};
pub use query_string::{filters_to_query_string, query_string_to_filters};
pub use term::{exact_term, negated_term, strip_modifiers, FilterTerm};

pub(crate) use term::{contains_ignore_case, equals_ignore_case};
