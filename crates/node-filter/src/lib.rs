//! Search filters for the machine list and the other list views.
//!
//! This crate provides:
//! - The search query language: parsing, canonical serialization, toggle
//!   helpers and URL query strings
//! - Filter evaluation over in-memory records with veto semantics
//! - Attribute resolvers for JSON records and machines
//! - A per-view store of the last used filters

pub mod config;
pub mod error;
pub mod machine;
pub mod query;
pub mod search;
pub mod store;
pub mod types;

// Re-export main types
pub use config::{FilterConfig, PrefixedFilter};
pub use error::{FilterError, Result};
pub use machine::{Machine, MachineResolver, ModelRef};
pub use query::{
    filters_to_query_string, query_string_to_filters, FilterHandlers, FilterParser, FilterSet,
    ParsedSearch, SearchState,
};
pub use search::{apply_filters, filter_records, AttributeResolver, FilterEngine, JsonResolver};
pub use store::FilterStore;
pub use types::{AttributeValue, Selection};
