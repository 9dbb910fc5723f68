//! Filter evaluation.
//!
//! This module provides:
//! - The attribute resolver seam and a resolver for JSON records
//! - Term matching with per-attribute veto semantics
//! - The engine narrowing record lists one key at a time

mod engine;
mod matcher;
mod resolver;


pub use engine::{apply_filters, filter_records, FilterEngine};
pub use resolver::{AttributeResolver, JsonResolver};
