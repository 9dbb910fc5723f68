//! In-memory store of the last filters used by each list view.

use fnv::FnvHashMap;

use crate::query::FilterSet;

/// Remembers the last filter set per view (`"machines"`, `"devices"`, ...).
///
/// Entries live as long as the store; nothing is persisted.
#[derive(Debug, Clone)]
pub struct FilterStore {
    filters: FnvHashMap<String, FilterSet>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            filters: FnvHashMap::default(),
        }
    }

    /// Stores `filters` for `view`, replacing what was there.
    pub fn store(&mut self, view: impl Into<String>, filters: FilterSet) {
        let view = view.into();
        tracing::debug!(view = %view, search = %filters, "stored filters");
        self.filters.insert(view, filters);
    }

    /// Returns the filters last stored for `view`.
    pub fn retrieve(&self, view: &str) -> Option<&FilterSet> {
        self.filters.get(view)
    }

    /// Removes and returns the filters stored for `view`.
    pub fn remove(&mut self, view: &str) -> Option<FilterSet> {
        self.filters.remove(view)
    }

    /// Forgets every view.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}
