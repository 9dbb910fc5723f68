//! Query language configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Filter name used by the console for machine workload annotations.
pub const WORKLOAD_ANNOTATIONS_FILTER: &str = "workload_annotations";
/// Key prefix for individual workload annotation filters (`workload-env`).
pub const WORKLOAD_PREFIX: &str = "workload";

/// A filter whose values are stored as separate prefixed keys.
///
/// Toggling `workload_annotations` with the value `env` produces the key
/// `workload-env`, whose single empty term matches any record carrying that
/// annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixedFilter {
    pub filter: String,
    pub prefix: String,
}

impl PrefixedFilter {
    pub fn new(filter: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            prefix: prefix.into(),
        }
    }

    /// Returns true if `key` is one of this filter's prefixed keys.
    pub fn owns_key(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }

    /// Builds the prefixed key for `value`, leaving already prefixed values alone.
    pub fn key_for(&self, value: &str) -> String {
        if self.owns_key(value) {
            value.to_string()
        } else {
            format!("{}-{value}", self.prefix)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub prefixed_filters: Vec<PrefixedFilter>,
}

impl FilterConfig {
    /// Configuration used by the machine list.
    pub fn machines() -> Self {
        Self {
            prefixed_filters: vec![PrefixedFilter::new(
                WORKLOAD_ANNOTATIONS_FILTER,
                WORKLOAD_PREFIX,
            )],
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        tracing::debug!(
            prefixed_filters = config.prefixed_filters.len(),
            "loaded filter config"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for prefixed in &self.prefixed_filters {
            if prefixed.filter.trim().is_empty() || prefixed.prefix.trim().is_empty() {
                return Err(FilterError::Config(
                    "prefixed filters require a filter name and a prefix".to_string(),
                ));
            }
            if prefixed.prefix.contains([':', ' ', '(', ')', ',']) {
                return Err(FilterError::Config(format!(
                    "invalid prefix: {}",
                    prefixed.prefix
                )));
            }
        }
        Ok(())
    }

    /// Finds the prefixed filter registered under `filter`.
    pub fn prefixed_filter(&self, filter: &str) -> Option<&PrefixedFilter> {
        self.prefixed_filters
            .iter()
            .find(|prefixed| prefixed.filter == filter)
    }

    /// Returns true if `key` belongs to any prefixed filter.
    pub fn is_prefixed_key(&self, key: &str) -> bool {
        self.prefixed_filters
            .iter()
            .any(|prefixed| prefixed.owns_key(key))
    }
}
