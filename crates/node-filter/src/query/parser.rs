//! Search string tokenizer and parser.

use std::str::FromStr;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};

use super::filter_set::FilterSet;
use super::term::{is_modifier_only, negated_term};

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueryToken<'a> {
    kind: QueryTokenKind,
    text: &'a str,
    position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryTokenKind {
    /// `name:(...)`, possibly containing whitespace.
    Group,
    /// Any other run of non-whitespace.
    Bare,
}

// ---------------------------------------------------------------------------
// Parse outcome
// ---------------------------------------------------------------------------

/// The state of a parsed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// At least one key carries a term.
    WithTerms,
    /// The search parsed but filters nothing.
    Empty,
    /// The search could not be parsed and matches nothing.
    Invalid,
}

/// A parsed search: either a filter set or the "no filters matched" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSearch {
    Valid(FilterSet),
    Invalid(FilterError),
}

impl ParsedSearch {
    pub fn state(&self) -> SearchState {
        match self {
            Self::Valid(filters) if filters.is_empty() => SearchState::Empty,
            Self::Valid(_) => SearchState::WithTerms,
            Self::Invalid(_) => SearchState::Invalid,
        }
    }

    pub fn filters(&self) -> Option<&FilterSet> {
        match self {
            Self::Valid(filters) => Some(filters),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the filters, or an empty set when the search was invalid.
    pub fn into_filters_or_empty(self) -> FilterSet {
        match self {
            Self::Valid(filters) => filters,
            Self::Invalid(_) => FilterSet::new(),
        }
    }
}

impl From<Result<FilterSet>> for ParsedSearch {
    fn from(result: Result<FilterSet>) -> Self {
        match result {
            Ok(filters) => Self::Valid(filters),
            Err(error) => Self::Invalid(error),
        }
    }
}

impl From<FilterSet> for ParsedSearch {
    fn from(filters: FilterSet) -> Self {
        Self::Valid(filters)
    }
}

impl FromStr for FilterSet {
    type Err = FilterError;

    /// Parses without prefixed filters; use [`FilterParser`] to configure them.
    fn from_str(input: &str) -> Result<Self> {
        FilterParser::default().parse(input)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    config: FilterConfig,
}

impl FilterParser {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Parses a raw search string into a filter set.
    ///
    /// Dangling `name:` expressions are dropped. A group that opens with a
    /// value but never closes fails the whole search.
    pub fn parse(&self, input: &str) -> Result<FilterSet> {
        let mut filters = FilterSet::new();
        for token in tokenize_search_input(input) {
            tracing::trace!(kind = ?token.kind, text = token.text, "search token");
            self.apply_token(&mut filters, token)?;
        }
        Ok(filters)
    }

    /// Parses a raw search string into the tri-state [`ParsedSearch`].
    pub fn parse_search(&self, input: &str) -> ParsedSearch {
        let parsed = ParsedSearch::from(self.parse(input));
        if let ParsedSearch::Invalid(error) = &parsed {
            tracing::debug!(%error, search = input, "search rejected");
        }
        parsed
    }

    fn apply_token(&self, filters: &mut FilterSet, token: QueryToken<'_>) -> Result<()> {
        let Some(split) = token.text.find(':') else {
            if is_modifier_only(token.text) {
                return Ok(());
            }
            if self.config.is_prefixed_key(token.text) {
                // `workload-env` matches any record with that annotation.
                filters.set_terms(token.text, vec![String::new()]);
            } else {
                filters.push_free_text(token.text);
            }
            return Ok(());
        };

        let name = &token.text[..split];
        let raw_values = &token.text[split + 1..];
        if name.is_empty() || raw_values.is_empty() {
            return Ok(());
        }

        let (values, negate_all) = if raw_values.starts_with("!(") {
            (&raw_values[1..], true)
        } else if raw_values.starts_with("!!(") {
            (&raw_values[2..], false)
        } else {
            (raw_values, false)
        };

        let inner = match (values.starts_with('('), values.ends_with(')')) {
            (true, true) => &values[1..values.len() - 1],
            (true, false) => {
                let inner = &values[1..];
                if has_no_value(inner) {
                    return Ok(());
                }
                return Err(FilterError::UnterminatedGroup {
                    key: name.to_string(),
                    position: token.position,
                });
            }
            (false, true) => return Ok(()),
            (false, false) => values,
        };

        if inner.is_empty() {
            if self.config.is_prefixed_key(name) {
                filters.set_terms(name, vec![String::new()]);
            }
            return Ok(());
        }

        let terms = inner
            .split(',')
            .map(|value| {
                if negate_all {
                    negated_term(value)
                } else {
                    value.to_string()
                }
            })
            .collect::<Vec<_>>();
        filters.set_terms(name, terms);
        Ok(())
    }
}

fn has_no_value(inner: &str) -> bool {
    inner.chars().all(|ch| matches!(ch, '!' | '=' | ','))
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn tokenize_search_input(input: &str) -> Vec<QueryToken<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    while let Some(ch) = input[cursor..].chars().next() {
        if ch.is_whitespace() {
            cursor += ch.len_utf8();
            continue;
        }

        let position = cursor;
        if let Some(end) = group_token_end(input, cursor) {
            tokens.push(QueryToken {
                kind: QueryTokenKind::Group,
                text: &input[cursor..end],
                position,
            });
            cursor = end;
            continue;
        }

        let end = input[cursor..]
            .find(char::is_whitespace)
            .map_or(input.len(), |offset| cursor + offset);
        tokens.push(QueryToken {
            kind: QueryTokenKind::Bare,
            text: &input[cursor..end],
            position,
        });
        cursor = end;
    }

    tokens
}

/// Characters allowed in the name of a `name:(...)` group.
///
/// `.` is included so dotted attribute paths (`zone.name`) can hold groups.
pub(crate) fn is_group_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

/// Returns the end of a `name:(...)` group starting at `start`, if any.
///
/// The colon may be followed by any number of `!`, and the group runs to
/// the first `)`.
fn group_token_end(input: &str, start: usize) -> Option<usize> {
    let rest = &input[start..];
    let name_len = rest
        .find(|ch: char| !is_group_name_char(ch))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let after_name = rest[name_len..].strip_prefix(':')?;
    let after_bangs = after_name.trim_start_matches('!');
    let group = after_bangs.strip_prefix('(')?;
    let close = group.find(')')?;

    let consumed = rest.len() - group.len() + close + 1;
    Some(start + consumed)
}
