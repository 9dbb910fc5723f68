//! Value types shared by the resolver and the evaluation engine.

use std::borrow::Cow;

use fnv::FnvHashSet;
use serde_json::Value;

/// A resolved attribute value.
///
/// Resolvers borrow from the record where they can; derived attributes
/// (for example `osystem/distro_series`) are owned.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<'a> {
    Int(i64),
    Float(f64),
    Text(Cow<'a, str>),
    List(Vec<AttributeValue<'a>>),
    /// Booleans, objects and nulls. Never matches a term.
    Other,
}

impl<'a> AttributeValue<'a> {
    /// Converts a JSON value without copying strings.
    pub fn from_json(value: &'a Value) -> Self {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map_or(Self::Other, Self::Float),
            },
            Value::String(text) => Self::Text(Cow::Borrowed(text.as_str())),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Null | Value::Bool(_) | Value::Object(_) => Self::Other,
        }
    }

    /// Builds a list of text values borrowed from `items`.
    pub fn text_list(items: &'a [String]) -> Self {
        Self::List(items.iter().map(|item| Self::from(item.as_str())).collect())
    }
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for AttributeValue<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl From<i64> for AttributeValue<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for AttributeValue<'_> {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Identifiers of the records currently selected in a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: FnvHashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
