//! Attribute resolution for records.

use std::borrow::Cow;

use serde_json::Value;

use crate::types::AttributeValue;

/// Maps a record and an attribute name to a filterable value.
///
/// Resolvers may expose derived attributes that are not fields of the
/// record, such as `cpu` for `cpu_count` or `release` combining two fields.
pub trait AttributeResolver<R: ?Sized> {
    /// Identifier checked against the selection for `in:selected`.
    fn record_id<'r>(&self, record: &'r R) -> Option<Cow<'r, str>>;

    /// Resolves `attribute`, or `None` when the record does not support it.
    fn resolve<'r>(&self, record: &'r R, attribute: &str) -> Option<AttributeValue<'r>>;

    /// Attribute names scanned by free-text terms.
    fn attribute_names<'r>(&self, record: &'r R) -> Vec<Cow<'r, str>>;
}

impl<R: ?Sized, A: AttributeResolver<R> + ?Sized> AttributeResolver<R> for &A {
    fn record_id<'r>(&self, record: &'r R) -> Option<Cow<'r, str>> {
        (**self).record_id(record)
    }

    fn resolve<'r>(&self, record: &'r R, attribute: &str) -> Option<AttributeValue<'r>> {
        (**self).resolve(record, attribute)
    }

    fn attribute_names<'r>(&self, record: &'r R) -> Vec<Cow<'r, str>> {
        (**self).attribute_names(record)
    }
}

/// Resolver for plain JSON object records.
///
/// Attributes are top-level keys; a dotted name such as `zone.name` walks
/// into nested objects.
#[derive(Debug, Clone)]
pub struct JsonResolver {
    id_field: String,
}

impl JsonResolver {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    fn lookup<'r>(record: &'r Value, attribute: &str) -> Option<&'r Value> {
        if let Some(value) = record.get(attribute) {
            return Some(value);
        }
        if !attribute.contains('.') {
            return None;
        }
        attribute
            .split('.')
            .try_fold(record, |current, segment| current.get(segment))
    }
}

impl Default for JsonResolver {
    fn default() -> Self {
        Self::new("id")
    }
}

impl AttributeResolver<Value> for JsonResolver {
    fn record_id<'r>(&self, record: &'r Value) -> Option<Cow<'r, str>> {
        match record.get(self.id_field.as_str())? {
            Value::String(id) => Some(Cow::Borrowed(id.as_str())),
            Value::Number(id) => Some(Cow::Owned(id.to_string())),
            _ => None,
        }
    }

    fn resolve<'r>(&self, record: &'r Value, attribute: &str) -> Option<AttributeValue<'r>> {
        Self::lookup(record, attribute).map(AttributeValue::from_json)
    }

    fn attribute_names<'r>(&self, record: &'r Value) -> Vec<Cow<'r, str>> {
        record
            .as_object()
            .map(|fields| {
                fields
                    .keys()
                    .map(|key| Cow::Borrowed(key.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_top_level_fields() {
        let record = json!({"hostname": "name", "cpu_count": 4});
        let resolver = JsonResolver::default();
        assert_eq!(
            resolver.resolve(&record, "hostname"),
            Some(AttributeValue::from("name"))
        );
        assert_eq!(
            resolver.resolve(&record, "cpu_count"),
            Some(AttributeValue::Int(4))
        );
        assert_eq!(resolver.resolve(&record, "missing"), None);
    }

    #[test]
    fn resolves_dotted_paths() {
        let record = json!({"zone": {"id": 1, "name": "first"}});
        let resolver = JsonResolver::default();
        assert_eq!(
            resolver.resolve(&record, "zone.name"),
            Some(AttributeValue::from("first"))
        );
        assert_eq!(resolver.resolve(&record, "zone.missing"), None);
        assert_eq!(resolver.resolve(&record, "zone"), Some(AttributeValue::Other));
    }

    #[test]
    fn record_ids_accept_strings_and_numbers() {
        let resolver = JsonResolver::new("system_id");
        assert_eq!(
            resolver.record_id(&json!({"system_id": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            resolver.record_id(&json!({"system_id": 7})).as_deref(),
            Some("7")
        );
        assert_eq!(resolver.record_id(&json!({"other": 7})), None);
    }

    #[test]
    fn attribute_names_are_object_keys() {
        let record = json!({"hostname": "name", "tags": []});
        let mut names = JsonResolver::default().attribute_names(&record);
        names.sort();
        assert_eq!(names, vec!["hostname", "tags"]);
        assert!(JsonResolver::default().attribute_names(&json!([1])).is_empty());
    }
}
