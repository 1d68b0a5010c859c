//! Ordered field/value pairs supplied by the pipeline for one operation.

use serde_json::{Map, Value};

use crate::schema::SchemaProvider;

/// One mapped field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingItem {
    pub key: String,
    pub value: Value,
}

/// Field/value pairs, in the order the pipeline supplied them.
///
/// For selects only the keys matter (they are the projected fields).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    items: Vec<MappingItem>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping that only projects `Id`.
    pub fn ids_only() -> Self {
        Self::new().with("Id", Value::Null)
    }

    /// Append a pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.push(MappingItem {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappingItem> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reduce `Type:Property` keys to `Property`.
    pub fn normalize(self, schema: &dyn SchemaProvider) -> Self {
        self.items
            .into_iter()
            .map(|item| {
                let key = if schema.is_fully_qualified_name(&item.key) {
                    schema.property_name_from_fqn(&item.key).to_string()
                } else {
                    item.key
                };
                (key, item.value)
            })
            .collect()
    }

    /// Write body for create/update.
    ///
    /// With `suppress_blank`, null values and strings that are empty after
    /// trimming are left out so they do not overwrite existing data.
    /// Later duplicates of a key win.
    pub fn to_body(&self, suppress_blank: bool) -> Map<String, Value> {
        let mut body = Map::new();
        for item in &self.items {
            if suppress_blank && is_blank(&item.value) {
                continue;
            }
            body.insert(item.key.clone(), item.value.clone());
        }
        body
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.push(key, value);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a MappingItem;
    type IntoIter = std::slice::Iter<'a, MappingItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
