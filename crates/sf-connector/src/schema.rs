//! Schema lookups the connector needs from its host.
//!
//! Discovery itself lives elsewhere; the connector only asks whether a
//! property is a key and how to strip a record-type prefix from a name.

use std::collections::HashMap;

/// Key flags of one sObject property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Primary or unique (external id) key.
    pub pk: bool,
    /// Foreign key.
    pub fk: bool,
}

/// Read access to the host's schema.
///
/// Fully-qualified names have the form `RecordType:Property`.
pub trait SchemaProvider: Send + Sync {
    /// Properties of `record_type`, or `None` if unknown.
    fn property(&self, record_type: &str, name: &str) -> Option<PropertyInfo>;

    fn is_fully_qualified_name(&self, name: &str) -> bool {
        name.contains(':')
    }

    fn property_name_from_fqn<'a>(&self, name: &'a str) -> &'a str {
        name.rsplit(':').next().unwrap_or(name)
    }
}

/// In-memory schema, filled by hand or from a discovery result.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    properties: HashMap<(String, String), PropertyInfo>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property.
    pub fn with_property(
        mut self,
        record_type: impl Into<String>,
        name: impl Into<String>,
        info: PropertyInfo,
    ) -> Self {
        self.properties
            .insert((record_type.into(), name.into()), info);
        self
    }

    /// Register a primary/unique key property.
    pub fn with_key(self, record_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.with_property(
            record_type,
            name,
            PropertyInfo {
                pk: true,
                fk: false,
            },
        )
    }
}

impl SchemaProvider for StaticSchema {
    fn property(&self, record_type: &str, name: &str) -> Option<PropertyInfo> {
        self.properties
            .get(&(record_type.to_string(), name.to_string()))
            .copied()
    }
}
