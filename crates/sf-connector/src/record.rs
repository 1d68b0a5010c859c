//! Record identity and record containers.

use serde_json::{Map, Value};

/// Identity part of a [`RecordKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    /// A concrete Salesforce id.
    Resolved(String),
    /// Placeholder for the record a pending batch fragment will create,
    /// named by that fragment's reference id.
    Deferred(String),
    /// No id; used for failed writes.
    Unassigned,
}

/// Identifies one record: its id (or placeholder) and sObject type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub id: RecordId,
    pub record_type: String,
}

impl RecordKey {
    /// Key for an existing record.
    pub fn resolved(id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: RecordId::Resolved(id.into()),
            record_type: record_type.into(),
        }
    }

    /// Key for a record that a batched fragment will create.
    pub fn deferred(reference_id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: RecordId::Deferred(reference_id.into()),
            record_type: record_type.into(),
        }
    }

    /// Key with no id.
    pub fn unassigned(record_type: impl Into<String>) -> Self {
        Self {
            id: RecordId::Unassigned,
            record_type: record_type.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.id, RecordId::Resolved(_))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.id, RecordId::Deferred(_))
    }

    /// The concrete id, if known.
    pub fn resolved_id(&self) -> Option<&str> {
        match &self.id {
            RecordId::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// The batch reference id, if deferred.
    pub fn reference_id(&self) -> Option<&str> {
        match &self.id {
            RecordId::Deferred(reference) => Some(reference),
            _ => None,
        }
    }

    /// The id as it should appear in a request body.
    ///
    /// Deferred keys render as a composite-graph forward reference
    /// (`@{fa0.id}`), which the server substitutes when a later fragment in
    /// the same graph uses it. Unassigned keys render empty.
    pub fn wire_value(&self) -> String {
        match &self.id {
            RecordId::Resolved(id) => id.clone(),
            RecordId::Deferred(reference) => format!("@{{{}.id}}", reference),
            RecordId::Unassigned => String::new(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.record_type, self.wire_value())
    }
}

/// A record and its field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: RecordKey,
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(key: RecordKey, data: Map<String, Value>) -> Self {
        Self { key, data }
    }

    /// Build a record from a query row.
    ///
    /// The key comes from `Id` and `attributes.type` (falling back to
    /// `default_type`); `attributes` is dropped from the data.
    pub fn from_row(mut row: Map<String, Value>, default_type: &str) -> Self {
        let record_type = row
            .remove("attributes")
            .and_then(|attrs| {
                attrs
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| default_type.to_string());

        let key = match row.get("Id").and_then(Value::as_str) {
            Some(id) => RecordKey::resolved(id, record_type),
            None => RecordKey::unassigned(record_type),
        };

        Self { key, data: row }
    }

    /// Field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

/// Records keyed by (id, type), in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recordset {
    records: Vec<Record>,
}

impl Recordset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing one with the same key.
    pub fn insert(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.key == record.key) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn get(&self, key: &RecordKey) -> Option<&Record> {
        self.records.iter().find(|r| &r.key == key)
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Ids of all records with a concrete id.
    pub fn resolved_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.key.resolved_id().map(str::to_string))
            .collect()
    }
}

impl IntoIterator for Recordset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Recordset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for Recordset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = Recordset::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Outcome record of a batched write.
///
/// `key` is the concrete key on success and unassigned on failure.
/// `resolves` names the deferred key handed out when the write was queued,
/// so the caller can swap its placeholder for the real values.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredRecord {
    pub key: RecordKey,
    pub data: Map<String, Value>,
    pub resolves: RecordKey,
}
