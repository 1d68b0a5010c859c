//! Record locators: which records an operation addresses, and what to do
//! when a lookup finds zero or many of them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::query::{Literal, Operator, OrderBy, QueryExpression};
use crate::schema::SchemaProvider;

/// What to do when a lookup finds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoResultPolicy {
    /// Drop this operation and its dependents.
    #[default]
    Skip,
    /// Stop the transaction.
    Abort,
    /// Create a new record instead.
    Create,
}

/// What to do when a lookup finds more than one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManyResultsPolicy {
    /// Take the first row; the query is limited to one row server-side.
    #[default]
    SelectOne,
    /// Act on every row.
    SelectAll,
    Skip,
    Abort,
    Create,
}

/// Kind of load operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationType {
    Select,
    #[default]
    Create,
    Update,
}

/// Alternate unique key addressing one record without a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpsertKey {
    pub name: String,
    pub value: String,
}

/// How an update finds its target records, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateTarget<'a> {
    Ids(&'a [String]),
    Id(&'a str),
    UpsertKey(&'a UpsertKey),
    Lookup(&'a QueryExpression),
    None,
}

/// Identifies the records an operation reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLocator {
    pub record_type: String,
    pub record_id: Option<String>,
    pub record_ids: Vec<String>,
    pub upsert_key: Option<UpsertKey>,
    pub query: Option<QueryExpression>,
    pub order_by: Option<OrderBy>,
    pub on_no_result: NoResultPolicy,
    pub on_many_results: ManyResultsPolicy,
    pub operation: OperationType,
    /// Apply the org's assignment rules on write.
    pub auto_assign: bool,
    /// Save despite duplicate-rule alerts.
    pub auto_acknowledge_duplicates: bool,
    /// Leave null and blank mapping values out of update bodies.
    pub no_blank_fields_on_update: bool,
    /// Position in a repeated section; selects the batch graph.
    pub index: Option<usize>,
}

impl RecordLocator {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            record_id: None,
            record_ids: Vec::new(),
            upsert_key: None,
            query: None,
            order_by: None,
            on_no_result: NoResultPolicy::default(),
            on_many_results: ManyResultsPolicy::default(),
            operation: OperationType::default(),
            auto_assign: true,
            auto_acknowledge_duplicates: true,
            no_blank_fields_on_update: false,
            index: None,
        }
    }

    /// Parse the pipeline's JSON form and infer an upsert key.
    ///
    /// A malformed locator is an [`InvalidOperation`](crate::ErrorKind::InvalidOperation);
    /// a malformed `query.where` keeps its
    /// [`InvalidQuery`](crate::ErrorKind::InvalidQuery).
    pub fn from_value(value: Value, schema: &dyn SchemaProvider) -> Result<Self> {
        let raw: RawLocator = serde_json::from_value(value)
            .map_err(|e| Error::invalid_operation(format!("Invalid record locator: {}", e)))?;
        let mut locator = RecordLocator::try_from(raw)?;
        locator.infer_upsert_key(schema);
        Ok(locator)
    }

    pub fn with_operation(mut self, operation: OperationType) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    pub fn with_record_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_upsert_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.upsert_key = Some(UpsertKey {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_query(mut self, query: QueryExpression) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn with_policies(mut self, no_result: NoResultPolicy, many: ManyResultsPolicy) -> Self {
        self.on_no_result = no_result;
        self.on_many_results = many;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn is_create(&self) -> bool {
        self.operation == OperationType::Create
    }

    pub fn is_update(&self) -> bool {
        self.operation == OperationType::Update
    }

    pub fn is_select(&self) -> bool {
        self.operation == OperationType::Select
    }

    /// The update target, in precedence order ids, id, upsert key, lookup.
    pub fn update_target(&self) -> UpdateTarget<'_> {
        if !self.record_ids.is_empty() {
            UpdateTarget::Ids(&self.record_ids)
        } else if let Some(ref id) = self.record_id {
            UpdateTarget::Id(id)
        } else if let Some(ref key) = self.upsert_key {
            UpdateTarget::UpsertKey(key)
        } else if let Some(ref query) = self.query {
            UpdateTarget::Lookup(query)
        } else {
            UpdateTarget::None
        }
    }

    /// Derive an upsert key from a `key = 'value'` filter.
    ///
    /// Applies when the filter is a single equality leaf with a string value
    /// and the schema marks the (possibly `Type:Prop`) field as a key.
    /// An explicit upsert key is never replaced.
    pub fn infer_upsert_key(&mut self, schema: &dyn SchemaProvider) {
        if self.upsert_key.is_some() {
            return;
        }
        let Some((field, Operator::Eq, Literal::String(value))) =
            self.query.as_ref().and_then(QueryExpression::as_leaf)
        else {
            return;
        };

        let name = if schema.is_fully_qualified_name(field) {
            schema.property_name_from_fqn(field)
        } else {
            field
        };
        let is_key = schema
            .property(&self.record_type, name)
            .is_some_and(|info| info.pk);

        if is_key {
            self.upsert_key = Some(UpsertKey {
                name: name.to_string(),
                value: value.clone(),
            });
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocator {
    record_type: String,
    #[serde(default)]
    record_id: Option<String>,
    #[serde(default)]
    record_ids: Vec<String>,
    #[serde(default)]
    upsert_key: Option<UpsertKey>,
    #[serde(default)]
    query: Option<RawQuery>,
    #[serde(default, alias = "orderByClause")]
    order_by: Option<RawOrderBy>,
    #[serde(default)]
    on_no_result: NoResultPolicy,
    #[serde(default)]
    on_many_results: ManyResultsPolicy,
    #[serde(default, rename = "type")]
    operation: OperationType,
    #[serde(default, deserialize_with = "flexible_bool")]
    auto_assign: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    auto_acknowledge_duplicates: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    no_blank_fields_on_update: Option<bool>,
    #[serde(default)]
    index: Option<usize>,
}

#[derive(Deserialize)]
struct RawQuery {
    #[serde(rename = "where", default)]
    filter: Value,
}

#[derive(Deserialize)]
struct RawOrderBy {
    #[serde(default)]
    column: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    ascending: Option<bool>,
}

impl TryFrom<RawLocator> for RecordLocator {
    type Error = Error;

    fn try_from(raw: RawLocator) -> Result<Self> {
        let query = match raw.query.map(|q| q.filter) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(filter) => Some(QueryExpression::from_value(&filter)?),
        };

        let order_by = raw.order_by.and_then(|order| {
            let column = order.column.filter(|c| !c.is_empty())?;
            Some(OrderBy {
                column,
                ascending: order.ascending.unwrap_or(true),
            })
        });

        Ok(Self {
            record_type: raw.record_type,
            record_id: raw.record_id.filter(|id| !id.is_empty()),
            record_ids: raw.record_ids,
            upsert_key: raw.upsert_key,
            query,
            order_by,
            on_no_result: raw.on_no_result,
            on_many_results: raw.on_many_results,
            operation: raw.operation,
            auto_assign: raw.auto_assign.unwrap_or(true),
            auto_acknowledge_duplicates: raw.auto_acknowledge_duplicates.unwrap_or(true),
            no_blank_fields_on_update: raw.no_blank_fields_on_update.unwrap_or(false),
            index: raw.index,
        })
    }
}

impl<'de> Deserialize<'de> for RecordLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawLocator::deserialize(deserializer)?;
        RecordLocator::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Booleans as the pipeline sends them: JSON bools, numbers, or strings
/// such as `"true"`, `"0"`, `"yes"`.
fn flexible_bool<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<bool>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::Number(n) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("invalid boolean {:?}", s))),
        },
        other => Err(serde::de::Error::custom(format!("invalid boolean {}", other))),
    }
}
