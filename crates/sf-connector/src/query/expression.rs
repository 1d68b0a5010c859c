//! Filter expressions and ordering.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    In,
    NotIn,
}

impl Operator {
    /// SOQL spelling.
    pub fn as_soql(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
        }
    }

    /// AND / OR.
    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl FromStr for Operator {
    type Err = Error;

    /// Accepts the pipeline's generic names (`EQ`, `NOTIN`, ...) in any
    /// case, and the symbolic comparison forms.
    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Operator::And,
            "OR" => Operator::Or,
            "EQ" | "=" => Operator::Eq,
            "NEQ" | "!=" | "<>" => Operator::Neq,
            "LT" | "<" => Operator::Lt,
            "LTE" | "<=" => Operator::Lte,
            "GT" | ">" => Operator::Gt,
            "GTE" | ">=" => Operator::Gte,
            "LIKE" => Operator::Like,
            "IN" => Operator::In,
            "NOTIN" | "NOT IN" => Operator::NotIn,
            _ => return Err(Error::invalid_query(format!("Unsupported operator {}", s))),
        };
        Ok(op)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_soql())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Rendered as one comma-joined string literal.
    List(Vec<String>),
}

impl Literal {
    /// Convert a JSON scalar or array of scalars.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Literal::Null),
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) => Ok(Literal::Number(n.clone())),
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    Value::Null => Ok(String::new()),
                    other => Err(Error::invalid_query(format!(
                        "Invalid list element {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Literal::List),
            Value::Object(_) => Err(Error::invalid_query(format!(
                "Invalid query value {}",
                value
            ))),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Number(value.into())
    }
}

impl From<Vec<String>> for Literal {
    fn from(value: Vec<String>) -> Self {
        Literal::List(value)
    }
}

/// A filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    /// `field op value`
    Leaf {
        field: String,
        operator: Operator,
        value: Literal,
    },
    /// `(left) AND|OR (right)`
    Branch {
        left: Box<QueryExpression>,
        operator: Operator,
        right: Box<QueryExpression>,
    },
}

impl QueryExpression {
    /// A comparison leaf.
    pub fn leaf(field: impl Into<String>, operator: Operator, value: impl Into<Literal>) -> Self {
        QueryExpression::Leaf {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// `(self) AND (other)`
    pub fn and(self, other: QueryExpression) -> Self {
        QueryExpression::Branch {
            left: Box::new(self),
            operator: Operator::And,
            right: Box::new(other),
        }
    }

    /// `(self) OR (other)`
    pub fn or(self, other: QueryExpression) -> Self {
        QueryExpression::Branch {
            left: Box::new(self),
            operator: Operator::Or,
            right: Box::new(other),
        }
    }

    /// The leaf parts, if this is a leaf.
    pub fn as_leaf(&self) -> Option<(&str, Operator, &Literal)> {
        match self {
            QueryExpression::Leaf {
                field,
                operator,
                value,
            } => Some((field, *operator, value)),
            QueryExpression::Branch { .. } => None,
        }
    }

    /// Parse the pipeline's `{left, op, right}` shape.
    ///
    /// A node whose `left` is itself a node is a branch; both sides must be
    /// nodes and the operator must be AND/OR. Otherwise `left` is a field
    /// name and `right` a literal.
    pub fn from_value(value: &Value) -> Result<Self> {
        let (left, op, right) = node_parts(value)
            .ok_or_else(|| Error::invalid_query(format!("Invalid query. {}", value)))?;
        let operator: Operator = op.parse()?;

        match left {
            Value::Object(_) => {
                if !operator.is_logical() {
                    return Err(Error::invalid_query(format!(
                        "Operator {} cannot join sub-expressions",
                        operator
                    )));
                }
                Ok(QueryExpression::Branch {
                    left: Box::new(Self::from_value(left)?),
                    operator,
                    right: Box::new(Self::from_value(right)?),
                })
            }
            Value::String(field) => {
                if operator.is_logical() {
                    return Err(Error::invalid_query(format!(
                        "Operator {} needs sub-expressions on both sides",
                        operator
                    )));
                }
                Ok(QueryExpression::Leaf {
                    field: field.clone(),
                    operator,
                    value: Literal::from_value(right)?,
                })
            }
            other => Err(Error::invalid_query(format!("Invalid query. {}", other))),
        }
    }
}

fn node_parts(value: &Value) -> Option<(&Value, &str, &Value)> {
    let obj = value.as_object()?;
    let left = obj.get("left")?;
    let op = obj.get("op")?.as_str()?;
    let right = obj.get("right")?;
    Some((left, op, right))
}

impl<'de> Deserialize<'de> for QueryExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        QueryExpression::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Sort order for a select.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderBy {
    pub column: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}
