//! SOQL compilation with identifier sanitization and literal escaping.
//!
//! ```rust
//! use busbar_sf_connector_core::query::{Operator, QueryExpression, SoqlQuery};
//!
//! let soql = SoqlQuery::new("Account")?
//!     .select(["Id", "Name"])?
//!     .filter(QueryExpression::leaf("Name", Operator::Like, "%a"))
//!     .build()?;
//! assert_eq!(soql, "SELECT Id, Name FROM Account WHERE Name LIKE '%a'");
//! # Ok::<(), busbar_sf_connector_core::Error>(())
//! ```

use busbar_sf_client::security::soql;

use crate::error::{Error, Result};
use crate::locator::ManyResultsPolicy;
use crate::query::expression::{Literal, Operator, OrderBy, QueryExpression};
use crate::record::RecordKey;

const PRIMARY_KEY: &str = "Id";

/// SOQL query builder.
///
/// Every identifier is checked against the `[A-Za-z_.]` allow-list and
/// every string literal is escaped, so nothing reaches the server that
/// could break out of its position in the query.
#[derive(Debug, Clone)]
pub struct SoqlQuery {
    sobject: String,
    fields: Vec<String>,
    filter: Option<QueryExpression>,
    order_by: Option<OrderBy>,
    limit: Option<u32>,
}

impl SoqlQuery {
    /// Start a query against `sobject`.
    pub fn new(sobject: impl AsRef<str>) -> Result<Self> {
        let sobject = sobject.as_ref();
        if !soql::is_safe_identifier(sobject) {
            return Err(Error::invalid_query(format!(
                "Cannot build SOQL with invalid sObject: {}",
                sobject
            )));
        }

        Ok(Self {
            sobject: sobject.to_string(),
            fields: Vec::new(),
            filter: None,
            order_by: None,
            limit: None,
        })
    }

    /// Add fields to the select list.
    ///
    /// `Type:Field` is accepted and rewritten to `Type.Field`. Duplicates
    /// are dropped.
    pub fn select<I, S>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            let field = sanitize_field(field.as_ref())?;
            if !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        Ok(self)
    }

    /// AND a condition onto the filter.
    pub fn filter(mut self, expr: QueryExpression) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Restrict results to children of `scope` (`<ScopeType>Id = '<id>'`).
    ///
    /// The scope clause is the outer AND, so an explicit filter can never
    /// widen it.
    pub fn scope(self, scope: &RecordKey) -> Result<Self> {
        let id = scope.resolved_id().ok_or_else(|| {
            Error::invalid_query(format!(
                "Cannot scope a query to {} before it is saved",
                scope.record_type
            ))
        })?;
        let clause = QueryExpression::leaf(
            format!("{}{}", scope.record_type, PRIMARY_KEY),
            Operator::Eq,
            id,
        );
        Ok(self.filter(clause))
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query. `Id` is appended to the select list if missing.
    pub fn build(&self) -> Result<String> {
        if self.fields.is_empty() {
            return Err(Error::invalid_query(
                "Cannot build SOQL with no selected fields.",
            ));
        }

        let mut fields = self.fields.clone();
        if !fields.iter().any(|f| f == PRIMARY_KEY) {
            fields.push(PRIMARY_KEY.to_string());
        }

        let mut query = format!("SELECT {} FROM {}", fields.join(", "), self.sobject);

        if let Some(ref filter) = self.filter {
            query.push_str(" WHERE ");
            query.push_str(&render_expression(filter)?);
        }

        if let Some(ref order) = self.order_by {
            let direction = if order.ascending { "ASC" } else { "DESC" };
            query.push_str(&format!(
                " ORDER BY {} {}",
                sanitize_field(&order.column)?,
                direction
            ));
        }

        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        Ok(query)
    }
}

/// Compile a locator-driven select into SOQL.
///
/// `SelectOne` limits the result to one row on the server; any other
/// policy leaves the row count open.
pub fn compile<S: AsRef<str>>(
    select: &[S],
    object: &str,
    filter: Option<&QueryExpression>,
    order_by: Option<&OrderBy>,
    policy: ManyResultsPolicy,
    scope: Option<&RecordKey>,
) -> Result<String> {
    let mut query = SoqlQuery::new(object)?.select(select)?;

    if let Some(filter) = filter {
        query = query.filter(filter.clone());
    }
    if let Some(scope) = scope {
        query = query.scope(scope)?;
    }
    if let Some(order) = order_by {
        query = query.order_by(order.clone());
    }
    if policy == ManyResultsPolicy::SelectOne {
        query = query.limit(1);
    }

    query.build()
}

fn sanitize_field(field: &str) -> Result<String> {
    soql::sanitize_field(field).ok_or_else(|| {
        Error::invalid_query(format!("Cannot build SOQL with invalid field: {}", field))
    })
}

fn render_expression(expr: &QueryExpression) -> Result<String> {
    match expr {
        QueryExpression::Leaf {
            field,
            operator,
            value,
        } => Ok(format!(
            "{} {} {}",
            sanitize_field(field)?,
            operator,
            render_literal(value)
        )),
        QueryExpression::Branch {
            left,
            operator,
            right,
        } => Ok(format!(
            "({}) {} ({})",
            render_expression(left)?,
            operator,
            render_expression(right)?
        )),
    }
}

fn render_literal(value: &Literal) -> String {
    match value {
        Literal::Null => "NULL".to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Number(n) => n.to_string(),
        Literal::String(s) => format!("'{}'", soql::escape_string(s)),
        // One quoted string, elements comma-joined.
        Literal::List(items) => format!("'{}'", soql::escape_string(&items.join(","))),
    }
}
