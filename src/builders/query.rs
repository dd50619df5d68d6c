use std::marker::PhantomData;

use crate::clauses::{build_order_sql, Limit, OrderField, WhereNode};
use crate::traits::Model;
use crate::types::{quote_identifier, SqlValue};

/// What a query does with the rows it matches.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryKind {
    /// Read rows; `None` selects every column.
    Select { fields: Option<Vec<String>> },
    /// Assign new values to the matched rows.
    Update { assignments: Vec<(String, SqlValue)> },
    /// Remove the matched rows.
    Delete,
}

/// A query against the table of model `M`.
///
/// # Example
/// ```ignore
/// let query = Query::<User>::select()
///     .columns(&["id", "name"])
///     .where_(WhereNode::eq("name", "John"))
///     .order_by(OrderField::desc("id"))
///     .limit(0, 10);
/// let result = driver.query(&query).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Query<M> {
    kind: QueryKind,
    where_clause: Option<WhereNode>,
    order: Vec<OrderField>,
    limit: Option<Limit>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Query<M> {
    fn with_kind(kind: QueryKind) -> Self {
        Self {
            kind,
            where_clause: None,
            order: Vec::new(),
            limit: None,
            _model: PhantomData,
        }
    }

    /// Start a SELECT query over all columns.
    pub fn select() -> Self {
        Self::with_kind(QueryKind::Select { fields: None })
    }

    /// Start an UPDATE query. Add assignments with `.set()`.
    pub fn update() -> Self {
        Self::with_kind(QueryKind::Update {
            assignments: Vec::new(),
        })
    }

    /// Start a DELETE query.
    pub fn delete() -> Self {
        Self::with_kind(QueryKind::Delete)
    }

    /// Restrict a SELECT to the given columns. Plain names are quoted;
    /// expressions such as `COUNT(*) AS n` are written as given.
    /// Ignored for other kinds.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        if let QueryKind::Select { fields } = &mut self.kind {
            *fields = Some(cols.iter().map(|c| c.to_string()).collect());
        }
        self
    }

    /// Add a `column = value` assignment to an UPDATE. Ignored for other kinds.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        if let QueryKind::Update { assignments } = &mut self.kind {
            assignments.push((column.into(), value.into()));
        }
        self
    }

    /// Add a WHERE clause to the query.
    pub fn where_(mut self, clause: WhereNode) -> Self {
        self.where_clause = Some(clause);
        self
    }

    /// Append an ORDER BY field.
    pub fn order_by(mut self, field: OrderField) -> Self {
        self.order.push(field);
        self
    }

    /// Add a LIMIT to the query.
    pub fn limit(mut self, start: u64, length: u64) -> Self {
        self.limit = Some(Limit::new(start, length));
        self
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    pub fn where_clause(&self) -> Option<&WhereNode> {
        self.where_clause.as_ref()
    }

    pub fn order(&self) -> &[OrderField] {
        &self.order
    }

    pub fn pagination(&self) -> Option<Limit> {
        self.limit
    }

    /// Returns true for queries that produce rows to hydrate.
    pub fn is_select(&self) -> bool {
        matches!(self.kind, QueryKind::Select { .. })
    }

    /// Build the SQL statement for this query.
    pub fn build_sql(&self) -> String {
        let mut sql = String::with_capacity(256);
        let table = M::table_name();

        match &self.kind {
            QueryKind::Select { fields } => {
                sql.push_str("SELECT ");
                match fields {
                    Some(fields) if !fields.is_empty() => {
                        let cols: Vec<String> =
                            fields.iter().map(|f| projection_sql(f)).collect();
                        sql.push_str(&cols.join(", "));
                    }
                    _ => sql.push('*'),
                }
                sql.push_str(" FROM ");
                sql.push_str(table);
            }
            QueryKind::Update { assignments } => {
                sql.push_str("UPDATE ");
                sql.push_str(table);
                sql.push_str(" SET ");
                let parts: Vec<String> = assignments
                    .iter()
                    .map(|(col, value)| {
                        format!("{}={}", quote_identifier(col), value.to_sql_literal())
                    })
                    .collect();
                sql.push_str(&parts.join(", "));
            }
            QueryKind::Delete => {
                sql.push_str("DELETE FROM ");
                sql.push_str(table);
            }
        }

        // WHERE clause
        if let Some(ref where_clause) = self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause.build_sql());
        }

        // ORDER BY clause
        if !self.order.is_empty() {
            sql.push(' ');
            sql.push_str(&build_order_sql(&self.order));
        }

        // LIMIT clause. UPDATE and DELETE take no offset; a non-zero start is
        // still sent so the server rejects it instead of hitting other rows.
        if let Some(limit) = self.limit {
            sql.push(' ');
            if self.is_select() || limit.start != 0 {
                sql.push_str(&limit.build_sql());
            } else {
                sql.push_str("LIMIT ");
                sql.push_str(&limit.length.to_string());
            }
        }

        sql
    }
}

/// Plain column names are backtick-quoted; anything else (`COUNT(*)`,
/// `a AS b`, `t.*`) is an expression and passes through unchanged.
fn projection_sql(field: &str) -> String {
    let is_column = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_column {
        quote_identifier(field)
    } else {
        field.to_string()
    }
}
