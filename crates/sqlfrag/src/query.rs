//! Rendered SQL text paired with its ordered arguments.

use crate::value::Value;
use tokio_postgres::types::ToSql;

/// The result of rendering a fragment or building a statement.
///
/// `params[i]` is bound to the `i`-th marker of `sql`, counting left to right.
///
/// # Example
///
/// ```ignore
/// let q = sqlfrag::delete("users").eq("id", 7).placeholder_format(PlaceholderFormat::Dollar).to_sql()?;
/// client.execute(&q.sql, &q.params_ref()).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    /// Split into `(sql, params)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}
