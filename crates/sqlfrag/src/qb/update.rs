//! UPDATE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, RawExpr, join};
use crate::param::{Arg, ParamList, write_arg};
use crate::placeholder::PlaceholderFormat;
use crate::qb::select::SelectQb;
use crate::qb::traits::{Filter, QueryType, SqlQb};
use crate::qb::where_clause::{
    WhereClause, write_limit_offset, write_list, write_prefix, write_suffix,
};
use std::collections::HashMap;

/// UPDATE statement builder.
///
/// SET values are [`Arg`]s: scalars are bound, a nested SELECT is written in
/// parentheses, CASE and raw fragments are written in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    table: String,
    joins: Vec<Expr>,
    set_clauses: Vec<(String, Arg)>,
    from: Option<Expr>,
    where_clause: WhereClause,
    order_by: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl UpdateQb {
    /// Create an UPDATE builder for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the placeholder syntax of the final statement.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a raw fragment before the statement.
    pub fn prefix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.prefixes.push(Expr::raw(sql, args));
        self
    }

    /// Add a raw fragment at the end of the statement.
    pub fn suffix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::raw(sql, args));
        self
    }

    /// Add `RETURNING <columns>`.
    pub fn returning(self, columns: &[&str]) -> Self {
        self.suffix(format!("RETURNING {}", columns.join(", ")), Vec::new())
    }

    /// Add `JOIN <sql>` between the table and SET.
    pub fn join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("JOIN", sql, args)
    }

    /// Add `LEFT JOIN <sql>`.
    pub fn left_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("LEFT JOIN", sql, args)
    }

    /// Add `INNER JOIN <sql>`.
    pub fn inner_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("INNER JOIN", sql, args)
    }

    fn join_clause(mut self, keyword: &str, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.joins
            .push(RawExpr::new(sql, args).prefixed(keyword).into());
        self
    }

    // ==================== SET ====================

    /// Add `column = value`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.set_clauses.push((column.into(), value.into()));
        self
    }

    /// Add `column = value` only when a value is given.
    pub fn set_opt<V: Into<Arg>>(self, column: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Add `column = <json>` for any serializable value.
    pub fn set_json<T: serde::Serialize>(
        self,
        column: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(self.set(column, json))
    }

    /// Add assignments from a map, sorted by column name.
    pub fn set_map<K, V>(mut self, map: HashMap<K, V>) -> Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let mut pairs: Vec<(String, Arg)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        self.set_clauses.extend(pairs);
        self
    }

    // ==================== FROM ====================

    /// Set `FROM <table>` (PostgreSQL UPDATE ... FROM).
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Expr::literal(table));
        self
    }

    /// Set `FROM (<sub-select>) AS alias`.
    pub fn from_select(mut self, query: SelectQb, alias: impl Into<String>) -> Self {
        self.from = Some(Expr::from(query).alias(alias));
        self
    }

    // ==================== Ordering & Pagination ====================

    /// Append ORDER BY expressions.
    pub fn order_by(mut self, orders: &[&str]) -> Self {
        self.order_by
            .extend(orders.iter().map(|o| Expr::literal(*o)));
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

impl Filter for UpdateQb {
    fn where_clause(&mut self) -> &mut WhereClause {
        &mut self.where_clause
    }
}

impl SqlQb for UpdateQb {
    fn query_type(&self) -> QueryType {
        QueryType::Update
    }

    fn placeholder(&self) -> PlaceholderFormat {
        self.format
    }

    fn build_raw(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.table.is_empty() {
            return Err(SqlError::validation("update statements must specify a table"));
        }
        if self.set_clauses.is_empty() {
            return Err(SqlError::validation(
                "update statements must have at least one Set clause",
            ));
        }

        let mut sql = String::new();
        write_prefix(&self.prefixes, &mut sql, params)?;

        sql.push_str("UPDATE ");
        sql.push_str(&self.table);

        let joins = join(&self.joins, " ", params)?;
        if !joins.is_empty() {
            sql.push(' ');
            sql.push_str(&joins);
        }

        sql.push_str(" SET ");
        for (i, (column, value)) in self.set_clauses.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str(" = ");
            write_arg(&mut sql, value, params)?;
        }

        if let Some(from) = &self.from {
            let from = from.build(params)?;
            if !from.is_empty() {
                sql.push_str(" FROM ");
                sql.push_str(&from);
            }
        }

        self.where_clause.write("WHERE", &mut sql, params)?;
        write_list("ORDER BY", &self.order_by, ", ", &mut sql, params)?;
        write_limit_offset(&mut sql, self.limit, self.offset);
        write_suffix(&self.suffixes, &mut sql, params)?;

        Ok(sql)
    }
}
