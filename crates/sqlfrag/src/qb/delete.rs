//! DELETE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, RawExpr, join};
use crate::param::{Arg, ParamList};
use crate::placeholder::PlaceholderFormat;
use crate::qb::traits::{Filter, QueryType, SqlQb};
use crate::qb::where_clause::{
    WhereClause, write_limit_offset, write_list, write_prefix, write_suffix,
};

/// DELETE statement builder.
///
/// A DELETE without conditions, or whose only condition is an empty
/// `And`/`Or` group, has no WHERE clause and affects every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    table: String,
    joins: Vec<Expr>,
    where_clause: WhereClause,
    order_by: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl DeleteQb {
    /// Create a DELETE builder for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set the table to delete from.
    pub fn from(mut self, table: impl Into<String>) -> Self {
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

    /// Add `JOIN <sql>`.
    pub fn join(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.joins
            .push(RawExpr::new(sql, args).prefixed("JOIN").into());
        self
    }

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

impl Filter for DeleteQb {
    fn where_clause(&mut self) -> &mut WhereClause {
        &mut self.where_clause
    }
}

impl SqlQb for DeleteQb {
    fn query_type(&self) -> QueryType {
        QueryType::Delete
    }

    fn placeholder(&self) -> PlaceholderFormat {
        self.format
    }

    fn build_raw(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.table.is_empty() {
            return Err(SqlError::validation(
                "delete statements must specify a From table",
            ));
        }

        let mut sql = String::new();
        write_prefix(&self.prefixes, &mut sql, params)?;

        sql.push_str("DELETE FROM ");
        sql.push_str(&self.table);

        let joins = join(&self.joins, " ", params)?;
        if !joins.is_empty() {
            sql.push(' ');
            sql.push_str(&joins);
        }

        self.where_clause.write("WHERE", &mut sql, params)?;
        write_list("ORDER BY", &self.order_by, ", ", &mut sql, params)?;
        write_limit_offset(&mut sql, self.limit, self.offset);
        write_suffix(&self.suffixes, &mut sql, params)?;

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::qb::delete;
    use crate::value::Value;

    #[test]
    fn test_full_statement() {
        let q = DeleteQb::new("")
            .prefix("WITH prefix AS ?", args![0])
            .from("a")
            .raw_where("b = ?", args![1])
            .order_by(&["c"])
            .limit(2)
            .offset(3)
            .suffix("RETURNING ?", args![4])
            .must_sql();
        assert_eq!(
            q.sql,
            "WITH prefix AS ? DELETE FROM a WHERE b = ? ORDER BY c LIMIT 2 OFFSET 3 RETURNING ?"
        );
        assert_eq!(q.params, vec![Value::Int(0), Value::Int(1), Value::Int(4)]);
    }

    #[test]
    fn test_missing_table() {
        let err = delete("").to_sql().unwrap_err();
        assert_eq!(err, SqlError::validation("delete statements must specify a From table"));
    }

    #[test]
    fn test_without_where() {
        assert_eq!(delete("logs").must_sql().sql, "DELETE FROM logs");
    }

    #[test]
    fn test_empty_or_matches_no_filter() {
        let plain = delete("logs").must_sql();
        let empty_or = delete("logs").and_where(Expr::or(vec![])).must_sql();
        assert_eq!(plain, empty_or);
        assert!(empty_or.params.is_empty());
    }

    #[test]
    fn test_empty_in_list_keeps_where() {
        let q = delete("users").eq("id", Vec::<i64>::new()).must_sql();
        assert_eq!(q.sql, "DELETE FROM users WHERE (1=0)");
    }

    #[test]
    fn test_join_and_numbered_placeholders() {
        let q = delete("t1")
            .join("t2 ON t1.id = t2.t1_id", args![])
            .eq("t2.kind", "stale")
            .lt("t1.age", 30)
            .placeholder_format(PlaceholderFormat::AtP)
            .must_sql();
        assert_eq!(
            q.sql,
            "DELETE FROM t1 JOIN t2 ON t1.id = t2.t1_id WHERE t2.kind = @p1 AND t1.age < @p2"
        );
    }

    #[test]
    fn test_returning() {
        let q = delete("users")
            .eq("id", 7)
            .returning(&["id"])
            .placeholder_format(PlaceholderFormat::Dollar)
            .must_sql();
        assert_eq!(q.sql, "DELETE FROM users WHERE id = $1 RETURNING id");
    }

    #[test]
    fn test_absent_condition_next_to_empty_or_matches_no_filter() {
        let q = delete("users")
            .and_where(None::<Expr>)
            .and_where(Expr::or(vec![]))
            .must_sql();
        assert_eq!(q.sql, "DELETE FROM users");
    }
}
