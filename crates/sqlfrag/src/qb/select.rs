//! SELECT statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, RawExpr, join};
use crate::param::{Arg, ParamList};
use crate::placeholder::PlaceholderFormat;
use crate::qb::join::{Join, JoinOn, SelectJoin, write_joins};
use crate::qb::traits::{Filter, QueryType, SqlQb};
use crate::qb::where_clause::{
    WhereClause, write_limit_offset, write_list, write_prefix, write_suffix,
};

/// SELECT statement builder.
///
/// Every method consumes the builder and returns it; clone a partially built
/// statement to reuse it as a template.
///
/// Nested inside another fragment (a column, a `FROM` sub-select, an `IN`
/// argument) the statement is rendered with `?` markers and numbered by the
/// outermost statement, so its own placeholder format is ignored there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    options: Vec<String>,
    columns: Vec<Expr>,
    from: Option<Expr>,
    joins: Vec<Join>,
    where_clause: WhereClause,
    group_by: Vec<String>,
    having: WhereClause,
    order_by: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl SelectQb {
    /// Create an empty SELECT builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder syntax of the final statement.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a raw fragment before `SELECT`, e.g. `WITH ... AS (...)`.
    pub fn prefix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.prefixes.push(Expr::raw(sql, args));
        self
    }

    /// Add a raw fragment at the end of the statement, e.g. `FOR UPDATE`.
    pub fn suffix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::raw(sql, args));
        self
    }

    /// Add any fragment before `SELECT`.
    pub fn prefix_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.prefixes.push(expr.into());
        self
    }

    /// Add any fragment at the end of the statement.
    pub fn suffix_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.suffixes.push(expr.into());
        self
    }

    /// Add keywords between `SELECT` and the columns.
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options.extend(options.iter().map(|o| o.to_string()));
        self
    }

    /// `SELECT DISTINCT`.
    pub fn distinct(self) -> Self {
        self.options(&["DISTINCT"])
    }

    // ==================== Columns ====================

    /// Append result columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns
            .extend(columns.iter().map(|c| Expr::literal(*c)));
        self
    }

    /// Append one result column: a name or any fragment (CASE, alias, sub-select...).
    pub fn column(mut self, column: impl Into<Expr>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Append a raw result column with `?` markers.
    pub fn column_raw(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.columns.push(Expr::raw(sql, args));
        self
    }

    /// Drop all result columns.
    pub fn remove_columns(mut self) -> Self {
        self.columns.clear();
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the FROM table (or any FROM text such as `users u`).
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Expr::literal(table));
        self
    }

    /// Set FROM to `(<sub-select>) AS alias`.
    pub fn from_select(mut self, query: SelectQb, alias: impl Into<String>) -> Self {
        self.from = Some(Expr::from(query).alias(alias));
        self
    }

    /// Add `JOIN <sql>`.
    pub fn join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("JOIN", sql, args)
    }

    /// Add `LEFT JOIN <sql>`.
    pub fn left_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("LEFT JOIN", sql, args)
    }

    /// Add `RIGHT JOIN <sql>`.
    pub fn right_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("RIGHT JOIN", sql, args)
    }

    /// Add `INNER JOIN <sql>`.
    pub fn inner_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("INNER JOIN", sql, args)
    }

    /// Add `CROSS JOIN <sql>`.
    pub fn cross_join(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.join_clause("CROSS JOIN", sql, args)
    }

    fn join_clause(mut self, keyword: &str, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.joins
            .push(Join::Raw(RawExpr::new(sql, args).prefixed(keyword).into()));
        self
    }

    /// Add `JOIN (<sub-select>) AS alias [ON ...]`.
    ///
    /// `on` is SQL text bound to `args`, a fragment (then `args` must be
    /// empty) or `JoinOn::None`. The sub-select is numbered by this statement.
    pub fn join_select(
        self,
        query: SelectQb,
        alias: impl Into<String>,
        on: impl Into<JoinOn>,
        args: Vec<Arg>,
    ) -> Self {
        self.select_join_clause("JOIN", query, alias, on, args)
    }

    /// Add `LEFT JOIN (<sub-select>) AS alias [ON ...]`.
    pub fn left_join_select(
        self,
        query: SelectQb,
        alias: impl Into<String>,
        on: impl Into<JoinOn>,
        args: Vec<Arg>,
    ) -> Self {
        self.select_join_clause("LEFT JOIN", query, alias, on, args)
    }

    /// Add `RIGHT JOIN (<sub-select>) AS alias [ON ...]`.
    pub fn right_join_select(
        self,
        query: SelectQb,
        alias: impl Into<String>,
        on: impl Into<JoinOn>,
        args: Vec<Arg>,
    ) -> Self {
        self.select_join_clause("RIGHT JOIN", query, alias, on, args)
    }

    /// Add `INNER JOIN (<sub-select>) AS alias [ON ...]`.
    pub fn inner_join_select(
        self,
        query: SelectQb,
        alias: impl Into<String>,
        on: impl Into<JoinOn>,
        args: Vec<Arg>,
    ) -> Self {
        self.select_join_clause("INNER JOIN", query, alias, on, args)
    }

    fn select_join_clause(
        mut self,
        keyword: &'static str,
        query: SelectQb,
        alias: impl Into<String>,
        on: impl Into<JoinOn>,
        args: Vec<Arg>,
    ) -> Self {
        self.joins.push(Join::Select(SelectJoin::new(
            keyword,
            query,
            alias.into(),
            on.into(),
            args,
        )));
        self
    }

    // ==================== Grouping & Ordering ====================

    /// Append GROUP BY expressions.
    pub fn group_by(mut self, groups: &[&str]) -> Self {
        self.group_by.extend(groups.iter().map(|g| g.to_string()));
        self
    }

    /// Add a HAVING condition.
    pub fn having(mut self, expr: impl Into<Expr>) -> Self {
        self.having.push(expr.into());
        self
    }

    /// Add a raw HAVING condition with `?` markers.
    pub fn having_raw(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.having(Expr::raw(sql, args))
    }

    /// Append ORDER BY expressions.
    pub fn order_by(mut self, orders: &[&str]) -> Self {
        self.order_by
            .extend(orders.iter().map(|o| Expr::literal(*o)));
        self
    }

    /// Append an ORDER BY fragment, e.g. a raw expression with arguments.
    pub fn order_by_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by_expr(format!("{column} ASC"))
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by_expr(format!("{column} DESC"))
    }

    // ==================== Pagination ====================

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

    /// Remove LIMIT.
    pub fn remove_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Remove OFFSET.
    pub fn remove_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }
}

impl Filter for SelectQb {
    fn where_clause(&mut self) -> &mut WhereClause {
        &mut self.where_clause
    }
}

impl SqlQb for SelectQb {
    fn query_type(&self) -> QueryType {
        QueryType::Select
    }

    fn placeholder(&self) -> PlaceholderFormat {
        self.format
    }

    fn build_raw(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.columns.is_empty() {
            return Err(SqlError::validation(
                "select statements must have at least one result column",
            ));
        }

        let mut sql = String::new();
        write_prefix(&self.prefixes, &mut sql, params)?;

        sql.push_str("SELECT ");
        if !self.options.is_empty() {
            sql.push_str(&self.options.join(" "));
            sql.push(' ');
        }
        sql.push_str(&join(&self.columns, ", ", params)?);

        if let Some(from) = &self.from {
            let from = from.build(params)?;
            if !from.is_empty() {
                sql.push_str(" FROM ");
                sql.push_str(&from);
            }
        }

        write_joins(&self.joins, &mut sql, params)?;

        self.where_clause.write("WHERE", &mut sql, params)?;

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        self.having.write("HAVING", &mut sql, params)?;
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
    use crate::expr::case_of;
    use crate::qb::select;
    use crate::value::Value;

    #[test]
    fn test_full_statement() {
        let q = select(&["a", "b"])
            .prefix("WITH prefix AS ?", args![0])
            .distinct()
            .column_raw("c IN ?", args![vec![1, 2]])
            .from("e")
            .join("j1 ON j1.id = e.j1", args![])
            .left_join("j2 ON j2.x = ?", args![3])
            .eq("f", 4)
            .raw_where("g = ?", args![5])
            .group_by(&["h"])
            .having_raw("i = ?", args![6])
            .order_by(&["k"])
            .limit(7)
            .offset(8)
            .suffix("FETCH FIRST ? ROWS ONLY", args![9])
            .must_sql();
        assert_eq!(
            q.sql,
            "WITH prefix AS ? SELECT DISTINCT a, b, c IN (?,?) FROM e \
             JOIN j1 ON j1.id = e.j1 LEFT JOIN j2 ON j2.x = ? \
             WHERE f = ? AND g = ? GROUP BY h HAVING i = ? ORDER BY k \
             LIMIT 7 OFFSET 8 FETCH FIRST ? ROWS ONLY"
        );
        let expected: Vec<Value> = [0, 1, 2, 3, 4, 5, 6, 9].into_iter().map(Value::Int).collect();
        assert_eq!(q.params, expected);
    }

    #[test]
    fn test_no_columns_is_an_error() {
        let err = SelectQb::new().from("t").to_sql().unwrap_err();
        assert_eq!(
            err,
            SqlError::validation("select statements must have at least one result column")
        );
        assert!(select(&["a"]).remove_columns().to_sql().is_err());
    }

    #[test]
    fn test_case_column_and_alias() {
        let q = select(&["id"])
            .column(case_of("status").when("'active'", 1).otherwise(-1).alias("code"))
            .from("users")
            .must_sql();
        assert_eq!(
            q.sql,
            "SELECT id, (CASE status WHEN 'active' THEN ? ELSE ? END) AS code FROM users"
        );
        assert_eq!(q.params, vec![Value::Int(1), Value::Int(-1)]);
    }

    #[test]
    fn test_from_select() {
        let inner = select(&["id"]).from("accounts").eq("name", "ACME");
        let q = select(&["*"]).from_select(inner, "sub").eq("sub.id", 1).must_sql();
        assert_eq!(
            q.sql,
            "SELECT * FROM (SELECT id FROM accounts WHERE name = ?) AS sub WHERE sub.id = ?"
        );
        assert_eq!(q.params, vec![Value::from("ACME"), Value::Int(1)]);
    }

    #[test]
    fn test_sub_select_numbered_by_outer_statement() {
        let inner = select(&["user_id"])
            .from("orders")
            .gt("total", 100)
            .placeholder_format(PlaceholderFormat::Colon);
        let q = select(&["*"])
            .from("users")
            .eq("status", "active")
            .and_where(Expr::raw("id IN ?", args![inner]))
            .placeholder_format(PlaceholderFormat::Dollar)
            .must_sql();
        assert_eq!(
            q.sql,
            "SELECT * FROM users WHERE status = $1 AND id IN (SELECT user_id FROM orders WHERE total > $2)"
        );
    }

    #[test]
    fn test_empty_or_where_is_omitted() {
        let q = select(&["*"]).from("users").and_where(Expr::or(vec![])).must_sql();
        assert_eq!(q.sql, "SELECT * FROM users");
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_order_helpers_and_paginate() {
        let q = select(&["*"])
            .from("t")
            .order_by_desc("created_at")
            .order_by_asc("id")
            .paginate(3, 20)
            .must_sql();
        assert_eq!(
            q.sql,
            "SELECT * FROM t ORDER BY created_at DESC, id ASC LIMIT 20 OFFSET 40"
        );

        let q = select(&["*"]).from("t").limit(5).offset(10).remove_limit().remove_offset();
        assert_eq!(q.must_sql().sql, "SELECT * FROM t");
    }

    #[test]
    fn test_template_reuse() {
        let base = select(&["*"]).from("users").eq("tenant_id", 1);
        let active = base.clone().eq("status", "active");
        assert_eq!(base.must_sql().sql, "SELECT * FROM users WHERE tenant_id = ?");
        assert_eq!(
            active.must_sql().sql,
            "SELECT * FROM users WHERE tenant_id = ? AND status = ?"
        );
    }

    #[test]
    fn test_join_select_with_text_on() {
        let orders = select(&["user_id", "SUM(total) AS total"])
            .from("orders")
            .eq("status", "paid")
            .group_by(&["user_id"])
            .placeholder_format(PlaceholderFormat::Colon);
        let q = select(&["u.id", "o.total"])
            .from("users u")
            .left_join_select(orders, "o", "o.user_id = u.id AND o.total > ?", args![100])
            .eq("u.active", true)
            .placeholder_format(PlaceholderFormat::Dollar)
            .must_sql();
        assert_eq!(
            q.sql,
            "SELECT u.id, o.total FROM users u LEFT JOIN (SELECT user_id, SUM(total) AS total \
             FROM orders WHERE status = $1 GROUP BY user_id) AS o \
             ON o.user_id = u.id AND o.total > $2 WHERE u.active = $3"
        );
        assert_eq!(
            q.params,
            vec![Value::from("paid"), Value::Int(100), Value::Bool(true)]
        );
    }

    #[test]
    fn test_join_select_keywords_and_fragment_on() {
        let sub = || select(&["id"]).from("t2").gt("n", 1);
        let q = select(&["*"])
            .from("t1")
            .join_select(sub(), "a", Expr::raw("a.id = t1.id", args![]), args![])
            .right_join_select(sub(), "b", Expr::eq("b.id", 2), args![])
            .inner_join_select(sub(), "c", JoinOn::None, args![])
            .must_sql();
        assert_eq!(
            q.sql,
            "SELECT * FROM t1 \
             JOIN (SELECT id FROM t2 WHERE n > ?) AS a ON a.id = t1.id \
             RIGHT JOIN (SELECT id FROM t2 WHERE n > ?) AS b ON b.id = ? \
             INNER JOIN (SELECT id FROM t2 WHERE n > ?) AS c"
        );
        assert_eq!(
            q.params,
            vec![Value::Int(1), Value::Int(1), Value::Int(2), Value::Int(1)]
        );
    }

    #[test]
    fn test_join_select_blank_on_text_is_no_on_clause() {
        let q = select(&["*"])
            .from("t1")
            .join_select(select(&["id"]).from("t2"), "x", "  ", args![])
            .must_sql();
        assert_eq!(q.sql, "SELECT * FROM t1 JOIN (SELECT id FROM t2) AS x");
    }

    #[test]
    fn test_join_select_errors() {
        let sub = || select(&["id"]).from("t2");

        let err = select(&["*"])
            .from("t1")
            .join_select(sub(), " ", "x.id = t1.id", args![])
            .to_sql()
            .unwrap_err();
        assert_eq!(err, SqlError::validation("join alias must not be empty"));

        let err = select(&["*"])
            .from("t1")
            .join_select(sub(), "x", JoinOn::None, args![1])
            .to_sql()
            .unwrap_err();
        assert_eq!(
            err,
            SqlError::validation("join ON clause arguments provided without an ON clause")
        );

        let err = select(&["*"])
            .from("t1")
            .join_select(sub(), "x", "", args![1])
            .to_sql()
            .unwrap_err();
        assert_eq!(
            err,
            SqlError::validation("join ON clause arguments provided without an ON clause")
        );

        let err = select(&["*"])
            .from("t1")
            .join_select(sub(), "x", Expr::eq("x.id", 1), args![2])
            .to_sql()
            .unwrap_err();
        assert_eq!(
            err,
            SqlError::validation(
                "join ON clause arguments must be empty when ON clause is a fragment"
            )
        );
    }

    #[test]
    fn test_prefix_and_suffix_fragments() {
        let q = select(&["*"])
            .prefix_expr(Expr::raw("WITH recent AS (SELECT id FROM t WHERE ts > ?)", args![5]))
            .from("recent")
            .suffix_expr(Expr::literal("FOR UPDATE"))
            .suffix_expr(Expr::Empty)
            .must_sql();
        assert_eq!(
            q.sql,
            "WITH recent AS (SELECT id FROM t WHERE ts > ?) SELECT * FROM recent FOR UPDATE"
        );
        assert_eq!(q.params, vec![Value::Int(5)]);
    }
}
