//! Trait definitions for statement builders.

use crate::error::SqlResult;
use crate::expr::Expr;
use crate::param::{Arg, ParamList};
use crate::placeholder::PlaceholderFormat;
use crate::qb::where_clause::WhereClause;
use crate::query::BuiltQuery;

/// The kind of statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
}

/// Base trait for all statement builders.
///
/// Implementors compose their clauses with `?` markers in
/// [`SqlQb::build_raw`]; [`SqlQb::to_sql`] then rewrites the markers once for
/// the builder's [`PlaceholderFormat`].
pub trait SqlQb {
    /// Statement kind, used for logging.
    fn query_type(&self) -> QueryType;

    /// Target placeholder syntax.
    fn placeholder(&self) -> PlaceholderFormat;

    /// Compose the statement with `?` markers, appending arguments to `params`.
    fn build_raw(&self, params: &mut ParamList) -> SqlResult<String>;

    /// Build the final SQL and its arguments.
    fn to_sql(&self) -> SqlResult<BuiltQuery> {
        let result = build_statement(self);
        #[cfg(feature = "tracing")]
        log_build(self.query_type(), &result);
        result
    }

    /// Build the final SQL, panicking on error.
    ///
    /// Meant for statements assembled from constants.
    fn must_sql(&self) -> BuiltQuery {
        match self.to_sql() {
            Ok(q) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

fn build_statement<Q: SqlQb + ?Sized>(qb: &Q) -> SqlResult<BuiltQuery> {
    let mut params = ParamList::new();
    let sql = qb.build_raw(&mut params)?;
    let sql = qb.placeholder().replace(&sql, params.len())?;
    Ok(BuiltQuery::new(sql, params.into_values()))
}

#[cfg(feature = "tracing")]
fn log_build(query_type: QueryType, result: &SqlResult<BuiltQuery>) {
    match result {
        Ok(q) => tracing::debug!(
            target: "sqlfrag.sql",
            query_type = ?query_type,
            param_count = q.params.len(),
            sql = %truncate_sql(&q.sql, MAX_LOGGED_SQL),
        ),
        Err(e) => tracing::debug!(
            target: "sqlfrag.sql",
            query_type = ?query_type,
            error = %e,
            "statement build failed",
        ),
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max_bytes: usize) -> std::borrow::Cow<'_, str> {
    if sql.len() <= max_bytes {
        return std::borrow::Cow::Borrowed(sql);
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!("{}...", &sql[..end]))
}

/// WHERE shortcuts shared by SELECT, UPDATE and DELETE.
///
/// Every shortcut appends one AND-ed condition.
pub trait Filter: Sized {
    /// The builder's WHERE clause.
    fn where_clause(&mut self) -> &mut WhereClause;

    /// Add a WHERE condition.
    fn and_where(mut self, expr: impl Into<Expr>) -> Self {
        self.where_clause().push(expr.into());
        self
    }

    /// Add a WHERE condition if present.
    fn and_where_opt<E: Into<Expr>>(self, expr: Option<E>) -> Self {
        match expr {
            Some(expr) => self.and_where(expr),
            None => self,
        }
    }

    /// Add WHERE: column = value (IS NULL / IN for null and lists)
    fn eq(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::eq(column, value))
    }

    /// Add WHERE: column <> value (IS NOT NULL / NOT IN for null and lists)
    fn ne(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::ne(column, value))
    }

    /// Add WHERE: column < value
    fn lt(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::lt(column, value))
    }

    /// Add WHERE: column <= value
    fn lte(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::lte(column, value))
    }

    /// Add WHERE: column > value
    fn gt(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::gt(column, value))
    }

    /// Add WHERE: column >= value
    fn gte(self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.and_where(Expr::gte(column, value))
    }

    /// Add WHERE: column LIKE pattern
    fn like(self, column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        self.and_where(Expr::like(column, pattern))
    }

    /// Add WHERE: column NOT LIKE pattern
    fn not_like(self, column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        self.and_where(Expr::not_like(column, pattern))
    }

    /// Add WHERE: column ILIKE pattern
    fn ilike(self, column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        self.and_where(Expr::ilike(column, pattern))
    }

    /// Add WHERE: column NOT ILIKE pattern
    fn not_ilike(self, column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        self.and_where(Expr::not_ilike(column, pattern))
    }

    /// Add WHERE: column IS NULL
    fn is_null(self, column: impl Into<String>) -> Self {
        self.and_where(Expr::is_null(column))
    }

    /// Add WHERE: column IS NOT NULL
    fn is_not_null(self, column: impl Into<String>) -> Self {
        self.and_where(Expr::is_not_null(column))
    }

    /// Add a raw WHERE condition with `?` markers.
    fn raw_where(self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.and_where(Expr::raw(sql, args))
    }
}
