//! Fragment layer: composable SQL pieces that render to text plus arguments.
//!
//! [`Expr`] is the closed set of fragment kinds:
//! - comparison predicates ([`Pred`])
//! - AND/OR conjunctions and NOT
//! - raw SQL templates with `?` markers ([`RawExpr`])
//! - CASE expressions ([`CaseExpr`])
//! - aliases, plain literals, nested SELECTs and the no-op [`Expr::Empty`]
//!
//! Rendering always writes `?` markers and appends one argument per marker, in
//! order. Placeholder numbering for a specific driver happens once per
//! statement, see [`crate::PlaceholderFormat`].

mod case_expr;
mod pred;
mod raw_expr;


pub use case_expr::{CaseExpr, CaseOperand, case, case_of};
pub use pred::{CmpOp, Pred};
pub use raw_expr::{RawExpr, raw};

use crate::error::{SqlError, SqlResult};
use crate::param::{Arg, ParamList};
use crate::placeholder::count_markers;
use crate::qb::{SelectQb, SqlQb};
use crate::query::BuiltQuery;

/// Always-true literal (empty AND, empty NOT IN list).
pub const SQL_TRUE: &str = "(1=1)";

/// Always-false literal (empty OR, empty IN list).
pub const SQL_FALSE: &str = "(1=0)";

/// Expression node for building SQL fragments.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Field/value comparisons, AND-joined.
    Pred(Pred),

    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// SQL template with `?` markers and explicit arguments.
    Raw(RawExpr),

    /// CASE ... WHEN ... THEN ... END
    Case(Box<CaseExpr>),

    /// `(<expr>) AS <alias>`
    Alias { expr: Box<Expr>, alias: String },

    /// Plain SQL text without markers or arguments.
    Literal(String),

    /// Nested SELECT, rendered in parentheses.
    Select(Box<SelectQb>),

    /// No-op: renders to nothing and is skipped by enclosing lists.
    Empty,
}

impl Expr {
    /// Create an AND expression from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR expression from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Create a NOT expression.
    pub fn not(expr: impl Into<Expr>) -> Self {
        Expr::Not(Box::new(expr.into()))
    }

    /// Return a copy of this conjunction with `expr` appended.
    ///
    /// Anything other than AND/OR becomes the first child of a new AND group.
    pub fn append(self, expr: impl Into<Expr>) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(expr.into());
                Expr::And(exprs)
            }
            Expr::Or(mut exprs) => {
                exprs.push(expr.into());
                Expr::Or(exprs)
            }
            other => Expr::And(vec![other, expr.into()]),
        }
    }

    /// Create an equality condition: `column = ?`, `IS NULL` or `IN (...)`.
    pub fn eq(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::eq(column, value))
    }

    /// Create an inequality condition: `column <> ?`, `IS NOT NULL` or `NOT IN (...)`.
    pub fn ne(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::ne(column, value))
    }

    /// Create a less-than condition: column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::lt(column, value))
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::lte(column, value))
    }

    /// Create a greater-than condition: column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::gt(column, value))
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::gte(column, value))
    }

    /// Create a LIKE condition: column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::like(column, pattern))
    }

    /// Create a NOT LIKE condition: column NOT LIKE pattern
    pub fn not_like(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::not_like(column, pattern))
    }

    /// Create an ILIKE condition: column ILIKE pattern (case-insensitive)
    pub fn ilike(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::ilike(column, pattern))
    }

    /// Create a NOT ILIKE condition: column NOT ILIKE pattern
    pub fn not_ilike(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Expr::Pred(Pred::not_ilike(column, pattern))
    }

    /// Create an IS NULL condition: column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::Pred(Pred::eq(column, crate::Value::Null))
    }

    /// Create an IS NOT NULL condition: column IS NOT NULL
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::Pred(Pred::ne(column, crate::Value::Null))
    }

    /// Create a raw SQL template with `?` markers.
    ///
    /// # Example
    /// ```ignore
    /// Expr::raw("id IN ? AND price > ?", args![vec![1, 2, 3], 9.5])
    /// ```
    pub fn raw(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Raw(RawExpr::new(sql, args))
    }

    /// Create a plain SQL fragment without arguments.
    pub fn literal(sql: impl Into<String>) -> Self {
        Expr::Literal(sql.into())
    }

    /// Wrap this expression as `(<expr>) AS alias`.
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }

    /// Whether this is an AND/OR group without children.
    ///
    /// A WHERE/HAVING clause whose only part is such a group is omitted.
    pub fn is_empty_conjunction(&self) -> bool {
        matches!(self, Expr::And(exprs) | Expr::Or(exprs) if exprs.is_empty())
    }

    /// Render with `?` markers.
    pub fn to_sql(&self) -> SqlResult<BuiltQuery> {
        render(self)
    }

    /// Render with `?` markers, panicking on error.
    ///
    /// Only for fragments already known to be valid (e.g. built from constants).
    pub fn must_sql(&self) -> BuiltQuery {
        match self.to_sql() {
            Ok(q) => q,
            Err(e) => panic!("{e}"),
        }
    }

    /// Build the SQL fragment, appending arguments to `params`.
    pub(crate) fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        match self {
            Expr::Pred(p) => p.build(params),
            Expr::And(exprs) => build_conjunction(exprs, " AND ", SQL_TRUE, params),
            Expr::Or(exprs) => build_conjunction(exprs, " OR ", SQL_FALSE, params),
            Expr::Not(inner) => {
                let sql = inner.build(params)?;
                if sql.is_empty() {
                    Ok(sql)
                } else if inner.needs_parens_under_not() {
                    Ok(format!("NOT ({sql})"))
                } else {
                    Ok(format!("NOT {sql}"))
                }
            }
            Expr::Raw(r) => r.build(params),
            Expr::Case(c) => c.build(params),
            Expr::Alias { expr, alias } => {
                let sql = expr.build_unparenthesized(params)?;
                Ok(format!("({sql}) AS {alias}"))
            }
            Expr::Literal(sql) => literal(sql),
            Expr::Select(q) => Ok(format!("({})", q.build_raw(params)?)),
            Expr::Empty => Ok(String::new()),
        }
    }

    /// Like [`Expr::build`], but a nested SELECT is not wrapped in parentheses.
    pub(crate) fn build_unparenthesized(&self, params: &mut ParamList) -> SqlResult<String> {
        match self {
            Expr::Select(q) => q.build_raw(params),
            other => other.build(params),
        }
    }

    fn needs_parens_under_not(&self) -> bool {
        match self {
            Expr::Pred(p) => p.len() > 1,
            Expr::Raw(_) | Expr::Literal(_) => true,
            _ => false,
        }
    }
}

/// Check that a plain SQL string carries no markers and return it.
pub(crate) fn literal(sql: &str) -> SqlResult<String> {
    let markers = count_markers(sql);
    if markers > 0 {
        return Err(SqlError::ArgCount {
            expected: markers,
            actual: 0,
        });
    }
    Ok(sql.to_string())
}

/// Compose `parts` with `sep` between non-empty renderings.
///
/// Parts rendering to empty text contribute neither text, separator nor
/// arguments. The first failing part aborts the whole composition.
pub(crate) fn join(parts: &[Expr], sep: &str, params: &mut ParamList) -> SqlResult<String> {
    let mut out = String::new();
    for part in parts {
        let mark = params.len();
        let sql = part.build(params)?;
        if sql.is_empty() {
            params.truncate(mark);
            continue;
        }
        if !out.is_empty() {
            out.push_str(sep);
        }
        out.push_str(&sql);
    }
    Ok(out)
}

fn build_conjunction(
    exprs: &[Expr],
    sep: &str,
    empty: &str,
    params: &mut ParamList,
) -> SqlResult<String> {
    if exprs.is_empty() {
        return Ok(empty.to_string());
    }
    let sql = join(exprs, sep, params)?;
    if sql.is_empty() {
        Ok(sql)
    } else {
        Ok(format!("({sql})"))
    }
}

/// Render a single fragment with `?` markers.
pub fn render(expr: &Expr) -> SqlResult<BuiltQuery> {
    let mut params = ParamList::new();
    let sql = expr.build(&mut params)?;
    Ok(BuiltQuery::new(sql, params.into_values()))
}

/// Render a sequence of fragments joined by `sep`, with `?` markers.
pub fn render_joined(exprs: &[Expr], sep: &str) -> SqlResult<BuiltQuery> {
    let mut params = ParamList::new();
    let sql = join(exprs, sep, &mut params)?;
    Ok(BuiltQuery::new(sql, params.into_values()))
}

impl From<Pred> for Expr {
    fn from(p: Pred) -> Self {
        Expr::Pred(p)
    }
}

impl From<RawExpr> for Expr {
    fn from(r: RawExpr) -> Self {
        Expr::Raw(r)
    }
}

impl From<CaseExpr> for Expr {
    fn from(c: CaseExpr) -> Self {
        Expr::Case(Box::new(c))
    }
}

impl From<SelectQb> for Expr {
    fn from(q: SelectQb) -> Self {
        Expr::Select(Box::new(q))
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Literal(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(s)
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(e: Option<T>) -> Self {
        e.map_or(Expr::Empty, Into::into)
    }
}

impl From<Pred> for Arg {
    fn from(p: Pred) -> Self {
        Arg::Expr(Box::new(p.into()))
    }
}

impl From<RawExpr> for Arg {
    fn from(r: RawExpr) -> Self {
        Arg::Expr(Box::new(r.into()))
    }
}

impl From<CaseExpr> for Arg {
    fn from(c: CaseExpr) -> Self {
        Arg::Expr(Box::new(c.into()))
    }
}

impl From<SelectQb> for Arg {
    fn from(q: SelectQb) -> Self {
        Arg::Expr(Box::new(q.into()))
    }
}
