//! # sqlfrag
//!
//! Composable SQL fragments and statement builders that produce a
//! parameterized SQL string plus an ordered argument list.
//!
//! ## Features
//!
//! - **Fragments**: predicates, AND/OR/NOT, raw SQL with `?` markers, CASE,
//!   aliases and nested SELECTs, all composed through one [`Expr`] type
//! - **Marker/argument correspondence**: every `?` in the output has exactly one
//!   argument, in the same left-to-right order
//! - **Slice expansion**: `Expr::raw("id IN ?", args![vec![1, 2, 3]])` renders
//!   `id IN (?,?,?)`
//! - **Empty-filter policy**: an empty `And`/`Or` as the only WHERE condition
//!   drops the WHERE clause; `IN` over an empty list renders `(1=0)`
//! - **Placeholder formats**: `?`, `$n`, `:n` and `@pn`, applied once per statement
//! - **Driver ready**: [`Value`] implements `tokio_postgres::types::ToSql`
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//!
//! let q = qb::select(&["id", "name"])
//!     .from("users")
//!     .eq("status", "active")
//!     .and_where(Expr::not(Expr::or(vec![
//!         Expr::eq("deleted", true),
//!         Expr::eq("banned", true),
//!     ])))
//!     .placeholder_format(PlaceholderFormat::Dollar)
//!     .to_sql()?;
//!
//! // SELECT id, name FROM users WHERE status = $1 AND NOT (deleted = $2 OR banned = $3)
//! client.query(&q.sql, &q.params_ref()).await?;
//! ```
//!
//! ## Logging
//!
//! With the default `tracing` feature every statement build emits a `debug`
//! event on target `sqlfrag.sql`.

pub mod error;
pub mod expr;
pub mod param;
pub mod placeholder;
pub mod prelude;
pub mod qb;
pub mod query;
pub mod value;

pub use error::{SqlError, SqlResult};
pub use expr::{
    CaseExpr, CaseOperand, CmpOp, Expr, Pred, RawExpr, SQL_FALSE, SQL_TRUE, case, case_of, raw,
    render, render_joined,
};
pub use param::{Arg, ParamList};
pub use placeholder::{PlaceholderFormat, count_markers, rewrite};
pub use query::BuiltQuery;
pub use value::Value;

pub use qb::{
    DeleteQb, Filter, InsertQb, JoinOn, QueryType, SelectQb, SqlQb, UpdateQb, WhereClause, delete, insert,
    replace, select, update,
};
