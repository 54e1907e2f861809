//! Convenient imports for typical `sqlfrag` usage.
//!
//! Brings the builder traits into scope so the WHERE shortcuts and `to_sql`
//! resolve:
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//! ```

pub use crate::{
    Arg, BuiltQuery, CaseExpr, Expr, Filter, JoinOn, PlaceholderFormat, Pred, RawExpr, SqlError,
    SqlQb, SqlResult, Value, args, case, case_of, qb, raw,
};
