//! Statement builders (QB) for SELECT, INSERT/REPLACE, UPDATE and DELETE.
//!
//! Builders are thin: they keep an ordered list of fragments per clause,
//! render each clause once with `?` markers and number the markers once for
//! the whole statement.
//!
//! # Usage
//!
//! ```ignore
//! use sqlfrag::prelude::*;
//!
//! // SELECT
//! let q = qb::select(&["id", "name"])
//!     .from("users")
//!     .eq("status", "active")
//!     .raw_where("id NOT IN ?", args![vec![5, 10, 15]])
//!     .order_by(&["name ASC"])
//!     .limit(20)
//!     .placeholder_format(PlaceholderFormat::Dollar)
//!     .to_sql()?;
//!
//! // INSERT
//! let q = qb::insert("users")
//!     .columns(&["username", "email"])
//!     .values(args!["alice", "alice@example.com"])
//!     .to_sql()?;
//!
//! // UPDATE
//! let q = qb::update("users")
//!     .set("status", "inactive")
//!     .eq("id", user_id)
//!     .to_sql()?;
//!
//! // DELETE
//! let q = qb::delete("users").eq("id", user_id).to_sql()?;
//! ```

mod delete;
mod insert;
mod join;
mod select;
mod traits;
mod update;
mod where_clause;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use join::JoinOn;
pub use select::SelectQb;
pub use traits::{Filter, QueryType, SqlQb};
pub use update::UpdateQb;
pub use where_clause::WhereClause;

/// Create a SELECT builder with the given result columns.
///
/// # Example
/// ```ignore
/// let qb = sqlfrag::qb::select(&["*"]).from("users").eq("id", 1);
/// ```
pub fn select(columns: &[&str]) -> SelectQb {
    SelectQb::new().columns(columns)
}

/// Create an INSERT builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = sqlfrag::qb::insert("users")
///     .columns(&["username", "email"])
///     .values(args!["alice", "alice@example.com"]);
/// ```
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create a MySQL REPLACE builder for the given table.
pub fn replace(table: &str) -> InsertQb {
    InsertQb::replace(table)
}

/// Create an UPDATE builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = sqlfrag::qb::update("users")
///     .set("status", "inactive")
///     .eq("id", user_id);
/// ```
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
///
/// Without conditions the statement has no WHERE clause. The same holds when
/// the only condition is an empty `And`/`Or` group.
///
/// # Example
/// ```ignore
/// let qb = sqlfrag::qb::delete("users").eq("id", user_id);
/// ```
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

#[cfg(test)]
mod tests;
