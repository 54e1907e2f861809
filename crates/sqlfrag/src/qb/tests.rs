//! Integration tests for the qb module.

use crate::args;
use crate::expr::{Expr, case_of};
use crate::placeholder::PlaceholderFormat;
use crate::qb::{Filter, SqlQb, delete, insert, select, update};
use crate::value::Value;

#[test]
fn test_select_basic() {
    let q = select(&["*"]).from("users").must_sql();
    assert_eq!(q.sql, "SELECT * FROM users");
}

#[test]
fn test_select_with_conditions() {
    let q = select(&["*"])
        .from("users")
        .eq("status", "active")
        .gt("age", 18)
        .limit(10)
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();

    assert_eq!(
        q.sql,
        "SELECT * FROM users WHERE status = $1 AND age > $2 LIMIT 10"
    );
    assert_eq!(q.params, vec![Value::from("active"), Value::Int(18)]);
}

#[test]
fn test_insert_basic() {
    let q = insert("users")
        .columns(&["username", "email"])
        .values(args!["alice", "alice@example.com"])
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();
    assert_eq!(q.sql, "INSERT INTO users (username,email) VALUES ($1,$2)");
}

#[test]
fn test_update_basic() {
    let q = update("users")
        .set("status", "inactive")
        .eq("id", 1)
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();
    assert_eq!(q.sql, "UPDATE users SET status = $1 WHERE id = $2");
}

#[test]
fn test_delete_basic() {
    let q = delete("users")
        .eq("id", 1)
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();
    assert_eq!(q.sql, "DELETE FROM users WHERE id = $1");
}

#[test]
fn test_complex_where_expr() {
    let q = select(&["*"])
        .from("users")
        .and_where(Expr::and(vec![
            Expr::eq("status", "active"),
            Expr::or(vec![
                Expr::eq("role", "admin"),
                Expr::and(vec![Expr::eq("role", "user"), Expr::gt("reputation", 100)]),
            ]),
        ]))
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();

    assert_eq!(
        q.sql,
        "SELECT * FROM users WHERE (status = $1 AND (role = $2 OR (role = $3 AND reputation > $4)))"
    );
    assert_eq!(q.params.len(), 4);
}

#[test]
fn test_select_with_join_group_having() {
    let q = select(&["u.*", "COUNT(o.id) AS order_count"])
        .from("users u")
        .left_join("orders o ON u.id = o.user_id", args![])
        .eq("u.status", "active")
        .group_by(&["u.id"])
        .having(Expr::gt("COUNT(o.id)", 5))
        .order_by_desc("order_count")
        .limit(10)
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();

    assert_eq!(
        q.sql,
        "SELECT u.*, COUNT(o.id) AS order_count FROM users u \
         LEFT JOIN orders o ON u.id = o.user_id WHERE u.status = $1 \
         GROUP BY u.id HAVING COUNT(o.id) > $2 ORDER BY order_count DESC LIMIT 10"
    );
}

#[test]
fn test_empty_in_list_semantics() {
    let q = select(&["*"]).from("users").eq("id", Vec::<i32>::new()).must_sql();
    assert_eq!(q.sql, "SELECT * FROM users WHERE (1=0)");

    let q = select(&["*"]).from("users").ne("id", Vec::<i32>::new()).must_sql();
    assert_eq!(q.sql, "SELECT * FROM users WHERE (1=1)");
}

#[test]
fn test_optional_conditions() {
    let status: Option<&str> = Some("active");
    let name: Option<&str> = None;

    let q = select(&["*"])
        .from("users")
        .and_where_opt(status.map(|s| Expr::eq("status", s)))
        .and_where_opt(name.map(|n| Expr::eq("name", n)))
        .and_where_opt(Some(Expr::gte("age", 18)))
        .must_sql();

    assert_eq!(q.sql, "SELECT * FROM users WHERE status = ? AND age >= ?");
}

#[test]
fn test_not_and_slice_expansion_combined() {
    let status = case_of("status").when("'active'", 1).when("'pending'", 0).otherwise(-1);
    let q = select(&["id", "name"])
        .column(status.alias("status_code"))
        .from("users")
        .raw_where("id NOT IN ?", args![vec![5, 10, 15]])
        .and_where(Expr::not(Expr::or(vec![
            Expr::eq("deleted", true),
            Expr::eq("banned", true),
        ])))
        .order_by(&["status_code DESC", "name ASC"])
        .must_sql();

    assert_eq!(
        q.sql,
        "SELECT id, name, (CASE status WHEN 'active' THEN ? WHEN 'pending' THEN ? ELSE ? END) AS status_code \
         FROM users WHERE id NOT IN (?,?,?) AND NOT (deleted = ? OR banned = ?) \
         ORDER BY status_code DESC, name ASC"
    );
    assert_eq!(
        q.params,
        vec![
            Value::Int(1),
            Value::Int(0),
            Value::Int(-1),
            Value::Int(5),
            Value::Int(10),
            Value::Int(15),
            Value::Bool(true),
            Value::Bool(true),
        ]
    );
}

#[test]
fn test_build_errors_bubble_up() {
    let broken = select(&["*"]).from("t").raw_where("a IN ?", args![Vec::<i64>::new()]);
    let err = update("users")
        .set("x", 1)
        .raw_where("id IN ?", args![broken])
        .to_sql()
        .unwrap_err();
    assert_eq!(err, crate::SqlError::EmptyCollection);
}

#[test]
fn test_placeholder_mismatch_reported() {
    let err = select(&["*"])
        .from("users")
        .and_where("name = '?'")
        .to_sql()
        .unwrap_err();
    assert!(err.is_count_mismatch());
}

#[test]
fn test_escaped_marker_through_statement() {
    let q = select(&["*"])
        .from("docs")
        .raw_where("data ?? ?", args!["key"])
        .placeholder_format(PlaceholderFormat::Dollar)
        .must_sql();
    assert_eq!(q.sql, "SELECT * FROM docs WHERE data ? $1");
    assert_eq!(q.params, vec![Value::from("key")]);
}
