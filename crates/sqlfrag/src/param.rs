//! Caller-supplied arguments and the ordered argument list built during rendering.

use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::value::Value;
use chrono::{DateTime, Utc};
use tokio_postgres::types::ToSql;

/// An argument as supplied by the caller, before rendering.
///
/// - `Value`: a scalar (or NULL), bound to one marker.
/// - `List`: a collection; expanded to one marker per element where allowed.
/// - `Expr`: a nested fragment rendered in place of its marker.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Value(Value),
    List(Vec<Value>),
    Expr(Box<Expr>),
}

impl Arg {
    /// Collect any iterator of values into a list argument.
    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Arg::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<Vec<Value>> for Arg {
    fn from(v: Vec<Value>) -> Self {
        Arg::List(v)
    }
}

impl From<Expr> for Arg {
    fn from(e: Expr) -> Self {
        Arg::Expr(Box::new(e))
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(v.into())
                }
            }

            impl From<Option<$ty>> for Arg {
                fn from(v: Option<$ty>) -> Self {
                    Arg::Value(v.into())
                }
            }

            impl From<Vec<$ty>> for Arg {
                fn from(v: Vec<$ty>) -> Self {
                    Arg::list(v)
                }
            }

            impl From<&[$ty]> for Arg {
                fn from(v: &[$ty]) -> Self {
                    Arg::list(v.iter().cloned())
                }
            }

            impl<const N: usize> From<[$ty; N]> for Arg {
                fn from(v: [$ty; N]) -> Self {
                    Arg::list(v)
                }
            }
        )*
    };
}

impl_arg_from!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    serde_json::Value,
    uuid::Uuid,
    DateTime<Utc>,
);

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Value(v.into())
    }
}

impl From<Option<&str>> for Arg {
    fn from(v: Option<&str>) -> Self {
        Arg::Value(v.into())
    }
}

impl From<Vec<&str>> for Arg {
    fn from(v: Vec<&str>) -> Self {
        Arg::list(v)
    }
}

impl From<&[&str]> for Arg {
    fn from(v: &[&str]) -> Self {
        Arg::list(v.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Arg {
    fn from(v: [&str; N]) -> Self {
        Arg::list(v)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```ignore
/// let a = sqlfrag::args!["electronics", vec![10, 20, 30], 99.99];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Ordered argument list collected while rendering.
///
/// Arguments are only ever appended, so their order matches the left-to-right
/// order of the markers written alongside them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a value and return its 1-based index.
    pub fn push(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Drop everything pushed after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.params.truncate(len);
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    /// Consume the list, returning the values in marker order.
    pub fn into_values(self) -> Vec<Value> {
        self.params
    }
}

/// Write `arg` in place of one marker.
///
/// A list expands to a parenthesized, comma-joined marker list; an empty list
/// is an error because `IN ()` is not valid SQL. A nested fragment that
/// renders nothing is an error too.
pub(crate) fn write_arg(sql: &mut String, arg: &Arg, params: &mut ParamList) -> SqlResult<()> {
    match arg {
        Arg::Value(v) => {
            params.push(v.clone());
            sql.push('?');
        }
        Arg::List(vals) => {
            if vals.is_empty() {
                return Err(SqlError::EmptyCollection);
            }
            write_list(sql, vals, params);
        }
        Arg::Expr(e) => {
            let inner = e.build(params)?;
            if inner.is_empty() {
                return Err(SqlError::EmptyFragment);
            }
            sql.push_str(&inner);
        }
    }
    Ok(())
}

/// Write `(?,?,...)` for a non-empty list of values.
pub(crate) fn write_list(sql: &mut String, vals: &[Value], params: &mut ParamList) {
    sql.push('(');
    for (i, v) in vals.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
        params.push(v.clone());
    }
    sql.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_macro() {
        let a = args!["electronics", vec![10, 20, 30], 99.99];
        assert_eq!(
            a,
            vec![
                Arg::Value(Value::from("electronics")),
                Arg::List(vec![Value::Int(10), Value::Int(20), Value::Int(30)]),
                Arg::Value(Value::Float(99.99)),
            ]
        );
        assert!(args![].is_empty());
    }

    #[test]
    fn test_slice_and_array_become_lists() {
        let ids = [1i64, 2];
        assert_eq!(Arg::from(&ids[..]), Arg::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(Arg::from(["a", "b"]), Arg::list(["a", "b"]));
    }

    #[test]
    fn test_write_arg_expands_list() {
        let mut sql = String::new();
        let mut params = ParamList::new();
        write_arg(&mut sql, &Arg::from(vec![1, 2, 3]), &mut params).expect("non-empty list");
        assert_eq!(sql, "(?,?,?)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_write_arg_rejects_empty_list() {
        let mut sql = String::new();
        let mut params = ParamList::new();
        let err = write_arg(&mut sql, &Arg::List(vec![]), &mut params).unwrap_err();
        assert_eq!(err, SqlError::EmptyCollection);
    }

    #[test]
    fn test_write_arg_rejects_empty_fragment() {
        let mut sql = String::from("a = ");
        let mut params = ParamList::new();
        let arg = Arg::from(Expr::and(vec![Expr::Empty]));
        let err = write_arg(&mut sql, &arg, &mut params).unwrap_err();
        assert_eq!(err, SqlError::EmptyFragment);
    }
}
