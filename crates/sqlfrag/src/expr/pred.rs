//! Field/value comparison predicates.

use super::{SQL_FALSE, SQL_TRUE};
use crate::error::{SqlError, SqlResult};
use crate::param::{Arg, ParamList, write_list};
use crate::value::Value;
use std::collections::HashMap;

/// Comparison operator of a [`Pred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl CmpOp {
    /// SQL operator text.
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::NotEq => "<>",
            CmpOp::Lt => "<",
            CmpOp::LtEq => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtEq => ">=",
            CmpOp::Like => "LIKE",
            CmpOp::NotLike => "NOT LIKE",
            CmpOp::ILike => "ILIKE",
            CmpOp::NotILike => "NOT ILIKE",
        }
    }
}

/// One comparison operator applied to an ordered list of fields.
///
/// Each field renders according to its value:
///
/// | value            | `Eq`                | `NotEq`                 | other ops |
/// |------------------|---------------------|-------------------------|-----------|
/// | NULL             | `f IS NULL`         | `f IS NOT NULL`         | error     |
/// | empty list       | `(1=0)`             | `(1=1)`                 | error     |
/// | list             | `f IN (?,?)`        | `f NOT IN (?,?)`        | error     |
/// | scalar           | `f = ?`             | `f <> ?`                | `f op ?`  |
/// | nested fragment  | `f = <sql>`         | `f <> <sql>`            | `f op <sql>` |
///
/// Fields are joined with `AND` in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct Pred {
    op: CmpOp,
    fields: Vec<(String, Arg)>,
}

impl Pred {
    /// Create a predicate with no fields yet.
    pub fn new(op: CmpOp) -> Self {
        Self {
            op,
            fields: Vec::new(),
        }
    }

    /// Build from a map. Keys are sorted so the argument order is stable.
    pub fn from_map<K, V>(op: CmpOp, map: HashMap<K, V>) -> Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let mut fields: Vec<(String, Arg)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Self { op, fields }
    }

    /// Return a copy with one more field.
    pub fn field(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::Eq).field(column, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::NotEq).field(column, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::Lt).field(column, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::LtEq).field(column, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::Gt).field(column, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::new(CmpOp::GtEq).field(column, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Self::new(CmpOp::Like).field(column, pattern)
    }

    pub fn not_like(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Self::new(CmpOp::NotLike).field(column, pattern)
    }

    pub fn ilike(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Self::new(CmpOp::ILike).field(column, pattern)
    }

    pub fn not_ilike(column: impl Into<String>, pattern: impl Into<Arg>) -> Self {
        Self::new(CmpOp::NotILike).field(column, pattern)
    }

    pub fn op(&self) -> CmpOp {
        self.op
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.fields.is_empty() {
            return Err(SqlError::EmptyPredicate);
        }
        let mut parts = Vec::with_capacity(self.fields.len());
        for (column, value) in &self.fields {
            parts.push(self.build_field(column, value, params)?);
        }
        Ok(parts.join(" AND "))
    }

    fn build_field(&self, column: &str, value: &Arg, params: &mut ParamList) -> SqlResult<String> {
        let op = self.op;
        match value {
            Arg::Value(Value::Null) => match op {
                CmpOp::Eq => Ok(format!("{column} IS NULL")),
                CmpOp::NotEq => Ok(format!("{column} IS NOT NULL")),
                _ => Err(SqlError::unsupported(column, op.as_str())),
            },
            Arg::List(vals) => {
                let (in_op, when_empty) = match op {
                    CmpOp::Eq => ("IN", SQL_FALSE),
                    CmpOp::NotEq => ("NOT IN", SQL_TRUE),
                    _ => return Err(SqlError::unsupported(column, op.as_str())),
                };
                if vals.is_empty() {
                    return Ok(when_empty.to_string());
                }
                let mut sql = format!("{column} {in_op} ");
                write_list(&mut sql, vals, params);
                Ok(sql)
            }
            Arg::Value(v) => {
                params.push(v.clone());
                Ok(format!("{column} {} ?", op.as_str()))
            }
            Arg::Expr(e) => {
                let inner = e.build(params)?;
                if inner.is_empty() {
                    return Err(SqlError::unsupported(column, op.as_str()));
                }
                Ok(format!("{column} {} {inner}", op.as_str()))
            }
        }
    }
}
