//! CASE expression builder.

use super::{Expr, Pred, RawExpr, literal};
use crate::error::{SqlError, SqlResult};
use crate::param::ParamList;
use crate::qb::SelectQb;
use crate::value::Value;
use chrono::{DateTime, Utc};

/// One slot of a CASE expression: subject, WHEN condition, THEN result or ELSE.
///
/// Text is emitted verbatim so column names, keywords and pre-quoted literals
/// read naturally. Every other scalar is always bound as an argument.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseOperand {
    /// SQL text, written as-is. Must not contain markers.
    Sql(String),
    /// Nested fragment, rendered in place.
    Expr(Box<Expr>),
    /// Bound scalar: one `?`.
    Value(Value),
}

impl CaseOperand {
    fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        match self {
            CaseOperand::Sql(sql) => literal(sql),
            CaseOperand::Expr(e) => e.build(params),
            CaseOperand::Value(v) => {
                params.push(v.clone());
                Ok("?".to_string())
            }
        }
    }
}

impl From<&str> for CaseOperand {
    fn from(sql: &str) -> Self {
        CaseOperand::Sql(sql.to_string())
    }
}

impl From<String> for CaseOperand {
    fn from(sql: String) -> Self {
        CaseOperand::Sql(sql)
    }
}

impl From<Value> for CaseOperand {
    fn from(v: Value) -> Self {
        CaseOperand::Value(v)
    }
}

impl From<Expr> for CaseOperand {
    fn from(e: Expr) -> Self {
        CaseOperand::Expr(Box::new(e))
    }
}

macro_rules! impl_operand_from {
    (value: $($ty:ty),*; expr: $($fragment:ty),*) => {
        $(
            impl From<$ty> for CaseOperand {
                fn from(v: $ty) -> Self {
                    CaseOperand::Value(v.into())
                }
            }
        )*
        $(
            impl From<$fragment> for CaseOperand {
                fn from(f: $fragment) -> Self {
                    CaseOperand::Expr(Box::new(f.into()))
                }
            }
        )*
    };
}

impl_operand_from!(
    value: bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, serde_json::Value, uuid::Uuid, DateTime<Utc>;
    expr: Pred, RawExpr, CaseExpr, SelectQb
);

/// `CASE [subject] WHEN c THEN r ... [ELSE d] END`
///
/// At least one WHEN is required; that is checked when the expression is
/// rendered so the builder can be filled incrementally.
///
/// # Example
///
/// ```ignore
/// let status = CaseExpr::with_subject("order_status")
///     .when("'pending'", 0)
///     .when("'completed'", 2)
///     .otherwise(99);
/// // CASE order_status WHEN 'pending' THEN ? WHEN 'completed' THEN ? ELSE ? END
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaseExpr {
    subject: Option<CaseOperand>,
    whens: Vec<(CaseOperand, CaseOperand)>,
    default: Option<CaseOperand>,
}

impl CaseExpr {
    /// Searched CASE: `CASE WHEN <cond> THEN ...`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simple CASE: `CASE <subject> WHEN <value> THEN ...`.
    pub fn with_subject(subject: impl Into<CaseOperand>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Add a `WHEN <condition> THEN <result>` pair.
    pub fn when(mut self, condition: impl Into<CaseOperand>, result: impl Into<CaseOperand>) -> Self {
        self.whens.push((condition.into(), result.into()));
        self
    }

    /// Set the `ELSE` result, replacing any earlier one.
    pub fn otherwise(mut self, result: impl Into<CaseOperand>) -> Self {
        self.default = Some(result.into());
        self
    }

    /// Wrap as `(CASE ... END) AS alias`.
    pub fn alias(self, alias: impl Into<String>) -> Expr {
        Expr::from(self).alias(alias)
    }

    pub(crate) fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.whens.is_empty() {
            return Err(SqlError::MissingWhen);
        }

        let mut sql = String::from("CASE ");
        if let Some(subject) = &self.subject {
            let subject = subject.build(params)?;
            if !subject.is_empty() {
                sql.push_str(&subject);
                sql.push(' ');
            }
        }
        for (condition, result) in &self.whens {
            sql.push_str("WHEN ");
            sql.push_str(&condition.build(params)?);
            sql.push_str(" THEN ");
            sql.push_str(&result.build(params)?);
            sql.push(' ');
        }
        if let Some(default) = &self.default {
            sql.push_str("ELSE ");
            sql.push_str(&default.build(params)?);
            sql.push(' ');
        }
        sql.push_str("END");
        Ok(sql)
    }
}

/// Start a searched CASE expression.
pub fn case() -> CaseExpr {
    CaseExpr::new()
}

/// Start a simple CASE expression over `subject`.
pub fn case_of(subject: impl Into<CaseOperand>) -> CaseExpr {
    CaseExpr::with_subject(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn build(c: &CaseExpr) -> SqlResult<(String, Vec<Value>)> {
        let mut params = ParamList::new();
        let sql = c.build(&mut params)?;
        Ok((sql, params.into_values()))
    }

    #[test]
    fn test_subject_with_text_slots() {
        let c = case_of("number")
            .when("1", "one")
            .when("2", "two")
            .otherwise(Expr::raw("?", args!["big number"]));
        let (sql, args) = build(&c).expect("case");
        assert_eq!(sql, "CASE number WHEN 1 THEN one WHEN 2 THEN two ELSE ? END");
        assert_eq!(args, vec![Value::from("big number")]);
    }

    #[test]
    fn test_subject_as_fragment() {
        let c = case_of(RawExpr::new("? > ?", args![10, 5])).when("true", "'T'");
        let (sql, args) = build(&c).expect("case");
        assert_eq!(sql, "CASE ? > ? WHEN true THEN 'T' END");
        assert_eq!(args, vec![Value::Int(10), Value::Int(5)]);
    }

    #[test]
    fn test_searched_case_with_fragments() {
        let c = case()
            .when(Pred::eq("x", 0), "x is zero")
            .when(
                RawExpr::new("x > ?", args![1]),
                RawExpr::new("CONCAT('x is greater than ', ?)", args![2]),
            );
        let (sql, args) = build(&c).expect("case");
        assert_eq!(
            sql,
            "CASE WHEN x = ? THEN x is zero WHEN x > ? THEN CONCAT('x is greater than ', ?) END"
        );
        assert_eq!(args, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_order_status_binds_non_text_results() {
        let c = case_of("order_status")
            .when("'pending'", 0)
            .when("'processing'", 1)
            .when("'completed'", 2)
            .otherwise(99);
        let (sql, args) = build(&c).expect("case");
        assert_eq!(
            sql,
            "CASE order_status WHEN 'pending' THEN ? WHEN 'processing' THEN ? WHEN 'completed' THEN ? ELSE ? END"
        );
        assert_eq!(
            args,
            vec![Value::Int(0), Value::Int(1), Value::Int(2), Value::Int(99)]
        );
    }

    #[test]
    fn test_mixed_types() {
        let c = case()
            .when(Pred::eq("type", "A"), 100)
            .when(Pred::eq("type", "B"), 200.5)
            .when(Pred::eq("type", "C"), true)
            .otherwise("default");
        let (sql, args) = build(&c).expect("case");
        assert_eq!(
            sql,
            "CASE WHEN type = ? THEN ? WHEN type = ? THEN ? WHEN type = ? THEN ? ELSE default END"
        );
        assert_eq!(
            args,
            vec![
                Value::from("A"),
                Value::Int(100),
                Value::from("B"),
                Value::Float(200.5),
                Value::from("C"),
                Value::Bool(true),
            ]
        );
    }

    #[test]
    fn test_text_pair_binds_nothing() {
        let c = case_of("kind").when("'a'", "'alpha'").when("'b'", 2);
        let (sql, args) = build(&c).expect("case");
        assert_eq!(sql, "CASE kind WHEN 'a' THEN 'alpha' WHEN 'b' THEN ? END");
        assert_eq!(args, vec![Value::Int(2)]);
    }

    #[test]
    fn test_missing_when() {
        let err = build(&case_of("something").otherwise("42")).unwrap_err();
        assert_eq!(err, SqlError::MissingWhen);
        assert_eq!(
            err.to_string(),
            "case expression must contain at least one WHEN clause"
        );
    }

    #[test]
    fn test_empty_subject_is_skipped() {
        let (sql, _) = build(&case_of("").when("a = 1", "'one'")).expect("case");
        assert_eq!(sql, "CASE WHEN a = 1 THEN 'one' END");
    }

    #[test]
    fn test_marker_in_text_slot_fails() {
        let err = build(&case().when("a = ?", "1")).unwrap_err();
        assert!(err.is_count_mismatch());
    }

    #[test]
    fn test_builder_is_persistent() {
        let base = case_of("s").when("1", "'one'");
        let extended = base.clone().when("2", "'two'");
        assert_eq!(build(&base).expect("base").0, "CASE s WHEN 1 THEN 'one' END");
        assert_eq!(
            build(&extended).expect("extended").0,
            "CASE s WHEN 1 THEN 'one' WHEN 2 THEN 'two' END"
        );
    }
}
