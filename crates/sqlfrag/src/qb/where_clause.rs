//! WHERE / HAVING clause accumulation and the shared clause writers.

use crate::error::SqlResult;
use crate::expr::{Expr, join};
use crate::param::ParamList;

/// AND-joined conditions of a WHERE or HAVING clause.
///
/// The clause is left out of the statement when nothing renders, and also
/// when its only condition is an empty `And`/`Or` group (`Expr::Empty` parts
/// are not conditions): an absent filter means "no filter", not "match
/// nothing". Callers who want a guaranteed no-match filter pass an explicit
/// condition such as `Expr::literal("1=0")`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WhereClause {
    parts: Vec<Expr>,
}

impl WhereClause {
    /// Create an empty clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    pub fn push(&mut self, expr: Expr) {
        self.parts.push(expr);
    }

    /// Check if no condition has been added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Render the conditions, or empty text when the clause is omitted.
    pub(crate) fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        let mut present = self.parts.iter().filter(|p| !matches!(p, Expr::Empty));
        if let (Some(only), None) = (present.next(), present.next()) {
            if only.is_empty_conjunction() {
                return Ok(String::new());
            }
        }
        join(&self.parts, " AND ", params)
    }

    /// Write ` <keyword> <conditions>` unless the clause is omitted.
    pub(crate) fn write(
        &self,
        keyword: &str,
        sql: &mut String,
        params: &mut ParamList,
    ) -> SqlResult<()> {
        let body = self.build(params)?;
        if !body.is_empty() {
            sql.push(' ');
            sql.push_str(keyword);
            sql.push(' ');
            sql.push_str(&body);
        }
        Ok(())
    }
}

/// Write ` <keyword> <parts joined by sep>` when any part renders.
pub(crate) fn write_list(
    keyword: &str,
    parts: &[Expr],
    sep: &str,
    sql: &mut String,
    params: &mut ParamList,
) -> SqlResult<()> {
    let body = join(parts, sep, params)?;
    if !body.is_empty() {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(&body);
    }
    Ok(())
}

/// Write the statement prefix followed by a space.
pub(crate) fn write_prefix(
    prefixes: &[Expr],
    sql: &mut String,
    params: &mut ParamList,
) -> SqlResult<()> {
    let body = join(prefixes, " ", params)?;
    if !body.is_empty() {
        sql.push_str(&body);
        sql.push(' ');
    }
    Ok(())
}

/// Write a space followed by the statement suffix.
pub(crate) fn write_suffix(
    suffixes: &[Expr],
    sql: &mut String,
    params: &mut ParamList,
) -> SqlResult<()> {
    let body = join(suffixes, " ", params)?;
    if !body.is_empty() {
        sql.push(' ');
        sql.push_str(&body);
    }
    Ok(())
}

/// Write `LIMIT n` and `OFFSET n` when set.
pub(crate) fn write_limit_offset(sql: &mut String, limit: Option<u64>, offset: Option<u64>) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&limit.to_string());
    }
    if let Some(offset) = offset {
        sql.push_str(" OFFSET ");
        sql.push_str(&offset.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn build(w: &WhereClause) -> (String, Vec<Value>) {
        let mut params = ParamList::new();
        let sql = w.build(&mut params).expect("where clause renders");
        (sql, params.into_values())
    }

    #[test]
    fn test_sole_empty_or_omits_clause() {
        let mut w = WhereClause::new();
        w.push(Expr::or(vec![]));
        assert_eq!(build(&w), (String::new(), vec![]));
    }

    #[test]
    fn test_sole_empty_and_omits_clause() {
        let mut w = WhereClause::new();
        w.push(Expr::and(vec![]));
        assert_eq!(build(&w).0, "");
    }

    #[test]
    fn test_empty_or_next_to_other_parts_is_kept() {
        let mut w = WhereClause::new();
        w.push(Expr::or(vec![]));
        w.push(Expr::eq("a", 1));
        assert_eq!(build(&w).0, "(1=0) AND a = ?");
    }

    #[test]
    fn test_empty_in_list_is_never_omitted() {
        let mut w = WhereClause::new();
        w.push(Expr::eq("id", Vec::<i64>::new()));
        assert_eq!(build(&w).0, "(1=0)");
    }

    #[test]
    fn test_all_empty_parts_omit_clause() {
        let mut w = WhereClause::new();
        w.push(Expr::Empty);
        w.push(Expr::not(Expr::Empty));
        let mut sql = String::from("DELETE FROM t");
        let mut params = ParamList::new();
        w.write("WHERE", &mut sql, &mut params).expect("renders");
        assert_eq!(sql, "DELETE FROM t");
    }

    #[test]
    fn test_limit_offset() {
        let mut sql = String::new();
        write_limit_offset(&mut sql, Some(2), Some(3));
        assert_eq!(sql, " LIMIT 2 OFFSET 3");
    }

    #[test]
    fn test_absent_parts_do_not_count_as_conditions() {
        let mut w = WhereClause::new();
        w.push(Expr::Empty);
        w.push(Expr::or(vec![]));
        w.push(Expr::from(None::<Expr>));
        assert_eq!(build(&w), (String::new(), vec![]));
    }
}
