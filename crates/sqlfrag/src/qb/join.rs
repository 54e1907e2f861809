//! JOIN clauses of a SELECT: raw text joins and joins against a sub-select.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Expr, Pred, RawExpr};
use crate::param::{Arg, ParamList};
use crate::qb::select::SelectQb;
use crate::qb::traits::SqlQb;

/// ON clause of a join against a sub-select.
///
/// ```ignore
/// qb::select(&["u.id", "o.total"])
///     .from("users u")
///     .left_join_select(orders, "o", "o.user_id = u.id AND o.total > ?", args![100])
///     .left_join_select(items, "i", Expr::raw("i.user_id = u.id", args![]), args![]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum JoinOn {
    /// No ON clause.
    #[default]
    None,
    /// SQL text with `?` markers, bound to the arguments passed with the join.
    Sql(String),
    /// A fragment carrying its own arguments.
    Expr(Expr),
}

impl From<&str> for JoinOn {
    fn from(sql: &str) -> Self {
        JoinOn::Sql(sql.to_string())
    }
}

impl From<String> for JoinOn {
    fn from(sql: String) -> Self {
        JoinOn::Sql(sql)
    }
}

impl From<Expr> for JoinOn {
    fn from(e: Expr) -> Self {
        JoinOn::Expr(e)
    }
}

impl From<Pred> for JoinOn {
    fn from(p: Pred) -> Self {
        JoinOn::Expr(p.into())
    }
}

impl From<RawExpr> for JoinOn {
    fn from(r: RawExpr) -> Self {
        JoinOn::Expr(r.into())
    }
}

impl<T: Into<JoinOn>> From<Option<T>> for JoinOn {
    fn from(on: Option<T>) -> Self {
        on.map_or(JoinOn::None, Into::into)
    }
}

/// `<keyword> (<sub-select>) AS alias [ON ...]`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SelectJoin {
    keyword: &'static str,
    query: Box<SelectQb>,
    alias: String,
    on: JoinOn,
    args: Vec<Arg>,
}

impl SelectJoin {
    pub(crate) fn new(
        keyword: &'static str,
        query: SelectQb,
        alias: String,
        on: JoinOn,
        args: Vec<Arg>,
    ) -> Self {
        Self {
            keyword,
            query: Box::new(query),
            alias,
            on,
            args,
        }
    }

    fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        if self.alias.trim().is_empty() {
            return Err(SqlError::validation("join alias must not be empty"));
        }

        let mut sql = format!(
            "{} ({}) AS {}",
            self.keyword,
            self.query.build_raw(params)?,
            self.alias
        );

        let on = match &self.on {
            JoinOn::Sql(text) if !text.trim().is_empty() => {
                RawExpr::new(text.as_str(), self.args.clone()).build(params)?
            }
            JoinOn::None | JoinOn::Sql(_) => {
                if !self.args.is_empty() {
                    return Err(SqlError::validation(
                        "join ON clause arguments provided without an ON clause",
                    ));
                }
                String::new()
            }
            JoinOn::Expr(e) => {
                if !self.args.is_empty() {
                    return Err(SqlError::validation(
                        "join ON clause arguments must be empty when ON clause is a fragment",
                    ));
                }
                let mark = params.len();
                let on = e.build(params)?;
                if on.is_empty() {
                    params.truncate(mark);
                }
                on
            }
        };

        if !on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&on);
        }
        Ok(sql)
    }
}

/// One JOIN of a SELECT, in the order it was added.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Join {
    Raw(Expr),
    Select(SelectJoin),
}

/// Write ` <join> <join> ...`, skipping raw joins that render nothing.
pub(crate) fn write_joins(joins: &[Join], sql: &mut String, params: &mut ParamList) -> SqlResult<()> {
    for join in joins {
        let mark = params.len();
        let part = match join {
            Join::Raw(e) => e.build(params)?,
            Join::Select(j) => j.build(params)?,
        };
        if part.is_empty() {
            params.truncate(mark);
            continue;
        }
        sql.push(' ');
        sql.push_str(&part);
    }
    Ok(())
}
