//! Raw SQL templates with positional markers.

use crate::error::{SqlError, SqlResult};
use crate::param::{Arg, ParamList, write_arg};
use crate::placeholder::{Piece, count_markers, pieces};

/// A SQL template paired with one argument per `?` marker.
///
/// Collection arguments expand in place: `"id IN ?"` with `[1, 2, 3]` renders
/// `"id IN (?,?,?)"` and binds three values. Nested fragments render in place
/// of their marker. `??` is an escaped `?` and takes no argument.
#[derive(Clone, Debug, PartialEq)]
pub struct RawExpr {
    sql: String,
    args: Vec<Arg>,
}

impl RawExpr {
    pub fn new(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Prepend a keyword, e.g. `LEFT JOIN`.
    pub(crate) fn prefixed(self, keyword: &str) -> Self {
        Self {
            sql: format!("{keyword} {}", self.sql),
            args: self.args,
        }
    }

    pub(crate) fn build(&self, params: &mut ParamList) -> SqlResult<String> {
        let expected = count_markers(&self.sql);
        if expected != self.args.len() {
            return Err(SqlError::ArgCount {
                expected,
                actual: self.args.len(),
            });
        }

        let mut out = String::with_capacity(self.sql.len());
        let mut args = self.args.iter();
        for piece in pieces(&self.sql) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Escaped => out.push_str("??"),
                Piece::Marker => {
                    let arg = args.next().ok_or(SqlError::ArgCount {
                        expected,
                        actual: self.args.len(),
                    })?;
                    write_arg(&mut out, arg, params)?;
                }
            }
        }
        Ok(out)
    }
}

impl From<&str> for RawExpr {
    fn from(sql: &str) -> Self {
        Self::new(sql, Vec::new())
    }
}

impl From<String> for RawExpr {
    fn from(sql: String) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Create a raw SQL template with `?` markers.
pub fn raw(sql: impl Into<String>, args: Vec<Arg>) -> RawExpr {
    RawExpr::new(sql, args)
}
