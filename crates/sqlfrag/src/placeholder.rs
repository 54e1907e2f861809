//! Positional marker scanning and placeholder rewriting.
//!
//! Fragments are always composed with `?` markers. Once a whole statement is
//! composed, [`PlaceholderFormat::replace`] rewrites the markers left to right
//! into the driver's syntax (`$1`, `:1`, `@p1`, or unchanged).
//!
//! `??` is an escaped literal `?`: it is never counted as a marker.
//!
//! The scan does not parse SQL, so a `?` inside a quoted string literal is
//! still treated as a marker. The argument-count check in
//! [`PlaceholderFormat::replace`] reports such a statement instead of
//! numbering it wrongly.

use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One piece of fragment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'a str),
    /// `??`
    Escaped,
    /// `?`
    Marker,
}

/// Split `sql` into text runs, escaped question marks and markers.
pub(crate) fn pieces(sql: &str) -> Pieces<'_> {
    Pieces { rest: sql }
}

pub(crate) struct Pieces<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find('?') {
            Some(0) => {
                if self.rest[1..].starts_with('?') {
                    self.rest = &self.rest[2..];
                    Some(Piece::Escaped)
                } else {
                    self.rest = &self.rest[1..];
                    Some(Piece::Marker)
                }
            }
            Some(i) => {
                let text = &self.rest[..i];
                self.rest = &self.rest[i..];
                Some(Piece::Text(text))
            }
            None => {
                let text = self.rest;
                self.rest = "";
                Some(Piece::Text(text))
            }
        }
    }
}

/// Count the markers in `sql`, ignoring `??`.
pub fn count_markers(sql: &str) -> usize {
    pieces(sql).filter(|p| *p == Piece::Marker).count()
}

/// Target placeholder syntax for a composed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderFormat {
    /// `?` (MySQL, SQLite). Markers are left unchanged.
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL).
    Dollar,
    /// `:1, :2, ...` (Oracle).
    Colon,
    /// `@p1, @p2, ...` (SQL Server).
    AtP,
}

impl PlaceholderFormat {
    fn prefix(self) -> &'static str {
        match self {
            PlaceholderFormat::Question => "?",
            PlaceholderFormat::Dollar => "$",
            PlaceholderFormat::Colon => ":",
            PlaceholderFormat::AtP => "@p",
        }
    }

    /// Rewrite the `?` markers of a fully composed statement.
    ///
    /// Fails when the number of markers differs from `arg_count`.
    pub fn replace(self, sql: &str, arg_count: usize) -> SqlResult<String> {
        let markers = count_markers(sql);
        if markers != arg_count {
            return Err(SqlError::PlaceholderMismatch {
                markers,
                args: arg_count,
            });
        }
        if self == PlaceholderFormat::Question {
            return Ok(sql.to_string());
        }

        let mut out = String::with_capacity(sql.len() + markers * 2);
        let mut idx = 0usize;
        for piece in pieces(sql) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Escaped => out.push('?'),
                Piece::Marker => {
                    idx += 1;
                    out.push_str(self.prefix());
                    out.push_str(&idx.to_string());
                }
            }
        }
        Ok(out)
    }
}

/// Rewrite `sql` into `format`; see [`PlaceholderFormat::replace`].
pub fn rewrite(sql: &str, arg_count: usize, format: PlaceholderFormat) -> SqlResult<String> {
    format.replace(sql, arg_count)
}

impl fmt::Display for PlaceholderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaceholderFormat::Question => "question",
            PlaceholderFormat::Dollar => "dollar",
            PlaceholderFormat::Colon => "colon",
            PlaceholderFormat::AtP => "at_p",
        };
        f.write_str(name)
    }
}

impl FromStr for PlaceholderFormat {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(PlaceholderFormat::Question),
            "dollar" | "$" => Ok(PlaceholderFormat::Dollar),
            "colon" | ":" => Ok(PlaceholderFormat::Colon),
            "at_p" | "atp" | "@p" => Ok(PlaceholderFormat::AtP),
            _ => Err(SqlError::InvalidFormat(s.to_string())),
        }
    }
}
