//! INSERT / REPLACE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::param::{Arg, ParamList, write_arg};
use crate::placeholder::PlaceholderFormat;
use crate::qb::select::SelectQb;
use crate::qb::traits::{QueryType, SqlQb};
use crate::qb::where_clause::{write_prefix, write_suffix};
use std::collections::HashMap;

/// Rows to insert: literal VALUES or the result of a SELECT.
#[derive(Clone, Debug, PartialEq)]
enum Source {
    Values(Vec<Vec<Arg>>),
    Select(Box<SelectQb>),
}

/// INSERT (or MySQL REPLACE) statement builder.
///
/// Each VALUES cell is an [`Arg`]: scalars become `?`, fragments such as
/// `Expr::raw("? + 1", args![4])` or `Expr::literal("NOW()")` are written in
/// place.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertQb {
    verb: &'static str,
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    options: Vec<String>,
    table: String,
    columns: Vec<String>,
    source: Source,
    on_duplicate: Vec<(String, Arg)>,
    suffixes: Vec<Expr>,
}

impl InsertQb {
    /// Create an INSERT builder for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            verb: "INSERT",
            format: PlaceholderFormat::default(),
            prefixes: Vec::new(),
            options: Vec::new(),
            table: table.into(),
            columns: Vec::new(),
            source: Source::Values(Vec::new()),
            on_duplicate: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    /// Create a REPLACE builder for `table`.
    pub fn replace(table: impl Into<String>) -> Self {
        Self {
            verb: "REPLACE",
            ..Self::new(table)
        }
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the placeholder syntax of the final statement.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a raw fragment before the statement.
    pub fn prefix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.prefixes.push(Expr::raw(sql, args));
        self
    }

    /// Add a raw fragment at the end of the statement.
    pub fn suffix(mut self, sql: impl Into<String>, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::raw(sql, args));
        self
    }

    /// Add `RETURNING <columns>`.
    pub fn returning(self, columns: &[&str]) -> Self {
        self.suffix(format!("RETURNING {}", columns.join(", ")), Vec::new())
    }

    /// Add keywords after the verb, e.g. `IGNORE`.
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options.extend(options.iter().map(|o| o.to_string()));
        self
    }

    /// Append target columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Append one VALUES row.
    ///
    /// Replaces a source set with [`InsertQb::select`].
    pub fn values(mut self, row: Vec<Arg>) -> Self {
        match &mut self.source {
            Source::Values(rows) => rows.push(row),
            Source::Select(_) => self.source = Source::Values(vec![row]),
        }
        self
    }

    /// Set columns and a single row from a map; columns are sorted by name.
    pub fn set_map<K, V>(mut self, map: HashMap<K, V>) -> Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let mut pairs: Vec<(String, Arg)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let (columns, row): (Vec<String>, Vec<Arg>) = pairs.into_iter().unzip();
        self.columns = columns;
        self.source = Source::Values(vec![row]);
        self
    }

    /// Insert the rows returned by `query` instead of VALUES.
    pub fn select(mut self, query: SelectQb) -> Self {
        self.source = Source::Select(Box::new(query));
        self
    }

    /// Add a MySQL `ON DUPLICATE KEY UPDATE column = value` assignment.
    ///
    /// Assignments render in the order they were added.
    pub fn on_duplicate_key_update(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.on_duplicate.push((column.into(), value.into()));
        self
    }

    fn validate(&self) -> SqlResult<()> {
        if self.table.is_empty() {
            return Err(SqlError::validation("insert statements must specify a table"));
        }
        if let Source::Values(rows) = &self.source {
            if rows.is_empty() {
                return Err(SqlError::validation(
                    "insert statements must have at least one set of values or select clause",
                ));
            }
            if !self.columns.is_empty() {
                for (i, row) in rows.iter().enumerate() {
                    if row.len() != self.columns.len() {
                        return Err(SqlError::validation(format!(
                            "row {} has {} values but {} columns were given",
                            i + 1,
                            row.len(),
                            self.columns.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl SqlQb for InsertQb {
    fn query_type(&self) -> QueryType {
        if self.verb == "REPLACE" {
            QueryType::Replace
        } else {
            QueryType::Insert
        }
    }

    fn placeholder(&self) -> PlaceholderFormat {
        self.format
    }

    fn build_raw(&self, params: &mut ParamList) -> SqlResult<String> {
        self.validate()?;

        let mut sql = String::new();
        write_prefix(&self.prefixes, &mut sql, params)?;

        sql.push_str(self.verb);
        sql.push(' ');
        if !self.options.is_empty() {
            sql.push_str(&self.options.join(" "));
            sql.push(' ');
        }
        sql.push_str("INTO ");
        sql.push_str(&self.table);
        sql.push(' ');

        if !self.columns.is_empty() {
            sql.push('(');
            sql.push_str(&self.columns.join(","));
            sql.push_str(") ");
        }

        match &self.source {
            Source::Select(query) => sql.push_str(&query.build_raw(params)?),
            Source::Values(rows) => {
                sql.push_str("VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push('(');
                    for (j, cell) in row.iter().enumerate() {
                        if j > 0 {
                            sql.push(',');
                        }
                        write_arg(&mut sql, cell, params)?;
                    }
                    sql.push(')');
                }
            }
        }

        if !self.on_duplicate.is_empty() {
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            for (i, (column, value)) in self.on_duplicate.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(column);
                sql.push_str(" = ");
                write_arg(&mut sql, value, params)?;
            }
        }

        write_suffix(&self.suffixes, &mut sql, params)?;
        Ok(sql)
    }
}
