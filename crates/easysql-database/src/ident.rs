//! Identifier validation, quoting and placeholder naming.
//!
//! Identifiers are whitelisted rather than escaped: `[A-Za-z_][A-Za-z0-9_]*`.
//! Anything else, including the dialect's quote character, is rejected before
//! it can be concatenated into SQL text.

use std::collections::HashSet;

use easysql_common::config::SqlDialect;

use crate::error::{Error, ErrorCode, Result};

/// Identifier quoting convention of the target database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// `"name"`, as SQLite and PostgreSQL expect.
    #[default]
    Ansi,
    /// `` `name` `` for MySQL and MariaDB.
    MySql,
}

impl Dialect {
    #[must_use]
    pub const fn quote_char(self) -> char {
        match self {
            Self::Ansi => '"',
            Self::MySql => '`',
        }
    }

    /// Wrap an already validated identifier in quotes.
    #[must_use]
    pub fn quote(self, ident: &str) -> String {
        let q = self.quote_char();
        format!("{q}{ident}{q}")
    }
}

impl From<SqlDialect> for Dialect {
    fn from(dialect: SqlDialect) -> Self {
        match dialect {
            SqlDialect::Ansi => Self::Ansi,
            SqlDialect::Mysql => Self::MySql,
        }
    }
}

/// Check that `ident` is a plain identifier.
///
/// # Errors
/// `ES711` if empty, `ES716` if it contains anything outside the whitelist.
pub fn validate_identifier(ident: &str, what: &str) -> Result<()> {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return Err(Error::validation(
            ErrorCode::MissingArgument,
            format!("Missing {what} name"),
        ));
    };

    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(Error::validation(
            ErrorCode::InvalidIdentifier,
            format!("Invalid {what} name '{ident}'"),
        ));
    }
    Ok(())
}

/// Check a column type used in ALTER, e.g. `VARCHAR(255) NOT NULL` or `DECIMAL(10, 2)`.
///
/// Commas are only allowed inside parentheses, so one type can never add another ALTER action.
///
/// # Errors
/// `ES711` if blank, `ES716` for characters other than ASCII alphanumerics, `_`, space,
/// balanced parentheses and commas between them.
pub fn validate_column_type(column_type: &str) -> Result<()> {
    if column_type.trim().is_empty() {
        return Err(Error::validation(
            ErrorCode::MissingArgument,
            "Missing column type",
        ));
    }

    let mut depth = 0_usize;
    let well_formed = column_type.chars().all(|c| match c {
        '(' => {
            depth += 1;
            true
        }
        ')' => match depth.checked_sub(1) {
            Some(outer) => {
                depth = outer;
                true
            }
            None => false,
        },
        ',' => depth > 0,
        c => c.is_ascii_alphanumeric() || matches!(c, '_' | ' '),
    });

    if !well_formed || depth != 0 {
        return Err(Error::validation(
            ErrorCode::InvalidIdentifier,
            format!("Invalid column type '{column_type}'"),
        ));
    }
    Ok(())
}

/// The named placeholder for `column`, e.g. `placeholder("update_", "status")` is `:update_status`.
#[must_use]
pub fn placeholder(prefix: &str, column: &str) -> String {
    format!(":{prefix}{column}")
}

/// Validate every column of one clause and make sure no two of them map to the same placeholder.
///
/// # Errors
/// Any identifier error, or `ES717` when two columns collide (compared case-insensitively).
pub fn validate_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        validate_identifier(column, "column")?;
        if !seen.insert(column.to_ascii_lowercase()) {
            return Err(Error::validation(
                ErrorCode::DuplicateColumn,
                format!("Column '{column}' appears more than once"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for ident in ["id", "_private", "user_name", "Table2"] {
            assert!(validate_identifier(ident, "column").is_ok(), "{ident}");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for ident in ["2fast", "a b", "na\"me", "na`me", "x;DROP", "schema.table", "é"] {
            let err = validate_identifier(ident, "table").unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidIdentifier, "{ident}");
        }
        assert_eq!(
            validate_identifier("", "table").unwrap_err().code(),
            ErrorCode::MissingArgument
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(Dialect::Ansi.quote("users"), "\"users\"");
        assert_eq!(Dialect::MySql.quote("users"), "`users`");
    }

    #[test]
    fn test_column_type() {
        assert!(validate_column_type("DECIMAL(10, 2) NOT NULL").is_ok());
        assert!(validate_column_type("TEXT; DROP TABLE x").is_err());
        assert!(validate_column_type("INT -- comment").is_err());
        assert!(validate_column_type("  ").is_err());
    }

    #[test]
    fn test_column_type_cannot_chain_actions() {
        for column_type in ["TEXT, DROP password", "INT), DROP (x", "VARCHAR(3", "INT)", "(,"] {
            assert_eq!(
                validate_column_type(column_type).unwrap_err().code(),
                ErrorCode::InvalidIdentifier,
                "{column_type}"
            );
        }
        assert!(validate_column_type("NUMERIC(10, 2) NOT NULL").is_ok());
        assert!(validate_column_type("ENUM(a, b)").is_ok());
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder("", "user_name"), ":user_name");
        assert_eq!(placeholder("update_", "status"), ":update_status");
    }

    #[test]
    fn test_validate_columns_collision() {
        assert!(validate_columns(["id", "name"]).is_ok());
        assert_eq!(
            validate_columns(["name", "Name"]).unwrap_err().code(),
            ErrorCode::DuplicateColumn
        );
    }
}
