use core::fmt;

use crate::ident::Dialect;
use crate::query::BoundStatement;
use crate::value::Row;

pub mod sqlite;

/// A failure reported by the driver, message passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    pub msg: String,
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Encountered a database error: {}", self.msg)
    }
}

impl std::error::Error for DatabaseError {}

/// The narrow handle the statement builder runs its statements through.
///
/// Implementations prepare `statement.sql`, bind every `statement.params` entry by
/// placeholder name and execute it. Opening and closing the underlying connection is
/// the implementation's concern, never the builder's.
pub trait Database {
    /// Identifier quoting this database expects.
    fn dialect(&self) -> Dialect;

    /// Run a statement that returns rows.
    ///
    /// # Errors
    /// Will return `Err` if the database encountered an issue.
    fn query(&self, statement: &BoundStatement) -> Result<Vec<Row>, DatabaseError>;

    /// Run a statement and return the number of rows it changed.
    ///
    /// # Errors
    /// Will return `Err` if the database encountered an issue.
    fn execute(&self, statement: &BoundStatement) -> Result<usize, DatabaseError>;

    /// Run an INSERT and return the identifier of the new row.
    ///
    /// # Errors
    /// Will return `Err` if the database encountered an issue.
    fn insert(&self, statement: &BoundStatement) -> Result<i64, DatabaseError>;
}

impl<D: Database + ?Sized> Database for &D {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn query(&self, statement: &BoundStatement) -> Result<Vec<Row>, DatabaseError> {
        (**self).query(statement)
    }

    fn execute(&self, statement: &BoundStatement) -> Result<usize, DatabaseError> {
        (**self).execute(statement)
    }

    fn insert(&self, statement: &BoundStatement) -> Result<i64, DatabaseError> {
        (**self).insert(statement)
    }
}

impl<D: Database + ?Sized> Database for Box<D> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn query(&self, statement: &BoundStatement) -> Result<Vec<Row>, DatabaseError> {
        (**self).query(statement)
    }

    fn execute(&self, statement: &BoundStatement) -> Result<usize, DatabaseError> {
        (**self).execute(statement)
    }

    fn insert(&self, statement: &BoundStatement) -> Result<i64, DatabaseError> {
        (**self).insert(statement)
    }
}
