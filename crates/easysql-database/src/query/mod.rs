use alter::AlterStatement;
use delete::DeleteStatement;
use insert::InsertStatement;
use select::SelectStatement;
use update::UpdateStatement;

use serde::Serialize;

use crate::ident::{Dialect, placeholder};
use crate::value::Value;

pub mod alter;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

/// Placeholder prefix of the SET clause of an UPDATE.
pub const UPDATE_SET_PREFIX: &str = "update_";
/// Placeholder prefix of the WHERE clause of an UPDATE.
pub const UPDATE_WHERE_PREFIX: &str = "w_";

#[derive(Debug, Clone)]
/// Shorthand for constructing any table query
pub struct Query;

impl Query {
    /// Construct a table [`SelectStatement`]
    pub fn select<'a>() -> SelectStatement<'a> {
        SelectStatement::new()
    }

    /// Construct a table [`UpdateStatement`]
    pub fn update<'a>() -> UpdateStatement<'a> {
        UpdateStatement::new()
    }

    /// Construct a table [`InsertStatement`]
    pub fn insert<'a>() -> InsertStatement<'a> {
        InsertStatement::new()
    }

    /// Construct a table [`DeleteStatement`]
    pub fn delete<'a>() -> DeleteStatement<'a> {
        DeleteStatement::new()
    }

    /// Construct an [`AlterStatement`]
    pub fn alter<'a>() -> AlterStatement<'a> {
        AlterStatement::new()
    }
}

/// Trait for all queries to implement to translate to a runnable SQL string.
pub trait SqlString {
    fn to_sql(&self) -> String;
}

/// SQL text plus the values for each of its named placeholders, in clause order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl BoundStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind `value` to the placeholder `name` (including its leading `:`).
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.params.push((name.into(), value));
        self
    }

    /// The value bound to placeholder `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

/// Append ` WHERE "a" = :{prefix}a AND "b" = :{prefix}b` for the given columns.
fn push_where(sql: &mut String, dialect: Dialect, clauses: &[&str], prefix: &str) {
    if clauses.is_empty() {
        return;
    }
    sql.push(' ');
    sql.push_str("WHERE");
    sql.push(' ');
    for (idx, clause) in clauses.iter().enumerate() {
        // Separate where clauses with AND if this is not the first
        if idx != 0 {
            sql.push(' ');
            sql.push_str("AND");
            sql.push(' ');
        }
        sql.push_str(&format!(
            "{} = {}",
            dialect.quote(clause),
            placeholder(prefix, clause)
        ));
    }
}
