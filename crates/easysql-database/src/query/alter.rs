use std::str::FromStr;

use super::SqlString;
use crate::error::{Error, ErrorCode};
use crate::ident::Dialect;
use crate::value::RawFragment;

/// The column operation of an ALTER TABLE.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterOperand {
    #[default]
    Add,
    Drop,
    Modify,
}

impl AlterOperand {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Drop => "DROP",
            Self::Modify => "MODIFY",
        }
    }
}

impl FromStr for AlterOperand {
    type Err = Error;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "ADD" => Ok(Self::Add),
            "DROP" => Ok(Self::Drop),
            "MODIFY" => Ok(Self::Modify),
            "" => Err(Error::missing_argument(2, "alter()")),
            _ => Err(Error::validation(
                ErrorCode::InvalidIdentifier,
                format!("Unknown alter operand '{keyword}', expected ADD, DROP or MODIFY"),
            )),
        }
    }
}

/// The column part of an ALTER TABLE call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// A single bare column name, as DROP takes.
    Column(String),
    /// `(name, type)` pairs, each rendered as `{OP} "name" type`.
    Definitions(Vec<(String, String)>),
    /// Hand-written SQL placed after the operand without escaping.
    Raw(RawFragment),
}

/// Alter the columns of an existing table
#[derive(Default, Debug, Clone)]
pub struct AlterStatement<'a> {
    pub dialect: Dialect,
    pub table: &'a str,
    pub operand: AlterOperand,
    pub columns: Vec<(&'a str, Option<&'a str>)>,
    pub raw: Option<&'a str>,
}

impl SqlString for AlterStatement<'_> {
    /// Convert the [`AlterStatement`] into a runnable SQL string.
    fn to_sql(&self) -> String {
        let mut sql = format!("ALTER TABLE {}", self.dialect.quote(self.table));
        let operand = self.operand.as_sql();

        if let Some(raw) = self.raw {
            sql.push_str(&format!(" {operand} {raw}"));
            return sql;
        }

        sql.push(' ');
        sql.push_str(
            &self
                .columns
                .iter()
                .map(|(column, column_type)| match column_type {
                    Some(column_type) => {
                        format!("{operand} {} {column_type}", self.dialect.quote(column))
                    }
                    None => format!("{operand} {}", self.dialect.quote(column)),
                })
                .collect::<Vec<String>>()
                .join(", "),
        );
        sql
    }
}

impl<'a> AlterStatement<'a> {
    /// Construct a new [`AlterStatement`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the identifier quoting to render with.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// Specify the table to alter.
    pub fn table(&mut self, table_name: &'a str) -> &mut Self {
        self.table = table_name;
        self
    }

    /// Specify the operation applied to every column.
    pub fn operand(&mut self, operand: AlterOperand) -> &mut Self {
        self.operand = operand;
        self
    }

    /// Add a column with a type, e.g. for ADD or MODIFY.
    pub fn column(&mut self, column: &'a str, column_type: &'a str) -> &mut Self {
        self.columns.push((column, Some(column_type)));
        self
    }

    /// Add a bare column, e.g. for DROP.
    pub fn name(&mut self, column: &'a str) -> &mut Self {
        self.columns.push((column, None));
        self
    }

    /// Use hand-written SQL after the operand instead of columns.
    pub fn raw(&mut self, raw: &'a str) -> &mut Self {
        self.raw = Some(raw);
        self
    }
}
