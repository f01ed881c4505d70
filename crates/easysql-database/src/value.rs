//! Values and argument shapes accepted by the [`StatementBuilder`](crate::builder::StatementBuilder).

use core::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{Error, ErrorCode};

/// A single bound parameter or result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(int) => Some(*int),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Integer(int) => serializer.serialize_i64(*int),
            Self::Real(real) => serializer.serialize_f64(*real),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Blob(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(int) => write!(f, "{int}"),
            Self::Real(real) => write!(f, "{real}"),
            Self::Text(text) => f.write_str(text),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered `column -> value` pairs with unique keys.
///
/// Setting a key that is already present replaces its value but keeps its original position.
macro_rules! field_map {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            fields: Vec<(String, Value)>,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Set `column` to `value`.
            pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
                let column = column.into();
                let value = value.into();
                match self.fields.iter_mut().find(|(name, _)| *name == column) {
                    Some((_, existing)) => *existing = value,
                    None => self.fields.push((column, value)),
                }
                self
            }

            /// Chaining variant of [`Self::set`].
            #[must_use]
            pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
                self.set(column, value);
                self
            }

            #[must_use]
            pub fn get(&self, column: &str) -> Option<&Value> {
                self.fields
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| value)
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.fields.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.fields.is_empty()
            }

            pub fn columns(&self) -> impl Iterator<Item = &str> {
                self.fields.iter().map(|(name, _)| name.as_str())
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
                self.fields.iter().map(|(name, value)| (name.as_str(), value))
            }
        }

        impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::new();
                for (column, value) in iter {
                    map.set(column, value);
                }
                map
            }
        }

        impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for $name {
            fn from(pairs: [(K, V); N]) -> Self {
                pairs.into_iter().collect()
            }
        }
    };
}

field_map!(
    /// Column payload for INSERT and UPDATE.
    ColumnMap
);

field_map!(
    /// Equality conditions joined with AND.
    PredicateMap
);

/// A result row: driver column order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Hand-written SQL that is appended to a statement without any escaping.
///
/// The caller is responsible for making sure the text is not attacker-controlled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment(String);

impl RawFragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RawFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The column list of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`
    All,
    /// Identifiers, each validated and quoted.
    Columns(Vec<String>),
    /// An expression list such as `COUNT(*)`, emitted verbatim.
    Raw(RawFragment),
}

impl Projection {
    pub fn columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self::Columns(columns.iter().map(|c| c.as_ref().to_string()).collect())
    }

    /// Choose a projection from a plain list of strings.
    ///
    /// `["*"]` selects everything. When the first entry contains a parenthesis the whole
    /// list is taken as a raw expression list (aggregates like `COUNT(*)`), otherwise
    /// every entry is an identifier.
    pub fn infer<S: AsRef<str>>(columns: &[S]) -> Self {
        match columns.first().map(AsRef::as_ref) {
            Some("*") if columns.len() == 1 => Self::All,
            Some(first) if first.contains('(') => Self::Raw(RawFragment::new(
                columns
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(", "),
            )),
            _ => Self::columns(columns),
        }
    }
}

/// Sort direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(Error::validation(
                ErrorCode::InvalidArgument,
                format!("Unknown sort direction '{token}', expected ASC or DESC"),
            )),
        }
    }
}

/// ORDER BY entries, rendered in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    entries: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Order by a single column.
    pub fn by(column: impl Into<String>, direction: Direction) -> Self {
        Self::default().then(column, direction)
    }

    /// Add a further sort key.
    #[must_use]
    pub fn then(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.entries.push((column.into(), direction));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.entries.iter().map(|(column, dir)| (column.as_str(), *dir))
    }
}
