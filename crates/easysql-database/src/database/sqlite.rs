use std::fs;
use std::path::Path;

use easysql_common::config::DatabaseConfig;
use log::{debug, error};
use rusqlite::config::DbConfig;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, OpenFlags, ToSql};

use super::{Database, DatabaseError};
use crate::error::{Error, ErrorCode};
use crate::ident::Dialect;
use crate::query::BoundStatement;
use crate::value::{Row, Value};

/// Sqlite database wrapper using rusqlite
pub struct Sqlite {
    pub conn: Connection,
    dialect: Dialect,
}

impl Sqlite {
    /// Open the database file described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (`ES601`) if the file cannot be opened, or does not exist
    /// and `create_if_missing` is off.
    pub fn open(config: &DatabaseConfig) -> Result<Self, Error> {
        let path = config.path();
        let conn = get_connection(&path, config.create_if_missing)?;
        Ok(Self {
            conn,
            dialect: config.dialect.into(),
        })
    }

    /// A private, empty in-memory database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (`ES601`) if SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .and_then(strict_identifiers)
            .map_err(|err| Error::new(ErrorCode::Connection, err.to_string()))?;
        Ok(Self {
            conn,
            dialect: Dialect::Ansi,
        })
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError {
            msg: format!("{err}"),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(int) => ToSqlOutput::from(*int),
            Value::Real(real) => ToSqlOutput::from(*real),
            Value::Text(text) => ToSqlOutput::from(text.as_str()),
            Value::Bool(b) => ToSqlOutput::from(*b),
            Value::Blob(bytes) => ToSqlOutput::from(bytes.as_slice()),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(int) => Value::Integer(int),
            ValueRef::Real(real) => Value::Real(real),
            ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

/// Pair every placeholder with its value in the shape rusqlite binds by name.
fn named_params(statement: &BoundStatement) -> Vec<(&str, &dyn ToSql)> {
    statement
        .params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

impl Database for Sqlite {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn query(&self, statement: &BoundStatement) -> Result<Vec<Row>, DatabaseError> {
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let params = named_params(statement);
        let mut rows = stmt.query(params.as_slice())?;

        let mut results: Vec<Row> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for (idx, column) in columns.iter().enumerate() {
                cells.push((column.clone(), Value::from(row.get_ref(idx)?)));
            }
            results.push(Row::new(cells));
        }
        Ok(results)
    }

    fn execute(&self, statement: &BoundStatement) -> Result<usize, DatabaseError> {
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let params = named_params(statement);
        Ok(stmt.execute(params.as_slice())?)
    }

    fn insert(&self, statement: &BoundStatement) -> Result<i64, DatabaseError> {
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let params = named_params(statement);
        Ok(stmt.insert(params.as_slice())?)
    }
}

/// Disable SQLite's double-quoted string literals: an unknown `"column"` is an error, never text.
fn strict_identifiers(conn: Connection) -> rusqlite::Result<Connection> {
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
    Ok(conn)
}

/// Attempt to open a connection to `path`.
///
/// Will initially try to open as RW, but if the file does not exist and `create` is set, this
/// method will also take care of creating the new database file (and its directory).
///
/// * `path`: Full path to the sqlite database file.
/// * `create`: Whether a missing database file may be created.
fn get_connection(path: &Path, create: bool) -> Result<Connection, Error> {
    match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .and_then(strict_identifiers)
    {
        Ok(connection) => {
            debug!("Opened {}", path.display());
            Ok(connection)
        }
        Err(err) if !create => {
            error!("Could not open {}: {err}", path.display());
            Err(Error::new(ErrorCode::Connection, format!("{err}")))
        }
        Err(err) => {
            debug!("Could not open {}: {err}, creating it", path.display());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| Error::new(ErrorCode::Connection, format!("{err}")))?;
            }
            match Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            )
            .and_then(strict_identifiers)
            {
                Ok(connection) => {
                    debug!("Created {}", path.display());
                    Ok(connection)
                }
                Err(err) => {
                    error!("Error opening database: {err}");
                    Err(Error::new(ErrorCode::Connection, format!("{err}")))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config_in(dir: &Path, create_if_missing: bool) -> DatabaseConfig {
        DatabaseConfig {
            database_path: Some(dir.join("nested")),
            database_file: Some(String::from("test.db")),
            create_if_missing,
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), true);

        let db = Sqlite::open(&config).unwrap();
        assert_eq!(db.dialect(), Dialect::Ansi);
        assert!(config.path().exists());
    }

    #[test]
    fn test_open_missing_without_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), false);

        let Err(err) = Sqlite::open(&config) else {
            panic!("expected open to fail");
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.code(), ErrorCode::Connection);
    }

    #[test]
    fn test_query_round_trips_types() {
        let db = Sqlite::in_memory().unwrap();
        db.conn
            .execute_batch("CREATE TABLE t (i INTEGER, r REAL, s TEXT, b BLOB, n TEXT)")
            .unwrap();

        let mut insert =
            BoundStatement::new("INSERT INTO t (i, r, s, b, n) VALUES (:i, :r, :s, :b, :n)");
        insert
            .bind(":i", Value::from(true))
            .bind(":r", Value::from(1.5))
            .bind(":s", Value::from("text"))
            .bind(":b", Value::from(vec![1_u8, 2]))
            .bind(":n", Value::Null);
        assert_eq!(db.insert(&insert).unwrap(), 1);

        let rows = db.query(&BoundStatement::new("SELECT * FROM t")).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("i"), Some(&Value::Integer(1)));
        assert_eq!(row.get("r"), Some(&Value::Real(1.5)));
        assert_eq!(row.get("s"), Some(&Value::from("text")));
        assert_eq!(row.get("b"), Some(&Value::Blob(vec![1, 2])));
        assert_eq!(row.get("n"), Some(&Value::Null));
    }

    #[test]
    fn test_quoted_unknown_column_is_an_error() {
        let db = Sqlite::in_memory().unwrap();
        db.conn
            .execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1), (2);")
            .unwrap();

        let mut delete = BoundStatement::new(r#"DELETE FROM "t" WHERE "nmae" = :nmae"#);
        delete.bind(":nmae", Value::from("nmae"));
        let err = db.execute(&delete).unwrap_err();
        assert!(err.msg.contains("no such column: nmae"), "{}", err.msg);

        let rows = db.query(&BoundStatement::new(r#"SELECT "id" FROM "t""#)).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_file_connection_rejects_quoted_unknown_column() {
        let dir = tempfile::tempdir().unwrap();
        let db = Sqlite::open(&config_in(dir.path(), true)).unwrap();
        db.conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

        let err = db
            .query(&BoundStatement::new(r#"SELECT "missing" FROM "t""#))
            .unwrap_err();
        assert!(err.msg.contains("no such column: missing"), "{}", err.msg);
    }

    #[test]
    fn test_driver_message_is_passed_through() {
        let db = Sqlite::in_memory().unwrap();
        let err = db
            .execute(&BoundStatement::new("DELETE FROM missing"))
            .unwrap_err();
        assert!(err.msg.contains("no such table: missing"), "{}", err.msg);
    }
}
