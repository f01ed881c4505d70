use database::sqlite::Sqlite;
use easysql_common::config::Config;

pub mod builder;
pub mod database;
pub mod envelope;
pub mod error;
pub mod ident;
pub mod query;
pub mod value;

pub use builder::{BuilderOptions, StatementBuilder};
pub use envelope::Envelope;
pub use error::{Error, ErrorCode, ErrorKind, Result};
pub use query::alter::{AlterOperand, ColumnSpec};
pub use value::{ColumnMap, Direction, OrderBy, PredicateMap, Projection, RawFragment, Row, Value};

/// Context object
///
/// * `config`: The configuration the context was opened with.
/// * `builder`: A statement builder over the configured SQLite database.
pub struct Context {
    pub config: Config,
    pub builder: StatementBuilder<Sqlite>,
}

impl Context {
    /// Open the database described by `config` and wrap it in a builder.
    ///
    /// # Errors
    /// `ES601` if the database cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let db = Sqlite::open(&config.database)?;
        let builder = StatementBuilder::with_options(db, BuilderOptions::from(&config.builder));
        Ok(Self { config, builder })
    }
}
