use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::utils::{get_config_dir, get_data_dir};
use log::debug;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "easysql.db";

/// Represents the main application configuration structure.
///
/// Holds settings related to different parts of the application.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub builder: BuilderConfig,
}

/// Configuration settings specific to the database.
///
/// Allows specifying the directory path and filename for the database, whether a missing
/// database file may be created, and which identifier quoting the statements should use.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub database_path: Option<PathBuf>,
    pub database_file: Option<String>,
    pub create_if_missing: bool,
    pub dialect: SqlDialect,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            database_file: None,
            create_if_missing: true,
            dialect: SqlDialect::default(),
        }
    }
}

impl DatabaseConfig {
    /// Full path of the database file: `database_path` (or the data dir) joined with
    /// `database_file` (or `easysql.db`).
    #[must_use]
    pub fn path(&self) -> PathBuf {
        let dir = self.database_path.clone().unwrap_or_else(get_data_dir);
        dir.join(self.database_file.as_deref().unwrap_or(DATABASE_FILE))
    }
}

/// Identifier quoting family named in the configuration file.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Double-quoted identifiers (SQLite, PostgreSQL).
    #[default]
    Ansi,
    /// Backtick-quoted identifiers.
    Mysql,
}

/// Configuration settings for the statement builder.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Reject multi-entry orderings and multi-column ALTER definitions.
    pub strict: bool,
}

/// Raw key/value view over a parsed configuration file.
///
/// Keys are dotted paths into the TOML document, e.g. `database.database_file`.
#[derive(Debug, Default, Clone)]
pub struct ConfigStore {
    table: toml::Table,
}

impl ConfigStore {
    /// Parse a TOML document into a store.
    ///
    /// # Errors
    /// Returns `Err` if `contents` is not valid TOML.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            table: contents.parse::<toml::Table>()?,
        })
    }

    /// Get the configuration value stored at `key`, or `default` if the key is missing or
    /// cannot be read as a `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.lookup(key)
            .and_then(|value| value.clone().try_into().ok())
            .unwrap_or(default)
    }

    /// Deserialize the whole store into the typed [`Config`].
    ///
    /// # Errors
    /// Returns `Err` if a known section holds a value of the wrong type.
    pub fn config(&self) -> Result<Config, toml::de::Error> {
        toml::Value::Table(self.table.clone()).try_into()
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        let mut parts = key.split('.');
        let mut value = self.table.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }
}

/// Loads the raw [`ConfigStore`] from `config.toml` in the platform-specific configuration
/// directory retrieved via `get_config_dir()`.
///
/// If the configuration file is not found at the expected path, an empty store is returned,
/// which deserializes to the default `Config`.
///
/// # Errors
/// - `Err(Box<dyn std::error::Error>)`: An error occurred during file reading or TOML parsing.
pub fn load_store() -> Result<ConfigStore, Box<dyn std::error::Error>> {
    load_store_from(&get_config_dir().join(CONFIG_FILE))
}

/// Loads the raw [`ConfigStore`] from the TOML file at `config_path`.
///
/// A missing file yields an empty store.
///
/// # Errors
/// - `Err(Box<dyn std::error::Error>)`: An error occurred during file reading or TOML parsing.
pub fn load_store_from(config_path: &Path) -> Result<ConfigStore, Box<dyn std::error::Error>> {
    if !config_path.exists() {
        debug!("Could not find config at supported paths, using default config.");
        return Ok(ConfigStore::default());
    }

    debug!("loading config from {}", config_path.display());
    let config_str = std::fs::read_to_string(config_path)?;
    Ok(ConfigStore::from_toml(&config_str)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
        [database]
        database_path = "/srv/app"
        database_file = "app.db"
        dialect = "mysql"

        [builder]
        strict = true
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = ConfigStore::from_toml(SAMPLE).unwrap().config().unwrap();

        assert_eq!(config.database.path(), PathBuf::from("/srv/app/app.db"));
        assert_eq!(config.database.dialect, SqlDialect::Mysql);
        assert!(config.database.create_if_missing);
        assert!(config.builder.strict);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = ConfigStore::from_toml("[database]\ndatabase_file = \"x.db\"\n")
            .unwrap()
            .config()
            .unwrap();

        assert_eq!(config.database.database_file.as_deref(), Some("x.db"));
        assert_eq!(config.database.dialect, SqlDialect::Ansi);
        assert_eq!(config.builder, BuilderConfig::default());
    }

    #[test]
    fn test_store_get_with_default() {
        let store = ConfigStore::from_toml(SAMPLE).unwrap();

        assert_eq!(
            store.get("database.database_file", String::new()),
            String::from("app.db")
        );
        assert!(store.get("builder.strict", false));
        assert_eq!(store.get("database.port", 3306_i64), 3306);
        // Present but of the wrong type falls back to the default.
        assert_eq!(store.get("database.dialect", 0_i64), 0);
        assert_eq!(store.get("database.database_file.nested", 1_i64), 1);
    }

    #[test]
    fn test_invalid_dialect_is_rejected() {
        let store = ConfigStore::from_toml("[database]\ndialect = \"oracle\"\n").unwrap();
        assert!(store.config().is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_store_from(&dir.path().join(CONFIG_FILE))
            .unwrap()
            .config()
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = load_store_from(&path).unwrap();
        assert_eq!(store.get("database.dialect", String::new()), "mysql");
        let config = store.config().unwrap();
        assert_eq!(config.database.database_file.as_deref(), Some("app.db"));
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[database\n").unwrap();

        assert!(load_store_from(&path).is_err());
    }
}
