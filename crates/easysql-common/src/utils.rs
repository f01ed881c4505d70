use std::{env, path::PathBuf};

/// Fetch the home directory on unix systems via the $HOME env variable.
///
/// Falls back to the current directory when `$HOME` is not set, so that
/// sandboxed or service environments can still resolve a data directory.
#[must_use]
pub fn get_home_dir() -> PathBuf {
    env::var("HOME").map_or_else(
        |_| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        PathBuf::from,
    )
}

/// Fetch the data directory for easysql to store data.
///
/// Defaults to `$XDG_DATA_HOME` or `$HOME/.local/share/easysql` if `$XDG_DATA_HOME` cannot be found.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    let data_dir = env::var("XDG_DATA_HOME").map_or_else(
        |_| get_home_dir().join(".local").join("share"),
        PathBuf::from,
    );
    data_dir.join("easysql")
}

/// Fetch the config directory for locating any user set easysql configuration.
///
/// Defaults to `$XDG_CONFIG_HOME` or `$HOME/.config/easysql` if `$XDG_CONFIG_HOME` cannot be found.
#[must_use]
pub fn get_config_dir() -> PathBuf {
    let config_dir = env::var("XDG_CONFIG_HOME")
        .map_or_else(|_| get_home_dir().join(".config"), PathBuf::from);
    config_dir.join("easysql")
}
