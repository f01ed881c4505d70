use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use command::EasySqlCmd;
use easysql_common::config::{ConfigStore, load_store, load_store_from};
use easysql_common::utils::get_data_dir;
use easysql_database::{Context, Envelope, Error, ErrorCode, Result};
use env_logger::{Builder, Env, Target};
use log::debug;
mod command;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE: &str = "easysql.log";

static HELP_TEMPLATE: &str = "\
    {before-help} {name} {version}
    {author}
    {about}

    {usage-heading}
      {usage}


    {all-args}
    {after-help}";

#[derive(Parser)]
#[command(
    author,
    about,
    version = VERSION,
    help_template(HELP_TEMPLATE),
)]
struct EasySql {
    /// Database file to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Configuration file to read instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the statement and its parameters instead of running it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    easysql: EasySqlCmd,
}

impl EasySql {
    fn run(self, store: Result<ConfigStore>) -> Envelope {
        let context = match store.and_then(|store| self.context(&store)) {
            Ok(context) => context,
            Err(err) => return Envelope::failure(&err),
        };
        debug!("context: {:?}", context.config);
        self.easysql.run(&context, self.dry_run)
    }

    /// The raw configuration named by `--config`, or the default configuration file.
    fn store(&self) -> Result<ConfigStore> {
        match &self.config {
            Some(path) => load_store_from(path),
            None => load_store(),
        }
        .map_err(|err| Error::new(ErrorCode::Config, err.to_string()))
    }

    fn context(&self, store: &ConfigStore) -> Result<Context> {
        let mut config = store
            .config()
            .map_err(|err| Error::new(ErrorCode::Config, err.to_string()))?;

        if let Some(db) = &self.db {
            config.database.database_path = db.parent().map(Path::to_path_buf);
            config.database.database_file = db
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }
        Context::open(config)
    }
}

/// The log filter from `[log] filter`, falling back to a build-dependent default.
/// `EASYSQL_LOG` still overrides either.
fn log_filter(store: Option<&ConfigStore>) -> String {
    #[cfg(debug_assertions)]
    let default_filter = "debug";
    #[cfg(not(debug_assertions))]
    let default_filter = "error";

    match store {
        Some(store) => store.get("log.filter", String::from(default_filter)),
        None => String::from(default_filter),
    }
}

fn init_logging(filter: &str) {
    let env = Env::new().filter_or("EASYSQL_LOG", filter);
    let mut builder = Builder::from_env(env);

    // stdout carries the envelope only, so logs go to easysql.log in the data dir.
    let _ = fs::create_dir_all(get_data_dir());
    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_data_dir().join(LOG_FILE))
    {
        Ok(log_file) => builder.target(Target::Pipe(Box::new(log_file))),
        Err(_) => builder.target(Target::Stderr),
    };
    builder.init();
}

fn main() -> ExitCode {
    let easysql = EasySql::parse();
    let store = easysql.store();
    init_logging(&log_filter(store.as_ref().ok()));

    let envelope = easysql.run(store);
    match envelope.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
