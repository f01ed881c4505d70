use clap::Subcommand;
use easysql_database::{Context, Envelope};

mod cli;

#[derive(Subcommand)]
pub enum EasySqlCmd {
    #[command(flatten)]
    Cli(cli::Cmd),
}

impl EasySqlCmd {
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        match self {
            Self::Cli(cli) => cli.run(context, dry_run),
        }
    }
}
