use clap::Subcommand;
use easysql_database::{Context, Envelope};
mod alter;
mod delete;
mod insert;
mod pairs;
mod select;
mod update;

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Select rows matching equality conditions.
    Select(select::Cmd),

    /// Select rows with a hand-written clause after FROM.
    SelectRaw(select::RawCmd),

    /// Insert one row and print its id.
    Insert(insert::Cmd),

    /// Update matching rows and print how many changed.
    Update(update::Cmd),

    /// Delete matching rows and print how many were removed.
    Delete(delete::Cmd),

    /// Add, drop or modify table columns.
    Alter(alter::Cmd),
}

impl Cmd {
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        // CLI commands block the current thread until they resolve.
        match self {
            Self::Select(select) => select.run(context, dry_run),
            Self::SelectRaw(select) => select.run(context, dry_run),
            Self::Insert(insert) => insert.run(context, dry_run),
            Self::Update(update) => update.run(context, dry_run),
            Self::Delete(delete) => delete.run(context, dry_run),
            Self::Alter(alter) => alter.run(context, dry_run),
        }
    }
}
