use clap::Parser;
use easysql_database::{ColumnMap, Context, Envelope, Value};

use super::pairs::parse_pair;

#[derive(Debug, Parser)]
pub struct Cmd {
    /// Table to insert into
    table: String,

    /// Column values as `column=value`
    #[arg(required = true, value_parser = parse_pair)]
    columns: Vec<(String, Value)>,
}

impl Cmd {
    /// Insert one row; the envelope data is the new row id.
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let columns: ColumnMap = self.columns.into_iter().collect();

        if dry_run {
            return Envelope::from_result(context.builder.insert_statement(&self.table, &columns));
        }
        Envelope::from_result(context.builder.insert(&self.table, &columns))
    }
}
