use clap::Parser;
use easysql_database::{ColumnMap, Context, Envelope, PredicateMap, Value};

use super::pairs::parse_pair;

#[derive(Debug, Parser)]
pub struct Cmd {
    /// Table to update
    table: String,

    /// New values as `column=value`
    #[arg(required = true, value_parser = parse_pair)]
    columns: Vec<(String, Value)>,

    /// Equality condition `column=value`, repeatable
    #[arg(long = "where", short = 'w', required = true, value_parser = parse_pair)]
    predicates: Vec<(String, Value)>,
}

impl Cmd {
    /// Update matching rows; the envelope data is the number of rows changed.
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let columns: ColumnMap = self.columns.into_iter().collect();
        let predicates: PredicateMap = self.predicates.into_iter().collect();

        if dry_run {
            return Envelope::from_result(context.builder.update_statement(
                &self.table,
                &columns,
                &predicates,
            ));
        }
        Envelope::from_result(context.builder.update(&self.table, &columns, &predicates))
    }
}
