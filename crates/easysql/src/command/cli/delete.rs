use clap::Parser;
use easysql_database::{Context, Envelope, PredicateMap, Value};

use super::pairs::parse_pair;

#[derive(Debug, Parser)]
pub struct Cmd {
    /// Table to delete from
    table: String,

    /// Equality conditions as `column=value`
    #[arg(required = true, value_parser = parse_pair)]
    predicates: Vec<(String, Value)>,

    /// Allow more than one condition
    #[arg(long, short)]
    many: bool,
}

impl Cmd {
    /// Delete matching rows; the envelope data is the number of rows removed.
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let predicates: PredicateMap = self.predicates.into_iter().collect();
        let builder = &context.builder;

        match (dry_run, self.many) {
            (true, true) => {
                Envelope::from_result(builder.delete_many_statement(&self.table, &predicates))
            }
            (true, false) => {
                Envelope::from_result(builder.delete_statement(&self.table, &predicates))
            }
            (false, true) => Envelope::from_result(builder.delete_many(&self.table, &predicates)),
            (false, false) => Envelope::from_result(builder.delete(&self.table, &predicates)),
        }
    }
}
