use clap::Parser;
use easysql_database::{
    Context, Direction, Envelope, OrderBy, PredicateMap, Projection, RawFragment, Value,
};
use log::debug;

use super::pairs::{parse_order, parse_pair};

/// Columns to project; an empty list means `*`.
fn projection(columns: &[String]) -> Projection {
    if columns.is_empty() {
        Projection::All
    } else {
        Projection::infer(columns)
    }
}

#[derive(Debug, Parser)]
pub struct Cmd {
    /// Table to select from
    table: String,

    /// Column to return, repeatable. An entry with a parenthesis such as `COUNT(*)` is
    /// passed through unquoted
    #[arg(long = "column", short)]
    columns: Vec<String>,

    /// Equality condition `column=value`, repeatable
    #[arg(long = "where", short = 'w', value_parser = parse_pair)]
    predicates: Vec<(String, Value)>,

    /// Sort key `column[:asc|desc]`, repeatable
    #[arg(long, short, value_parser = parse_order)]
    order: Vec<(String, Direction)>,
}

impl Cmd {
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let projection = projection(&self.columns);
        let predicates: PredicateMap = self.predicates.into_iter().collect();
        let order = self
            .order
            .into_iter()
            .fold(OrderBy::default(), |order, (column, direction)| {
                order.then(column, direction)
            });
        let order = (!order.is_empty()).then_some(&order);
        debug!("select from {} where {predicates:?}", self.table);

        if dry_run {
            return Envelope::from_result(context.builder.select_statement(
                &self.table,
                &projection,
                Some(&predicates),
                order,
            ));
        }
        Envelope::from_result(context.builder.select(
            &self.table,
            &projection,
            Some(&predicates),
            order,
        ))
    }
}

#[derive(Debug, Parser)]
pub struct RawCmd {
    /// Table to select from
    table: String,

    /// Column to return, repeatable
    #[arg(long = "column", short)]
    columns: Vec<String>,

    /// SQL appended after the FROM clause as is, e.g. "WHERE name LIKE 'o%'"
    clause: Option<String>,
}

impl RawCmd {
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let projection = projection(&self.columns);
        let clause = self.clause.map(RawFragment::new);

        if dry_run {
            return Envelope::from_result(context.builder.select_raw_statement(
                &self.table,
                &projection,
                clause.as_ref(),
            ));
        }
        Envelope::from_result(
            context
                .builder
                .select_raw(&self.table, &projection, clause.as_ref()),
        )
    }
}
