use clap::Parser;
use easysql_database::{
    AlterOperand, ColumnSpec, Context, Envelope, Error, ErrorCode, RawFragment, Result,
};

#[derive(Debug, Parser)]
pub struct Cmd {
    /// Table to alter
    table: String,

    /// ADD, DROP or MODIFY
    operand: String,

    /// `column=TYPE` definitions, or a single bare column for DROP
    #[arg(conflicts_with = "raw")]
    columns: Vec<String>,

    /// SQL placed after the operand as is, e.g. "COLUMN age INTEGER DEFAULT 0"
    #[arg(long)]
    raw: Option<String>,
}

impl Cmd {
    pub fn run(self, context: &Context, dry_run: bool) -> Envelope {
        let result = self
            .operand
            .parse::<AlterOperand>()
            .and_then(|operand| Ok((operand, self.spec()?)));
        let (operand, spec) = match result {
            Ok(parsed) => parsed,
            Err(err) => return Envelope::failure(&err),
        };

        if dry_run {
            return Envelope::from_result(
                context.builder.alter_statement(&self.table, operand, &spec),
            );
        }
        Envelope::from_result(context.builder.alter(&self.table, operand, &spec))
    }

    fn spec(&self) -> Result<ColumnSpec> {
        if let Some(raw) = &self.raw {
            return Ok(ColumnSpec::Raw(RawFragment::new(raw.as_str())));
        }
        if let [column] = self.columns.as_slice() {
            if !column.contains('=') {
                return Ok(ColumnSpec::Column(column.clone()));
            }
        }
        self.columns
            .iter()
            .map(|definition| match definition.split_once('=') {
                Some((column, column_type)) => {
                    Ok((column.trim().to_string(), column_type.trim().to_string()))
                }
                None => Err(Error::validation(
                    ErrorCode::InvalidArgument,
                    format!("expected column=TYPE, got `{definition}`"),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(ColumnSpec::Definitions)
    }
}
