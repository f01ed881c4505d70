use super::{SqlString, push_where};
use crate::ident::Dialect;

/// Delete rows from a table
#[derive(Default, Debug, Clone)]
pub struct DeleteStatement<'a> {
    pub dialect: Dialect,
    pub table: &'a str,
    pub r#where: Vec<&'a str>,
}

impl SqlString for DeleteStatement<'_> {
    /// Convert the [`DeleteStatement`] into a runnable SQL string.
    fn to_sql(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.dialect.quote(self.table));
        // Note: A DELETE statement without a WHERE clause is valid (deletes all rows),
        // the builder never produces one.
        push_where(&mut sql, self.dialect, &self.r#where, "");
        sql
    }
}

impl<'a> DeleteStatement<'a> {
    /// Construct a new [`DeleteStatement`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the identifier quoting to render with.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// Specify the table to delete from.
    pub fn table(&mut self, table_name: &'a str) -> &mut Self {
        self.table = table_name;
        self
    }

    /// Specify a clause to add to the WHERE section of the query.
    ///
    /// NOTE: where parameters are added with the `:${clause}` name.
    pub fn r#where(&mut self, clause: &'a str) -> &mut Self {
        self.r#where.push(clause);
        self
    }
}
