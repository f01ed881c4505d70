use super::{SqlString, push_where};
use crate::ident::Dialect;
use crate::value::Direction;

/// Select rows from an existing table
#[derive(Default, Debug, Clone)]
pub struct SelectStatement<'a> {
    pub dialect: Dialect,
    pub from: &'a str,
    pub selects: SelectList<'a>,
    pub r#where: Vec<&'a str>,
    pub orderby: Vec<(&'a str, Direction)>,
    pub tail: Option<&'a str>,
}

/// What goes between `SELECT` and `FROM`.
#[derive(Default, Debug, Clone)]
pub enum SelectList<'a> {
    #[default]
    All,
    Columns(Vec<&'a str>),
    Raw(&'a str),
}

impl SqlString for SelectStatement<'_> {
    /// Convert the [`SelectStatement`] into a runnable SQL string.
    fn to_sql(&self) -> String {
        let mut sql = String::new();
        sql.push_str("SELECT ");
        match &self.selects {
            SelectList::All => sql.push('*'),
            SelectList::Columns(columns) => sql.push_str(
                &columns
                    .iter()
                    .map(|column| self.dialect.quote(column))
                    .collect::<Vec<String>>()
                    .join(", "),
            ),
            SelectList::Raw(expr) => sql.push_str(expr),
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.dialect.quote(self.from));

        push_where(&mut sql, self.dialect, &self.r#where, "");

        if !self.orderby.is_empty() {
            sql.push(' ');
            sql.push_str("ORDER BY ");
            sql.push_str(
                &self
                    .orderby
                    .iter()
                    .map(|(column, direction)| {
                        format!("{} {}", self.dialect.quote(column), direction.as_sql())
                    })
                    .collect::<Vec<String>>()
                    .join(", "),
            );
        }

        if let Some(tail) = self.tail {
            sql.push(' ');
            sql.push_str(tail);
        }

        sql
    }
}

impl<'a> SelectStatement<'a> {
    /// Construct a new [`SelectStatement`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the identifier quoting to render with.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// Specify the table to select results from.
    pub fn from(&mut self, table_name: &'a str) -> &mut Self {
        self.from = table_name;
        self
    }

    /// Specify which column to add to the selection list.
    pub fn column(&mut self, column: &'a str) -> &mut Self {
        match &mut self.selects {
            SelectList::Columns(columns) => columns.push(column),
            selects => *selects = SelectList::Columns(vec![column]),
        }
        self
    }

    /// Select an unquoted expression list such as `COUNT(*)`.
    pub fn expr(&mut self, expr: &'a str) -> &mut Self {
        self.selects = SelectList::Raw(expr);
        self
    }

    /// Specify a clause to add to the WHERE section of the query.
    /// NOTE: parameters are added with the name `":${clause}"`
    pub fn r#where(&mut self, clause: &'a str) -> &mut Self {
        self.r#where.push(clause);
        self
    }

    /// Specify an ORDER BY entry to order the results in the provided direction.
    pub fn orderby(&mut self, column: &'a str, direction: Direction) -> &mut Self {
        self.orderby.push((column, direction));
        self
    }

    /// Append hand-written SQL after the FROM clause, verbatim.
    pub fn tail(&mut self, raw: &'a str) -> &mut Self {
        self.tail = Some(raw);
        self
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::query::Query;

    #[test]
    fn test_to_sql() {
        let query = Query::select()
            .column("id")
            .column("name")
            .column("status")
            .from("hello_world")
            .r#where("id")
            .r#where("status")
            .orderby("created_at", Direction::Desc)
            .to_owned();

        assert_snapshot!(
            query.to_sql(),
            @r#"SELECT "id", "name", "status" FROM "hello_world" WHERE "id" = :id AND "status" = :status ORDER BY "created_at" DESC"#
        );
    }

    #[test]
    fn test_to_sql_all_mysql() {
        let query = Query::select()
            .dialect(Dialect::MySql)
            .from("users")
            .orderby("last_name", Direction::Asc)
            .orderby("first_name", Direction::Asc)
            .to_owned();

        assert_snapshot!(
            query.to_sql(),
            @"SELECT * FROM `users` ORDER BY `last_name` ASC, `first_name` ASC"
        );
    }

    #[test]
    fn test_to_sql_expr_is_unquoted() {
        let query = Query::select().expr("COUNT(*)").from("t").to_owned();
        assert_eq!(query.to_sql(), r#"SELECT COUNT(*) FROM "t""#);
    }

    #[test]
    fn test_to_sql_tail() {
        let query = Query::select()
            .column("name")
            .from("users")
            .tail("WHERE name LIKE '%ol%' ORDER BY name ASC")
            .to_owned();

        assert_eq!(
            query.to_sql(),
            r#"SELECT "name" FROM "users" WHERE name LIKE '%ol%' ORDER BY name ASC"#
        );
    }
}
