use super::{SqlString, UPDATE_SET_PREFIX, UPDATE_WHERE_PREFIX, push_where};
use crate::ident::{Dialect, placeholder};

/// Update existing rows in the table
#[derive(Default, Debug, Clone)]
pub struct UpdateStatement<'a> {
    pub dialect: Dialect,
    pub columns: Vec<&'a str>,
    pub table: &'a str,
    pub r#where: Vec<&'a str>,
}

impl SqlString for UpdateStatement<'_> {
    /// Convert the [`UpdateStatement`] into a runnable SQL string.
    fn to_sql(&self) -> String {
        let mut sql = String::new();
        sql.push_str(&format!("UPDATE {} SET", self.dialect.quote(self.table)));

        for (idx, &col) in self.columns.iter().enumerate() {
            sql.push(' ');
            sql.push_str(&format!(
                "{} = {}",
                self.dialect.quote(col),
                placeholder(UPDATE_SET_PREFIX, col)
            ));

            if idx < self.columns.len() - 1 {
                sql.push(',');
            }
        }

        push_where(&mut sql, self.dialect, &self.r#where, UPDATE_WHERE_PREFIX);
        sql
    }
}

impl<'a> UpdateStatement<'a> {
    /// Construct a new [`UpdateStatement`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the identifier quoting to render with.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// Specify the table of the update.
    pub fn table(&mut self, table_name: &'a str) -> &mut Self {
        self.table = table_name;
        self
    }

    /// Specify a clause to add to the WHERE section of the query.
    ///
    /// NOTE: where parameters are added with the `:w_${clause}` name
    /// so that they do not conflict with the `:update_${column}` values
    pub fn r#where(&mut self, clause: &'a str) -> &mut Self {
        self.r#where.push(clause);
        self
    }

    /// Specify a column to update.
    pub fn column(&mut self, column: &'a str) -> &mut Self {
        self.columns.push(column);
        self
    }
}

#[test]
fn test_to_sql() {
    let query = super::Query::update()
        .table("hello_world")
        .column("name")
        .column("status")
        .r#where("id")
        .to_owned();

    assert_eq!(
        query.to_sql(),
        String::from(concat!(
            r#"UPDATE "hello_world" SET "name" = :update_name, "status" = :update_status "#,
            r#"WHERE "id" = :w_id"#,
        ))
    );
}

#[test]
fn test_to_sql_same_column_in_both_clauses() {
    let query = super::Query::update()
        .dialect(Dialect::MySql)
        .table("t")
        .column("status")
        .r#where("status")
        .to_owned();

    assert_eq!(
        query.to_sql(),
        "UPDATE `t` SET `status` = :update_status WHERE `status` = :w_status"
    );
}
