//! CRUD entry points: validate arguments, build a [`BoundStatement`], run it through the
//! injected [`Database`] and normalize the outcome into [`Result`].
//!
//! Every validation happens before the handle is touched, so a rejected call never
//! issues SQL. Driver failures are logged and returned with the code of the operation
//! that failed (`ES611`..`ES615`) and the driver's message.

use easysql_common::config::BuilderConfig;
use log::{debug, error};
use typed_builder::TypedBuilder;

use crate::database::{Database, DatabaseError};
use crate::error::{Error, ErrorCode, Result};
use crate::ident::{placeholder, validate_column_type, validate_columns, validate_identifier};
use crate::query::alter::{AlterOperand, ColumnSpec};
use crate::query::select::SelectStatement;
use crate::query::{BoundStatement, Query, SqlString, UPDATE_SET_PREFIX, UPDATE_WHERE_PREFIX};
use crate::value::{ColumnMap, OrderBy, PredicateMap, Projection, RawFragment, Row};

/// Options that change how strictly arguments are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TypedBuilder)]
pub struct BuilderOptions {
    /// Reject orderings and ALTER definition lists with more than one entry.
    #[builder(default)]
    pub strict: bool,
}

impl From<&BuilderConfig> for BuilderOptions {
    fn from(config: &BuilderConfig) -> Self {
        Self {
            strict: config.strict,
        }
    }
}

/// Builds and runs parameterized CRUD statements against a database handle.
///
/// The builder keeps no state between calls besides the handle and its options.
pub struct StatementBuilder<D> {
    db: D,
    options: BuilderOptions,
}

impl<D: Database> StatementBuilder<D> {
    /// Creates a new [`StatementBuilder`] with default options.
    pub fn new(db: D) -> Self {
        Self::with_options(db, BuilderOptions::default())
    }

    pub fn with_options(db: D, options: BuilderOptions) -> Self {
        Self { db, options }
    }

    pub fn options(&self) -> BuilderOptions {
        self.options
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    /// Select rows matching every predicate (equality, joined with AND).
    ///
    /// An empty or absent predicate map selects every row.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES611` if the driver fails.
    pub fn select(
        &self,
        table: &str,
        projection: &Projection,
        predicates: Option<&PredicateMap>,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Row>> {
        let statement = self.select_statement(table, projection, predicates, order)?;
        self.run_query(&statement)
    }

    /// Build the statement [`Self::select`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn select_statement(
        &self,
        table: &str,
        projection: &Projection,
        predicates: Option<&PredicateMap>,
        order: Option<&OrderBy>,
    ) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;
        let mut query = projected(table, projection, "select()")?;

        if let Some(predicates) = predicates {
            validate_columns(predicates.columns())?;
            for column in predicates.columns() {
                query.r#where(column);
            }
        }

        if let Some(order) = order {
            if self.options.strict && order.len() > 1 {
                return Err(Error::cardinality(4, "select()", 1));
            }
            for (column, direction) in order.iter() {
                validate_identifier(column, "column")?;
                query.orderby(column, direction);
            }
        }

        let mut statement = BoundStatement::new(query.dialect(self.db.dialect()).to_sql());
        if let Some(predicates) = predicates {
            for (column, value) in predicates.iter() {
                statement.bind(placeholder("", column), value.clone());
            }
        }
        Ok(statement)
    }

    /// Select rows with a hand-written clause appended after FROM.
    ///
    /// `raw` is not escaped; it must never contain untrusted input.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES611` if the driver fails.
    pub fn select_raw(
        &self,
        table: &str,
        projection: &Projection,
        raw: Option<&RawFragment>,
    ) -> Result<Vec<Row>> {
        let statement = self.select_raw_statement(table, projection, raw)?;
        self.run_query(&statement)
    }

    /// Build the statement [`Self::select_raw`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn select_raw_statement(
        &self,
        table: &str,
        projection: &Projection,
        raw: Option<&RawFragment>,
    ) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;
        let mut query = projected(table, projection, "select_raw()")?;
        if let Some(raw) = raw.filter(|raw| !raw.is_blank()) {
            query.tail(raw.as_str());
        }
        Ok(BoundStatement::new(
            query.dialect(self.db.dialect()).to_sql(),
        ))
    }

    /// Insert one row and return the identifier the driver assigned to it.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES612` if the driver fails.
    pub fn insert(&self, table: &str, columns: &ColumnMap) -> Result<i64> {
        let statement = self.insert_statement(table, columns)?;
        debug!("insert: {}", statement.sql);
        self.db
            .insert(&statement)
            .map_err(|err| driver_error(ErrorCode::Create, &statement, err))
    }

    /// Build the statement [`Self::insert`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn insert_statement(&self, table: &str, columns: &ColumnMap) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;
        if columns.is_empty() {
            return Err(Error::missing_argument(2, "insert()"));
        }
        validate_columns(columns.columns())?;

        let mut query = Query::insert();
        query.dialect(self.db.dialect()).table(table);
        for column in columns.columns() {
            query.column(column);
        }

        let mut statement = BoundStatement::new(query.to_sql());
        for (column, value) in columns.iter() {
            statement.bind(placeholder("", column), value.clone());
        }
        Ok(statement)
    }

    /// Set `columns` on every row matching `predicates` and return how many rows changed.
    ///
    /// Zero is a valid result meaning nothing matched.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES613` if the driver fails.
    pub fn update(
        &self,
        table: &str,
        columns: &ColumnMap,
        predicates: &PredicateMap,
    ) -> Result<usize> {
        let statement = self.update_statement(table, columns, predicates)?;
        self.run_execute(ErrorCode::Update, &statement)
    }

    /// Build the statement [`Self::update`] would run.
    ///
    /// SET placeholders are `:update_<column>` and WHERE placeholders `:w_<column>`, so a
    /// column may appear in both.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn update_statement(
        &self,
        table: &str,
        columns: &ColumnMap,
        predicates: &PredicateMap,
    ) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;
        if columns.is_empty() {
            return Err(Error::missing_argument(2, "update()"));
        }
        if predicates.is_empty() {
            return Err(Error::missing_argument(3, "update()"));
        }
        validate_columns(columns.columns())?;
        validate_columns(predicates.columns())?;

        let mut query = Query::update();
        query.dialect(self.db.dialect()).table(table);
        for column in columns.columns() {
            query.column(column);
        }
        for column in predicates.columns() {
            query.r#where(column);
        }

        let mut statement = BoundStatement::new(query.to_sql());
        for (column, value) in columns.iter() {
            statement.bind(placeholder(UPDATE_SET_PREFIX, column), value.clone());
        }
        for (column, value) in predicates.iter() {
            statement.bind(placeholder(UPDATE_WHERE_PREFIX, column), value.clone());
        }
        Ok(statement)
    }

    /// Delete the rows matching a single `column = value` predicate.
    ///
    /// # Errors
    /// `ES711` for an empty map, `ES715` for more than one key, `ES614` if the driver fails.
    pub fn delete(&self, table: &str, predicates: &PredicateMap) -> Result<usize> {
        let statement = self.delete_statement(table, predicates)?;
        self.run_execute(ErrorCode::Delete, &statement)
    }

    /// Delete every row matching all of `predicates`.
    ///
    /// # Errors
    /// `ES711` for an empty map, `ES614` if the driver fails.
    pub fn delete_many(&self, table: &str, predicates: &PredicateMap) -> Result<usize> {
        let statement = self.delete_many_statement(table, predicates)?;
        self.run_execute(ErrorCode::Delete, &statement)
    }

    /// Build the statement [`Self::delete`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES715` for more than one key.
    pub fn delete_statement(
        &self,
        table: &str,
        predicates: &PredicateMap,
    ) -> Result<BoundStatement> {
        if predicates.len() > 1 {
            validate_identifier(table, "table")?;
            return Err(Error::cardinality(2, "delete()", 1));
        }
        self.build_delete(table, predicates, "delete()")
    }

    /// Build the statement [`Self::delete_many`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn delete_many_statement(
        &self,
        table: &str,
        predicates: &PredicateMap,
    ) -> Result<BoundStatement> {
        self.build_delete(table, predicates, "delete_many()")
    }

    fn build_delete(
        &self,
        table: &str,
        predicates: &PredicateMap,
        function: &str,
    ) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;
        if predicates.is_empty() {
            return Err(Error::missing_argument(2, function));
        }
        validate_columns(predicates.columns())?;

        let mut query = Query::delete();
        query.dialect(self.db.dialect()).table(table);
        for column in predicates.columns() {
            query.r#where(column);
        }

        let mut statement = BoundStatement::new(query.to_sql());
        for (column, value) in predicates.iter() {
            statement.bind(placeholder("", column), value.clone());
        }
        Ok(statement)
    }

    /// Run `ALTER TABLE table operand spec`.
    ///
    /// Nothing is bound: identifiers and types are whitelisted and concatenated.
    ///
    /// # Errors
    /// Validation errors for bad arguments, `ES615` if the driver fails.
    pub fn alter(&self, table: &str, operand: AlterOperand, spec: &ColumnSpec) -> Result<()> {
        let statement = self.alter_statement(table, operand, spec)?;
        self.run_execute(ErrorCode::Alter, &statement)?;
        Ok(())
    }

    /// Build the statement [`Self::alter`] would run.
    ///
    /// # Errors
    /// Validation errors for bad arguments.
    pub fn alter_statement(
        &self,
        table: &str,
        operand: AlterOperand,
        spec: &ColumnSpec,
    ) -> Result<BoundStatement> {
        validate_identifier(table, "table")?;

        let mut query = Query::alter();
        query
            .dialect(self.db.dialect())
            .table(table)
            .operand(operand);

        match spec {
            ColumnSpec::Column(column) => {
                if operand == AlterOperand::Modify {
                    return Err(Error::validation(
                        ErrorCode::InvalidArgument,
                        "MODIFY takes a column definition, not a bare column name",
                    ));
                }
                validate_identifier(column, "column")?;
                query.name(column);
            }
            ColumnSpec::Definitions(definitions) => {
                if definitions.is_empty() {
                    return Err(Error::missing_argument(3, "alter()"));
                }
                if self.options.strict && definitions.len() > 1 {
                    return Err(Error::cardinality(3, "alter()", 1));
                }
                if operand == AlterOperand::Drop {
                    return Err(Error::validation(
                        ErrorCode::InvalidArgument,
                        "DROP takes column names only, not column definitions",
                    ));
                }
                validate_columns(definitions.iter().map(|(column, _)| column.as_str()))?;
                for (column, column_type) in definitions {
                    validate_column_type(column_type)?;
                    query.column(column, column_type);
                }
            }
            ColumnSpec::Raw(raw) => {
                if raw.is_blank() {
                    return Err(Error::missing_argument(3, "alter()"));
                }
                query.raw(raw.as_str());
            }
        }

        Ok(BoundStatement::new(query.to_sql()))
    }

    fn run_query(&self, statement: &BoundStatement) -> Result<Vec<Row>> {
        debug!("select: {}", statement.sql);
        self.db
            .query(statement)
            .map_err(|err| driver_error(ErrorCode::Read, statement, err))
    }

    fn run_execute(&self, code: ErrorCode, statement: &BoundStatement) -> Result<usize> {
        debug!("execute: {}", statement.sql);
        self.db
            .execute(statement)
            .map_err(|err| driver_error(code, statement, err))
    }
}

/// A select of `projection` from `table`, with the projection validated.
fn projected<'a>(
    table: &'a str,
    projection: &'a Projection,
    function: &str,
) -> Result<SelectStatement<'a>> {
    let mut query = Query::select();
    query.from(table);
    match projection {
        Projection::All => {}
        Projection::Columns(columns) => {
            if columns.is_empty() {
                return Err(Error::missing_argument(2, function));
            }
            for column in columns {
                validate_identifier(column, "column")?;
                query.column(column);
            }
        }
        Projection::Raw(expr) => {
            if expr.is_blank() {
                return Err(Error::missing_argument(2, function));
            }
            query.expr(expr.as_str());
        }
    }
    Ok(query)
}

fn driver_error(code: ErrorCode, statement: &BoundStatement, err: DatabaseError) -> Error {
    error!("{code} while running `{}`: {}", statement.sql, err.msg);
    Error::new(code, err.msg)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use insta::assert_snapshot;

    use easysql_common::config::{DatabaseConfig, SqlDialect};

    use super::*;
    use crate::database::sqlite::Sqlite;
    use crate::error::ErrorKind;
    use crate::ident::Dialect;
    use crate::value::{Direction, Value};

    /// Records every statement it is handed and answers with canned results.
    #[derive(Default)]
    struct RecordingDb {
        statements: RefCell<Vec<BoundStatement>>,
        fail_with: Option<String>,
    }

    impl RecordingDb {
        fn failing(msg: &str) -> Self {
            Self {
                statements: RefCell::default(),
                fail_with: Some(msg.to_string()),
            }
        }

        fn issued(&self) -> usize {
            self.statements.borrow().len()
        }

        fn record(&self, statement: &BoundStatement) -> std::result::Result<(), DatabaseError> {
            self.statements.borrow_mut().push(statement.clone());
            match &self.fail_with {
                Some(msg) => Err(DatabaseError { msg: msg.clone() }),
                None => Ok(()),
            }
        }
    }

    impl Database for RecordingDb {
        fn dialect(&self) -> Dialect {
            Dialect::Ansi
        }

        fn query(&self, statement: &BoundStatement) -> std::result::Result<Vec<Row>, DatabaseError> {
            self.record(statement).map(|()| Vec::new())
        }

        fn execute(&self, statement: &BoundStatement) -> std::result::Result<usize, DatabaseError> {
            self.record(statement).map(|()| 0)
        }

        fn insert(&self, statement: &BoundStatement) -> std::result::Result<i64, DatabaseError> {
            self.record(statement).map(|()| 7)
        }
    }

    fn sqlite_builder() -> StatementBuilder<Sqlite> {
        let db = Sqlite::in_memory().unwrap();
        db.conn
            .execute_batch(concat!(
                "CREATE TABLE hello_world (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, status TEXT);",
                "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, status TEXT);",
            ))
            .unwrap();
        StatementBuilder::new(db)
    }

    fn seed(builder: &StatementBuilder<Sqlite>) {
        for (id, name, status) in [(1, "a", "new"), (2, "b", "new"), (3, "x", "old"), (4, "x", "new")] {
            builder
                .insert(
                    "t",
                    &ColumnMap::from([
                        ("id", Value::from(id)),
                        ("name", Value::from(name)),
                        ("status", Value::from(status)),
                    ]),
                )
                .unwrap();
        }
    }

    #[test]
    fn test_insert_has_one_placeholder_per_column() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let columns = ColumnMap::new()
            .with("user_name", "olla")
            .with("age", 31)
            .with("active", true)
            .with("bio", Value::Null);

        let statement = builder.insert_statement("users", &columns).unwrap();

        assert_snapshot!(
            statement.sql,
            @r#"INSERT INTO "users" ("user_name", "age", "active", "bio") VALUES (:user_name, :age, :active, :bio)"#
        );
        let names: Vec<&str> = statement.params.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec![":user_name", ":age", ":active", ":bio"]);
        assert_eq!(statement.param(":age"), Some(&Value::Integer(31)));
        assert_eq!(statement.param(":bio"), Some(&Value::Null));
    }

    #[test]
    fn test_where_has_one_term_per_predicate() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let predicates = PredicateMap::from([("b", 2), ("a", 1), ("c", 3)]);

        let select = builder
            .select_statement("t", &Projection::All, Some(&predicates), None)
            .unwrap();
        let update = builder
            .update_statement("t", &ColumnMap::from([("x", 0)]), &predicates)
            .unwrap();
        let delete = builder.delete_many_statement("t", &predicates).unwrap();

        for sql in [&select.sql, &update.sql, &delete.sql] {
            let clause = sql.split(" WHERE ").nth(1).unwrap();
            assert_eq!(clause.matches(" = ").count(), 3, "{sql}");
            assert_eq!(clause.matches(" AND ").count(), 2, "{sql}");
        }
        assert_snapshot!(
            select.sql,
            @r#"SELECT * FROM "t" WHERE "b" = :b AND "a" = :a AND "c" = :c"#
        );
    }

    #[test]
    fn test_update_namespaces_set_and_where() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let statement = builder
            .update_statement(
                "t",
                &ColumnMap::from([("status", "x")]),
                &PredicateMap::from([("status", "y")]),
            )
            .unwrap();

        assert_snapshot!(
            statement.sql,
            @r#"UPDATE "t" SET "status" = :update_status WHERE "status" = :w_status"#
        );
        assert_eq!(statement.params.len(), 2);
        assert_eq!(statement.param(":update_status"), Some(&Value::from("x")));
        assert_eq!(statement.param(":w_status"), Some(&Value::from("y")));
    }

    #[test]
    fn test_aggregate_projection_is_raw() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let statement = builder
            .select_statement(
                "t",
                &Projection::infer(&["COUNT(*)"]),
                Some(&PredicateMap::new()),
                None,
            )
            .unwrap();

        assert_eq!(statement.sql, r#"SELECT COUNT(*) FROM "t""#);
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_select_order() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let statement = builder
            .select_statement(
                "t",
                &Projection::infer(&["id", "name"]),
                None,
                Some(&OrderBy::by("name", Direction::Desc)),
            )
            .unwrap();

        assert_snapshot!(
            statement.sql,
            @r#"SELECT "id", "name" FROM "t" ORDER BY "name" DESC"#
        );
    }

    #[test]
    fn test_strict_mode_cardinality() {
        let order = OrderBy::by("a", Direction::Asc).then("b", Direction::Desc);
        let definitions = ColumnSpec::Definitions(vec![
            (String::from("a"), String::from("INT")),
            (String::from("b"), String::from("TEXT")),
        ]);

        let relaxed = StatementBuilder::new(RecordingDb::default());
        assert!(relaxed.select("t", &Projection::All, None, Some(&order)).is_ok());
        assert!(relaxed.alter("t", AlterOperand::Add, &definitions).is_ok());
        assert_eq!(relaxed.database().issued(), 2);

        let strict = StatementBuilder::with_options(
            RecordingDb::default(),
            BuilderOptions::builder().strict(true).build(),
        );
        let err = strict.select("t", &Projection::All, None, Some(&order)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cardinality);
        let err = strict.alter("t", AlterOperand::Add, &definitions).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cardinality);
        assert_eq!(strict.database().issued(), 0);
    }

    #[test]
    fn test_validation_never_reaches_driver() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let id = PredicateMap::from([("id", 1)]);

        let errors = [
            builder.update("t", &ColumnMap::new(), &id).unwrap_err(),
            builder.update("t", &ColumnMap::from([("a", 1)]), &PredicateMap::new()).unwrap_err(),
            builder
                .delete("t", &PredicateMap::from([("id", Value::from(1)), ("name", Value::from("x"))]))
                .unwrap_err(),
            builder.delete_many("t", &PredicateMap::new()).unwrap_err(),
            builder.insert("t", &ColumnMap::new()).unwrap_err(),
            builder.insert("t\"; DROP TABLE t; --", &ColumnMap::from([("a", 1)])).unwrap_err(),
            builder.insert("", &ColumnMap::from([("a", 1)])).unwrap_err(),
            builder.select("t", &Projection::Columns(Vec::new()), None, None).unwrap_err(),
            builder.select("t", &Projection::infer(&["na me"]), None, None).unwrap_err(),
            builder
                .alter("t", AlterOperand::Add, &ColumnSpec::Definitions(vec![(String::from("a"), String::from("INT; --"))]))
                .unwrap_err(),
            builder
                .alter("t", AlterOperand::Drop, &ColumnSpec::Definitions(vec![(String::from("a"), String::from("INT"))]))
                .unwrap_err(),
        ];

        for err in &errors {
            assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
        }
        assert_eq!(errors[0].code(), ErrorCode::MissingArgument);
        assert_eq!(errors[2].code(), ErrorCode::Cardinality);
        assert_eq!(errors[5].code(), ErrorCode::InvalidIdentifier);
        assert_eq!(builder.database().issued(), 0);
    }

    #[test]
    fn test_driver_error_keeps_message() {
        let builder = StatementBuilder::new(RecordingDb::failing("disk I/O error"));

        let err = builder
            .update("t", &ColumnMap::from([("a", 1)]), &PredicateMap::from([("id", 1)]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Driver {
                code: ErrorCode::Update,
                message: String::from("disk I/O error"),
            }
        );
        assert_eq!(builder.database().issued(), 1);

        let err = builder.select("t", &Projection::All, None, None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Read);
    }

    #[test]
    fn test_builder_over_borrowed_handle() {
        let db = RecordingDb::default();
        let first = StatementBuilder::new(&db);
        let second = StatementBuilder::new(&db);

        first.delete("t", &PredicateMap::from([("id", 1)])).unwrap();
        second.insert("t", &ColumnMap::from([("id", 1)])).unwrap();
        assert_eq!(db.issued(), 2);
    }

    #[test]
    fn test_insert_then_select_round_trip() {
        let builder = sqlite_builder();

        let id = builder
            .insert("hello_world", &ColumnMap::from([("name", "Olla")]))
            .unwrap();
        assert_eq!(id, 1);

        let rows = builder
            .select(
                "hello_world",
                &Projection::infer(&["name"]),
                Some(&PredicateMap::from([("name", "Olla")])),
                None,
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::from("Olla")));
    }

    #[test]
    fn test_select_is_idempotent_and_empty_is_not_an_error() {
        let builder = sqlite_builder();
        let ids = Projection::infer(&["id"]);

        let empty = builder.select("t", &ids, Some(&PredicateMap::new()), None).unwrap();
        assert!(empty.is_empty());

        seed(&builder);
        let first = builder.select("t", &ids, Some(&PredicateMap::new()), None).unwrap();
        let second = builder.select("t", &ids, Some(&PredicateMap::new()), None).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_count_and_raw_clause() {
        let builder = sqlite_builder();
        seed(&builder);

        let rows = builder
            .select("t", &Projection::infer(&["COUNT(*)"]), None, None)
            .unwrap();
        assert_eq!(rows[0].get("COUNT(*)"), Some(&Value::Integer(4)));

        let rows = builder
            .select_raw(
                "t",
                &Projection::infer(&["id"]),
                Some(&RawFragment::new("WHERE name LIKE 'x%' ORDER BY id DESC")),
            )
            .unwrap();
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.get("id")?.as_i64()).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn test_update_reports_affected_rows() {
        let builder = sqlite_builder();
        seed(&builder);

        let changed = builder
            .update(
                "t",
                &ColumnMap::from([("status", "done")]),
                &PredicateMap::from([("status", "new")]),
            )
            .unwrap();
        assert_eq!(changed, 3);

        let unchanged = builder
            .update(
                "t",
                &ColumnMap::from([("status", "done")]),
                &PredicateMap::from([("id", 99)]),
            )
            .unwrap();
        assert_eq!(unchanged, 0);
    }

    #[test]
    fn test_delete_entry_points() {
        let builder = sqlite_builder();
        seed(&builder);
        let both = PredicateMap::from([("name", "x"), ("status", "new")]);

        let err = builder.delete("t", &both).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cardinality);

        assert_eq!(builder.delete_many("t", &both).unwrap(), 1);
        assert_eq!(builder.delete("t", &PredicateMap::from([("id", 1)])).unwrap(), 1);

        let rows = builder.select("t", &Projection::All, None, None).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_delete_many_removes_every_match() {
        let builder = sqlite_builder();
        seed(&builder);

        let statement = builder
            .delete_many_statement("t", &PredicateMap::from([("status", "new")]))
            .unwrap();
        assert_eq!(statement.sql, r#"DELETE FROM "t" WHERE "status" = :status"#);

        let removed = builder
            .delete_many("t", &PredicateMap::from([("status", "new")]))
            .unwrap();
        assert_eq!(removed, 3);

        let rows = builder.select("t", &Projection::All, None, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("status"), Some(&Value::from("old")));
    }

    #[test]
    fn test_delete_statement_limits_keys() {
        let builder = StatementBuilder::new(RecordingDb::default());
        let both = PredicateMap::from([("name", "x"), ("status", "new")]);

        let err = builder.delete_statement("t", &both).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cardinality);
        assert!(builder.delete_many_statement("t", &both).is_ok());
        assert_eq!(
            builder.delete_statement("t", &PredicateMap::new()).unwrap_err().code(),
            ErrorCode::MissingArgument
        );
    }

    #[test]
    fn test_mysql_dialect_through_handle() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            database_path: Some(dir.path().to_path_buf()),
            database_file: Some(String::from("mysql.db")),
            dialect: SqlDialect::Mysql,
            ..DatabaseConfig::default()
        };
        let db = Sqlite::open(&config).unwrap();
        assert_eq!(db.dialect(), Dialect::MySql);
        db.conn
            .execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);")
            .unwrap();
        let builder = StatementBuilder::new(db);

        let statement = builder
            .insert_statement("people", &ColumnMap::from([("name", Value::from("Olla"))]))
            .unwrap();
        assert_eq!(statement.sql, "INSERT INTO `people` (`name`) VALUES (:name)");

        builder
            .insert("people", &ColumnMap::from([("name", Value::from("Olla")), ("age", Value::from(31))]))
            .unwrap();
        let rows = builder
            .select(
                "people",
                &Projection::infer(&["name", "age"]),
                Some(&PredicateMap::from([("name", "Olla")])),
                None,
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("age"), Some(&Value::Integer(31)));
    }

    #[test]
    fn test_alter_rejects_unsafe_shapes() {
        let builder = StatementBuilder::with_options(
            RecordingDb::default(),
            BuilderOptions::builder().strict(true).build(),
        );

        let err = builder
            .alter("t", AlterOperand::Modify, &ColumnSpec::Column(String::from("age")))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = builder
            .alter(
                "users",
                AlterOperand::Add,
                &ColumnSpec::Definitions(vec![(String::from("bio"), String::from("TEXT, DROP password"))]),
            )
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);

        let statement = builder
            .alter_statement(
                "t",
                AlterOperand::Modify,
                &ColumnSpec::Definitions(vec![(String::from("price"), String::from("NUMERIC(10, 2)"))]),
            )
            .unwrap();
        assert_eq!(statement.sql, r#"ALTER TABLE "t" MODIFY "price" NUMERIC(10, 2)"#);
        assert_eq!(builder.database().issued(), 0);
    }

    #[test]
    fn test_alter_add_column() {
        let builder = sqlite_builder();

        builder
            .alter(
                "hello_world",
                AlterOperand::Add,
                &ColumnSpec::Definitions(vec![(String::from("age"), String::from("INTEGER"))]),
            )
            .unwrap();
        builder
            .insert("hello_world", &ColumnMap::from([("name", Value::from("Olla")), ("age", Value::from(31))]))
            .unwrap();

        let rows = builder
            .select("hello_world", &Projection::infer(&["age"]), None, None)
            .unwrap();
        assert_eq!(rows[0].get("age"), Some(&Value::Integer(31)));

        builder
            .alter("hello_world", AlterOperand::Drop, &ColumnSpec::Column(String::from("age")))
            .unwrap();
        let err = builder
            .select("hello_world", &Projection::infer(&["age"]), None, None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Read);
        assert!(err.message().contains("no such column"), "{err}");
    }

    #[test]
    fn test_misspelled_predicate_column_is_driver_error() {
        let builder = sqlite_builder();
        seed(&builder);
        let misspelled = PredicateMap::from([("nmae", "x")]);

        let err = builder.delete("t", &misspelled).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Delete);
        assert!(err.message().contains("no such column: nmae"), "{err}");

        let err = builder
            .select("t", &Projection::All, Some(&misspelled), None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Read);

        let rows = builder.select("t", &Projection::All, None, None).unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_constraint_violation_is_driver_error() {
        let builder = sqlite_builder();
        seed(&builder);

        let err = builder
            .insert("t", &ColumnMap::from([("id", Value::from(1)), ("name", Value::from("dup"))]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Driver);
        assert_eq!(err.code(), ErrorCode::Create);
        assert!(err.message().contains("UNIQUE constraint failed"), "{err}");
    }
}
