use insta::assert_snapshot;
use sqlweave::config::Settings;
use sqlweave::dialect::Dialect;
use sqlweave::dml::{Delete, Insert, Update};
use sqlweave::error::Error;
use sqlweave::expr::{col, lit_null, param, ExprExt, ParameterCollector};
use sqlweave::query::Select;
use sqlweave::resolve::Resolver;
use sqlweave::schema::{Column, ColumnDefault, Schema};
use sqlweave::sql::statement::{Statement, StatementKind};
use sqlweave::sql::types::DataType;

fn schema() -> Schema {
    let mut schema = Schema::new("db");
    let ns = schema.add_namespace("main").unwrap();

    let users = schema.add_table(ns, "users").unwrap();
    schema
        .add_column(users, "id", Column::new(DataType::Integer).auto_increment())
        .unwrap();
    schema
        .add_column(users, "name", Column::new(DataType::Varchar).not_null())
        .unwrap();
    schema
        .add_column(
            users,
            "status",
            Column::new(DataType::Varchar)
                .not_null()
                .default_value(ColumnDefault::String("new".into())),
        )
        .unwrap();
    schema
        .add_column(users, "note", Column::new(DataType::Text))
        .unwrap();
    schema
        .add_column(
            users,
            "created",
            Column::new(DataType::Timestamp)
                .not_null()
                .default_value(ColumnDefault::CurrentTimestamp),
        )
        .unwrap();

    let archive = schema.add_table(ns, "archive").unwrap();
    schema
        .add_column(archive, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_column(archive, "name", Column::new(DataType::Varchar))
        .unwrap();

    let counters = schema.add_table(ns, "counters").unwrap();
    schema
        .add_column(counters, "id", Column::new(DataType::Integer).auto_increment())
        .unwrap();

    schema
}

fn settings(dialect: Dialect) -> Settings {
    Settings::for_dialect(dialect)
}

fn named_user() -> Insert {
    Insert::into("users").value("name", param("name"))
}

#[test]
fn test_insert_fills_missing_columns_per_dialect() {
    let schema = schema();
    let postgres = named_user()
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(postgres, @r#"INSERT INTO "users" ("name", "status", "note", "created") VALUES ($1, DEFAULT, DEFAULT, DEFAULT)"#);

    let sqlite = named_user()
        .to_sql(&schema, &settings(Dialect::Sqlite))
        .unwrap();
    assert_snapshot!(sqlite, @r#"INSERT INTO "users" ("name", "status", "note", "created") VALUES (:name, 'new', NULL, CURRENT_TIMESTAMP)"#);

    let mysql = named_user()
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap();
    assert_snapshot!(mysql, @"INSERT INTO `users` (`name`, `status`, `note`, `created`) VALUES (?, DEFAULT, DEFAULT, DEFAULT)");
}

#[test]
fn test_insert_parameter_typed_from_target_column() {
    let compiled = named_user()
        .compile(&schema(), &settings(Dialect::Postgres))
        .unwrap();
    assert_eq!(compiled.kind(), StatementKind::Insert);
    assert_eq!(compiled.parameters().len(), 1);
    assert_eq!(compiled.parameters()[0].name, "name");
    assert_eq!(compiled.parameters()[0].data_type, Some(DataType::Varchar));
    assert!(compiled.result_columns().is_empty());
}

#[test]
fn test_explicit_identity_value_is_kept() {
    let sql = Insert::into("users")
        .value("id", 42)
        .value("name", "Bob")
        .to_sql(&schema(), &settings(Dialect::Sqlite))
        .unwrap();
    assert_snapshot!(sql, @r#"INSERT INTO "users" ("id", "name", "status", "note", "created") VALUES (42, 'Bob', 'new', NULL, CURRENT_TIMESTAMP)"#);
}

#[test]
fn test_repeated_value_replaces_earlier_one() {
    let sql = Insert::into("archive")
        .values([("id", 1), ("id", 2)])
        .value("name", "x")
        .to_sql(&schema(), &settings(Dialect::DuckDb))
        .unwrap();
    assert_snapshot!(sql, @r#"INSERT INTO "archive" ("id", "name") VALUES (2, 'x')"#);
}

#[test]
fn test_insert_without_values() {
    let schema = schema();
    let postgres = Insert::into("users")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(postgres, @r#"INSERT INTO "users" DEFAULT VALUES"#);

    // No DEFAULT VALUES form: every column is walked instead.
    let err = Insert::into("users")
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap_err();
    assert_eq!(
        err,
        Error::MissingValue {
            table: "main.users".into(),
            column: "name".into(),
        }
    );

    let err = Insert::into("counters")
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap_err();
    assert_eq!(
        err,
        Error::NoValues {
            table: "main.counters".into()
        }
    );
}

#[test]
fn test_insert_from_select() {
    let sql = Insert::into("archive")
        .from_select(
            &["id", "name"],
            Select::new()
                .from("users")
                .columns(&["id", "name"])
                .filter(col("status").eq("gone")),
        )
        .to_sql(&schema(), &settings(Dialect::DuckDb))
        .unwrap();
    assert_snapshot!(sql, @r#"INSERT INTO "archive" ("id", "name") SELECT "users"."id", "users"."name" FROM "users" WHERE "users"."status" = 'gone'"#);
}

#[test]
fn test_insert_from_select_with_qualified_target_columns() {
    let sql = Insert::into("archive")
        .from_select(
            &["archive.id", "main.archive.name"],
            Select::new().from("users").columns(&["id", "name"]),
        )
        .to_sql(&schema(), &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"INSERT INTO "archive" ("id", "name") SELECT "users"."id", "users"."name" FROM "users""#);
}

#[test]
fn test_insert_value_for_another_table_rejected() {
    let err = Insert::into("archive")
        .value("id", 1)
        .value("users.name", "x")
        .to_sql(&schema(), &settings(Dialect::DuckDb))
        .unwrap_err();
    assert_eq!(
        err,
        Error::ForeignColumn {
            table: "main.archive".into(),
            column: "users.name".into(),
        }
    );

    let err = Insert::into("archive")
        .from_select(
            &["id", "users.name"],
            Select::new().from("users").columns(&["id", "name"]),
        )
        .to_sql(&schema(), &settings(Dialect::DuckDb))
        .unwrap_err();
    assert!(matches!(err, Error::ForeignColumn { .. }));
}

#[test]
fn test_insert_same_column_through_two_paths_rejected() {
    let err = Insert::into("archive")
        .value("id", 1)
        .value("archive.id", 2)
        .value("name", "x")
        .to_sql(&schema(), &settings(Dialect::DuckDb))
        .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateColumn {
            table: "main.archive".into(),
            column: "id".into(),
        }
    );
}

#[test]
fn test_update_with_parameters() {
    let compiled = Update::table("users")
        .set("status", param("status"))
        .set("note", lit_null())
        .filter(col("id").eq(param("id")))
        .compile(&schema(), &settings(Dialect::TSql))
        .unwrap();

    assert_snapshot!(compiled.sql(), @"UPDATE [users] SET [status] = @status, [note] = NULL WHERE [users].[id] = @id");
    let types: Vec<Option<DataType>> = compiled.parameters().iter().map(|p| p.data_type).collect();
    assert_eq!(types, vec![Some(DataType::Varchar), Some(DataType::Integer)]);
}

#[test]
fn test_update_filter_batch() {
    let sql = Update::table("users")
        .set("status", "active")
        .filter_all(vec![
            col("status").eq("new").or(col("status").eq("old")),
            col("note").is_null(),
        ])
        .to_sql(&schema(), &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"UPDATE "users" SET "status" = 'active' WHERE ("users"."status" = 'new' OR "users"."status" = 'old') AND "users"."note" IS NULL"#);
}

#[test]
fn test_delete() {
    let schema = schema();
    let all = Delete::from("users")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(all, @r#"DELETE FROM "users""#);

    let archived = Delete::from("users")
        .filter(col("id").in_subquery(Select::new().from("archive").columns(&["id"])))
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap();
    assert_snapshot!(archived, @"DELETE FROM `users` WHERE `users`.`id` IN (SELECT `archive`.`id` FROM `archive`)");
}

#[test]
fn test_statement_dispatch_and_traversal() {
    let schema = schema();
    let statement = Statement::from(
        Insert::into("users")
            .value("name", param("name"))
            .value("note", param("note")),
    );
    assert_eq!(statement.kind(), StatementKind::Insert);
    assert_eq!(statement.kind().to_string(), "INSERT");

    let mut resolver = Resolver::new(&schema, Default::default());
    let mut collector = ParameterCollector::default();
    statement.traverse(&mut collector, &mut resolver).unwrap();
    let names: Vec<&str> = collector
        .parameters
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["name", "note"]);
}
