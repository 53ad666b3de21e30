use insta::assert_snapshot;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlweave::config::{NamespaceQualification, Settings};
use sqlweave::ddl::{
    CreateIndex, CreateNamespace, CreateTable, CreateView, DropIndex, DropTable, DropView,
};
use sqlweave::dialect::Dialect;
use sqlweave::error::Error;
use sqlweave::expr::{col, ExprExt};
use sqlweave::query::Select;
use sqlweave::schema::{
    Column, ColumnDefault, Constraint, ElementKind, Index, ReferentialAction, Schema, View,
};
use sqlweave::sql::types::DataType;

fn schema() -> Schema {
    let mut schema = Schema::new("company");
    let hr = schema.add_namespace("hr").unwrap();

    let departments = schema.add_table(hr, "Departments").unwrap();
    schema
        .add_column(departments, "id", Column::new(DataType::Integer).auto_increment())
        .unwrap();
    schema
        .add_column(
            departments,
            "title",
            Column::new(DataType::Varchar).length(80).not_null(),
        )
        .unwrap();
    schema
        .add_constraint(departments, "pk_departments", Constraint::primary_key(["id"]))
        .unwrap();

    let employees = schema.add_table(hr, "Employees").unwrap();
    schema
        .add_column(employees, "id", Column::new(DataType::Integer).auto_increment())
        .unwrap();
    schema
        .add_column(
            employees,
            "name",
            Column::new(DataType::Varchar).length(100).not_null(),
        )
        .unwrap();
    schema
        .add_column(
            employees,
            "salary",
            Column::new(DataType::Decimal)
                .precision(10, 2)
                .default_value(ColumnDefault::Int(0)),
        )
        .unwrap();
    schema
        .add_column(employees, "deptId", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_column(employees, "managerId", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_column(
            employees,
            "status",
            Column::new(DataType::Enum)
                .enum_values(["active", "left"])
                .not_null()
                .default_value(ColumnDefault::String("active".into())),
        )
        .unwrap();
    schema
        .add_constraint(employees, "pk_employees", Constraint::primary_key(["id"]))
        .unwrap();
    schema
        .add_constraint(
            employees,
            "fk_emp_dept",
            Constraint::foreign_key(["deptId"], "Departments", ["id"])
                .on_delete(ReferentialAction::SetNull),
        )
        .unwrap();
    schema
        .add_constraint(
            employees,
            "fk_emp_manager",
            Constraint::foreign_key(["managerId"], "Employees", ["id"]),
        )
        .unwrap();
    schema
        .add_index(employees, "ix_emp_name", Index::new(["name"]))
        .unwrap();
    schema
        .add_index(
            employees,
            "ux_emp_dept_name",
            Index::new(["deptId", "name"]).unique(),
        )
        .unwrap();

    schema
        .add_view(
            hr,
            "ActiveEmployees",
            View::with_definition("SELECT id, name FROM hr.Employees WHERE status = 'active'"),
        )
        .unwrap();
    schema.add_view(hr, "Payroll", View::new()).unwrap();

    let broken = schema.add_table(hr, "Broken").unwrap();
    schema
        .add_column(broken, "ref", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(
            broken,
            "fk_broken",
            Constraint::foreign_key(["ref"], "Nowhere", ["id"]),
        )
        .unwrap();

    schema
}

fn settings(dialect: Dialect) -> Settings {
    Settings::for_dialect(dialect)
}

#[test]
fn test_create_table_postgres() {
    let sql = CreateTable::new("Employees")
        .to_sql(&schema(), &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"CREATE TABLE "Employees" ("id" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, "name" VARCHAR(100) NOT NULL, "salary" NUMERIC(10, 2) DEFAULT 0, "deptId" INTEGER, "managerId" INTEGER, "status" TEXT NOT NULL DEFAULT 'active', CONSTRAINT "pk_employees" PRIMARY KEY ("id"), CONSTRAINT "fk_emp_dept" FOREIGN KEY ("deptId") REFERENCES "Departments" ("id") ON DELETE SET NULL, CONSTRAINT "fk_emp_manager" FOREIGN KEY ("managerId") REFERENCES "Employees" ("id"))"#);
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).unwrap();
}

#[test]
fn test_create_table_mysql_enum_values() {
    let sql = CreateTable::new("Employees")
        .to_sql(&schema(), &settings(Dialect::MySql))
        .unwrap();
    assert_snapshot!(sql, @"CREATE TABLE `Employees` (`id` INT NOT NULL AUTO_INCREMENT, `name` VARCHAR(100) NOT NULL, `salary` DECIMAL(10, 2) DEFAULT 0, `deptId` INT, `managerId` INT, `status` ENUM('active', 'left') NOT NULL DEFAULT 'active', CONSTRAINT `pk_employees` PRIMARY KEY (`id`), CONSTRAINT `fk_emp_dept` FOREIGN KEY (`deptId`) REFERENCES `Departments` (`id`) ON DELETE SET NULL, CONSTRAINT `fk_emp_manager` FOREIGN KEY (`managerId`) REFERENCES `Employees` (`id`))");
}

#[test]
fn test_create_table_sqlite_folds_identity_key() {
    let sql = CreateTable::new("Employees")
        .to_sql(&schema(), &settings(Dialect::Sqlite))
        .unwrap();
    assert_snapshot!(sql, @r#"CREATE TABLE "Employees" ("id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, "name" TEXT NOT NULL, "salary" NUMERIC DEFAULT 0, "deptId" INTEGER, "managerId" INTEGER, "status" TEXT NOT NULL DEFAULT 'active', CONSTRAINT "fk_emp_dept" FOREIGN KEY ("deptId") REFERENCES "Departments" ("id") ON DELETE SET NULL, CONSTRAINT "fk_emp_manager" FOREIGN KEY ("managerId") REFERENCES "Employees" ("id"))"#);
}

#[test]
fn test_if_not_exists_skipped_where_unsupported() {
    let schema = schema();
    let postgres = CreateTable::new("Departments")
        .if_not_exists()
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(postgres, @r#"CREATE TABLE IF NOT EXISTS "Departments" ("id" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, "title" VARCHAR(80) NOT NULL, CONSTRAINT "pk_departments" PRIMARY KEY ("id"))"#);

    let tsql = CreateTable::new("Departments")
        .if_not_exists()
        .to_sql(&schema, &settings(Dialect::TSql))
        .unwrap();
    assert_snapshot!(tsql, @"CREATE TABLE [Departments] ([id] INT NOT NULL IDENTITY(1, 1), [title] NVARCHAR(80) NOT NULL, CONSTRAINT [pk_departments] PRIMARY KEY ([id]))");
}

#[test]
fn test_always_qualify_namespace() {
    let sql = CreateTable::new("Departments")
        .to_sql(
            &schema(),
            &settings(Dialect::Postgres).with_namespace_qualification(NamespaceQualification::Always),
        )
        .unwrap();
    assert_snapshot!(sql, @r#"CREATE TABLE "hr"."Departments" ("id" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, "title" VARCHAR(80) NOT NULL, CONSTRAINT "pk_departments" PRIMARY KEY ("id"))"#);
}

#[test]
fn test_create_table_errors() {
    let schema = schema();

    let err = CreateTable::new("Departments")
        .to_sql(&schema, &settings(Dialect::DuckDb))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "auto-increment columns is not supported by the duckdb dialect"
    );

    let err = CreateTable::new("Employees")
        .to_sql(&schema, &settings(Dialect::TSql))
        .unwrap_err();
    assert_eq!(
        err,
        Error::LengthRequired {
            column: "status".into(),
            type_name: "NVARCHAR".into(),
        }
    );

    let err = CreateTable::new("Broken")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap_err();
    assert_eq!(
        err,
        Error::NotFound {
            kind: ElementKind::Table,
            path: "Nowhere".into(),
        }
    );

    let err = CreateTable::new("ActiveEmployees")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap_err();
    assert_eq!(
        err,
        Error::WrongKind {
            expected: ElementKind::Table,
            found: ElementKind::View,
            path: "ActiveEmployees".into(),
        }
    );
}

#[test]
fn test_create_index() {
    let schema = schema();
    let unique = CreateIndex::new("Employees", "ux_emp_dept_name")
        .if_not_exists()
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(unique, @r#"CREATE UNIQUE INDEX IF NOT EXISTS "ux_emp_dept_name" ON "Employees" ("deptId", "name")"#);

    let plain = CreateIndex::new("Employees", "ix_emp_name")
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap();
    assert_snapshot!(plain, @"CREATE INDEX `ix_emp_name` ON `Employees` (`name`)");

    let err = CreateIndex::new("Employees", "ix_missing")
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap_err();
    assert_eq!(
        err,
        Error::NotFound {
            kind: ElementKind::Index,
            path: "hr.Employees.ix_missing".into(),
        }
    );
}

#[test]
fn test_qualified_column_paths_render_bare_names() {
    let mut schema = schema();
    let hr = schema.namespaces().next().unwrap();
    let employees = schema.child(hr, "Employees").unwrap();
    schema
        .add_index(
            employees,
            "ix_emp_pay",
            Index::new(["Employees.salary", "hr.Employees.name"]),
        )
        .unwrap();
    let teams = schema.add_table(hr, "Teams").unwrap();
    schema
        .add_column(teams, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_column(teams, "leadId", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(teams, "pk_teams", Constraint::primary_key(["Teams.id"]))
        .unwrap();
    schema
        .add_constraint(
            teams,
            "fk_team_lead",
            Constraint::foreign_key(["Teams.leadId"], "Employees", ["Employees.id"]),
        )
        .unwrap();

    let index = CreateIndex::new("Employees", "ix_emp_pay")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(index, @r#"CREATE INDEX "ix_emp_pay" ON "Employees" ("salary", "name")"#);

    let table = CreateTable::new("Teams")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(table, @r#"CREATE TABLE "Teams" ("id" INTEGER NOT NULL, "leadId" INTEGER, CONSTRAINT "pk_teams" PRIMARY KEY ("id"), CONSTRAINT "fk_team_lead" FOREIGN KEY ("leadId") REFERENCES "Employees" ("id"))"#);
    Parser::parse_sql(&PostgreSqlDialect {}, &table).unwrap();
}

#[test]
fn test_constraint_on_another_tables_column_rejected() {
    let mut schema = schema();
    let hr = schema.namespaces().next().unwrap();
    let teams = schema.add_table(hr, "Teams").unwrap();
    schema
        .add_column(teams, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_constraint(teams, "pk_teams", Constraint::primary_key(["Departments.id"]))
        .unwrap();

    let err = CreateTable::new("Teams")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap_err();
    assert_eq!(
        err,
        Error::ForeignColumn {
            table: "hr.Teams".into(),
            column: "Departments.id".into(),
        }
    );
}

#[test]
fn test_create_namespace() {
    let schema = schema();
    let postgres = CreateNamespace::new("hr")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(postgres, @r#"CREATE SCHEMA "hr""#);

    let mysql = CreateNamespace::new("hr")
        .if_not_exists()
        .to_sql(&schema, &settings(Dialect::MySql))
        .unwrap();
    assert_snapshot!(mysql, @"CREATE DATABASE IF NOT EXISTS `hr`");

    let err = CreateNamespace::new("hr")
        .to_sql(&schema, &settings(Dialect::Sqlite))
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported { dialect: "sqlite", .. }));
}

#[test]
fn test_create_view() {
    let schema = schema();
    let stored = CreateView::new("ActiveEmployees")
        .to_sql(&schema, &settings(Dialect::DuckDb))
        .unwrap();
    assert_snapshot!(stored, @r#"CREATE VIEW "ActiveEmployees" AS SELECT id, name FROM hr.Employees WHERE status = 'active'"#);

    let built = CreateView::new("Payroll")
        .as_select(
            Select::new()
                .from("Employees")
                .columns(&["name", "salary"])
                .filter(col("salary").gt(0)),
        )
        .compile(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(built.sql(), @r#"CREATE VIEW "Payroll" AS SELECT "Employees"."name", "Employees"."salary" FROM "Employees" WHERE "Employees"."salary" > 0"#);
    assert!(built.result_columns().is_empty());

    let err = CreateView::new("Payroll")
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap_err();
    assert_eq!(
        err,
        Error::MissingDefinition {
            view: "hr.Payroll".into()
        }
    );
}

#[test]
fn test_drop_table_and_view() {
    let schema = schema();
    let postgres = DropTable::new("Employees")
        .if_exists()
        .cascade()
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(postgres, @r#"DROP TABLE IF EXISTS "Employees" CASCADE"#);

    let tsql = DropTable::new("Employees")
        .if_exists()
        .to_sql(&schema, &settings(Dialect::TSql))
        .unwrap();
    assert_snapshot!(tsql, @"DROP TABLE IF EXISTS [Employees]");

    let err = DropTable::new("Employees")
        .cascade()
        .to_sql(&schema, &settings(Dialect::Sqlite))
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));

    let view = DropView::new("ActiveEmployees")
        .if_exists()
        .to_sql(&schema, &settings(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(view, @r#"DROP VIEW IF EXISTS "ActiveEmployees""#);
}

#[test]
fn test_drop_index_per_dialect() {
    let schema = schema();
    let drop = || DropIndex::new("Employees", "ix_emp_name").if_exists();

    assert_snapshot!(drop().to_sql(&schema, &settings(Dialect::TSql)).unwrap(), @"DROP INDEX IF EXISTS [ix_emp_name] ON [Employees]");
    assert_snapshot!(drop().to_sql(&schema, &settings(Dialect::MySql)).unwrap(), @"DROP INDEX `ix_emp_name` ON `Employees`");

    let qualified = drop()
        .to_sql(
            &schema,
            &settings(Dialect::Postgres).with_namespace_qualification(NamespaceQualification::Always),
        )
        .unwrap();
    assert_snapshot!(qualified, @r#"DROP INDEX IF EXISTS "hr"."ix_emp_name""#);
}
