use insta::assert_snapshot;
use sqlweave::config::Settings;
use sqlweave::dialect::Dialect;
use sqlweave::expr::{col, max, subquery, ExprExt};
use sqlweave::query::Select;
use sqlweave::resolve::{AliasTarget, AliasVisibility, Resolver};
use sqlweave::schema::{Column, NodeId, Schema};
use sqlweave::sql::types::DataType;

fn schema() -> (Schema, NodeId, NodeId) {
    let mut schema = Schema::new("db");
    let ns = schema.add_namespace("main").unwrap();
    let employees = schema.add_table(ns, "Employees").unwrap();
    schema
        .add_column(employees, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_column(employees, "name", Column::new(DataType::Varchar))
        .unwrap();
    schema
        .add_column(employees, "deptId", Column::new(DataType::Integer))
        .unwrap();
    let departments = schema.add_table(ns, "Departments").unwrap();
    schema
        .add_column(departments, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_column(departments, "title", Column::new(DataType::Varchar))
        .unwrap();
    (schema, employees, departments)
}

fn correlated() -> Select {
    Select::new()
        .from_as("Employees", "e")
        .columns(&["e.name"])
        .filter(
            col("e.deptId").in_subquery(
                Select::new()
                    .from("Departments")
                    .columns(&["id"])
                    .filter(col("id").eq(col("e.deptId"))),
            ),
        )
}

#[test]
fn test_inherited_alias_visible_in_nested_scope() {
    let (schema, employees, departments) = schema();
    let mut r = Resolver::new(&schema, AliasVisibility::Inherit);
    r.push_scope(employees);
    r.set_alias("e", employees);

    let seen = r
        .scoped(departments, |r| {
            r.set_alias("d", departments);
            Ok(r.alias("e").copied())
        })
        .unwrap();
    assert_eq!(seen, Some(AliasTarget::Element(employees)));

    // The nested alias is gone once its scope is popped.
    assert_eq!(r.alias("d"), None);
    assert_eq!(r.depth(), 1);
}

#[test]
fn test_isolated_scope_hides_outer_aliases() {
    let (schema, employees, departments) = schema();
    let mut r = Resolver::new(&schema, AliasVisibility::Isolated);
    r.push_scope(employees);
    r.set_alias("e", employees);

    let seen = r
        .scoped(departments, |r| Ok(r.alias("e").copied()))
        .unwrap();
    assert_eq!(seen, None);
    assert_eq!(r.alias("e"), Some(&AliasTarget::Element(employees)));
}

#[test]
fn test_inner_alias_shadows_outer() {
    let (schema, employees, departments) = schema();
    let mut r = Resolver::new(&schema, AliasVisibility::Inherit);
    r.set_alias("t", employees);

    let inner = r
        .scoped(departments, |r| {
            r.set_alias("t", departments);
            r.find_table("t")
        })
        .unwrap();
    assert_eq!(inner, departments);
    assert_eq!(r.find_table("t").unwrap(), employees);
}

#[test]
fn test_nested_failures_leave_stack_balanced() {
    let (schema, employees, departments) = schema();
    let mut r = Resolver::new(&schema, AliasVisibility::Inherit);

    let result = r.scoped(employees, |r| {
        r.scoped(departments, |r| r.find_column("salary"))
    });
    assert!(result.unwrap_err().is_resolution());
    assert_eq!(r.depth(), 0);
    assert_eq!(r.pivot(), schema.root());
}

#[test]
fn test_correlated_subquery_with_inherited_aliases() {
    let (schema, ..) = schema();
    let sql = correlated()
        .to_sql(&schema, &Settings::for_dialect(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"SELECT "e"."name" FROM "Employees" AS "e" WHERE "e"."deptId" IN (SELECT "Departments"."id" FROM "Departments" WHERE "Departments"."id" = "e"."deptId")"#);
}

#[test]
fn test_outer_alias_does_not_qualify_subquery_over_same_table() {
    let (schema, ..) = schema();
    let select = Select::new()
        .from_as("Employees", "e")
        .columns(&["e.name"])
        .filter(col("e.id").eq(subquery(
            Select::new().from("Employees").column(max(col("id"))),
        )));
    let sql = select
        .to_sql(&schema, &Settings::for_dialect(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"SELECT "e"."name" FROM "Employees" AS "e" WHERE "e"."id" = (SELECT MAX("Employees"."id") FROM "Employees")"#);
}

#[test]
fn test_correlated_subquery_fails_with_isolated_aliases() {
    let (schema, ..) = schema();
    let settings =
        Settings::for_dialect(Dialect::Postgres).with_alias_visibility(AliasVisibility::Isolated);
    let err = correlated().to_sql(&schema, &settings).unwrap_err();
    assert!(err.is_resolution());
}

#[test]
fn test_subquery_alias_does_not_leak_into_outer_query() {
    let (schema, ..) = schema();
    let select = Select::new()
        .from("Employees")
        .columns(&["name"])
        .filter(
            col("deptId").in_subquery(
                Select::new()
                    .from_as("Departments", "d")
                    .columns(&["d.id"]),
            ),
        )
        .filter(col("d.title").is_not_null());
    let err = select
        .to_sql(&schema, &Settings::for_dialect(Dialect::DuckDb))
        .unwrap_err();
    assert!(err.is_resolution());
}
