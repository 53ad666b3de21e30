use sqlweave::error::Error;
use sqlweave::resolve::{AliasTarget, AliasVisibility, Resolver};
use sqlweave::schema::{Column, ElementKind, NodeId, Schema, View};
use sqlweave::sql::types::DataType;

struct Company {
    schema: Schema,
    hr: NodeId,
    employees: NodeId,
    emp_name: NodeId,
    departments: NodeId,
    orders: NodeId,
    active: NodeId,
}

fn company() -> Company {
    let mut schema = Schema::new("company");
    let hr = schema.add_namespace("hr").unwrap();
    let employees = schema.add_table(hr, "Employees").unwrap();
    schema
        .add_column(employees, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    let emp_name = schema
        .add_column(employees, "name", Column::new(DataType::Varchar))
        .unwrap();
    let departments = schema.add_table(hr, "Departments").unwrap();
    schema
        .add_column(departments, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    let active = schema
        .add_view(hr, "ActiveEmployees", View::with_definition("SELECT 1"))
        .unwrap();

    let sales = schema.add_namespace("sales").unwrap();
    let orders = schema.add_table(sales, "Orders").unwrap();
    schema
        .add_column(orders, "id", Column::new(DataType::BigInt))
        .unwrap();

    Company {
        schema,
        hr,
        employees,
        emp_name,
        departments,
        orders,
        active,
    }
}

#[test]
fn test_fully_qualified_paths() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);

    assert_eq!(r.find_namespace("hr").unwrap(), c.hr);
    assert_eq!(r.find_table("hr.Employees").unwrap(), c.employees);
    assert_eq!(r.find_table("sales.Orders").unwrap(), c.orders);
    assert_eq!(r.find_column("hr.Employees.name").unwrap(), c.emp_name);
    assert_eq!(c.schema.path(c.emp_name), "hr.Employees.name");
}

#[test]
fn test_views_resolve_as_tables() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);
    assert_eq!(r.find_table("hr.ActiveEmployees").unwrap(), c.active);
    assert_eq!(c.schema.kind(c.active), ElementKind::View);
}

#[test]
fn test_unqualified_table_is_ambiguous_across_namespaces() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);

    let err = r.find_table("Employees").unwrap_err();
    assert_eq!(
        err,
        Error::Ambiguous {
            kind: ElementKind::Table,
            path: "Employees".into(),
            candidates: vec!["hr".into(), "sales".into()],
        }
    );
    assert!(err.is_resolution());
    assert_eq!(
        err.to_string(),
        "ambiguous table reference 'Employees' (candidates: hr, sales)"
    );
}

#[test]
fn test_namespace_pivot_resolves_relative_tables() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);

    let found = r
        .scoped(c.hr, |r| {
            Ok((r.find_table("Departments")?, r.find_column("Employees.name")?))
        })
        .unwrap();
    assert_eq!(found, (c.departments, c.emp_name));
}

#[test]
fn test_unqualified_column_under_namespace_is_ambiguous() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);

    // Only Employees has `name`, but hr holds three relations to pick from.
    let err = r.scoped(c.hr, |r| r.find_column("name")).unwrap_err();
    assert_eq!(
        err,
        Error::Ambiguous {
            kind: ElementKind::Column,
            path: "name".into(),
            candidates: vec![
                "hr.Employees".into(),
                "hr.Departments".into(),
                "hr.ActiveEmployees".into(),
            ],
        }
    );

    // A namespace with a single relation picks it.
    let sales = r.find_namespace("sales").unwrap();
    let id = r.scoped(sales, |r| r.find_column("id")).unwrap();
    assert_eq!(c.schema.relation_of(id), Some(c.orders));
}

#[test]
fn test_table_pivot_resolves_bare_columns() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);
    r.set_pivot(c.employees);

    assert_eq!(r.pivot(), c.employees);
    assert_eq!(r.find_column("name").unwrap(), c.emp_name);
    // The pivot itself is found by name and by path.
    assert_eq!(r.find_table("Employees").unwrap(), c.employees);
    assert_eq!(r.find_table("hr.Employees").unwrap(), c.employees);
}

#[test]
fn test_not_found_carries_the_attempted_path() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);

    assert_eq!(
        r.find_column("hr.Employees.salary"),
        Err(Error::NotFound {
            kind: ElementKind::Column,
            path: "hr.Employees.salary".into(),
        })
    );
    assert_eq!(
        r.find_namespace("finance"),
        Err(Error::NotFound {
            kind: ElementKind::Namespace,
            path: "finance".into(),
        })
    );
    assert_eq!(
        r.find_table("hr.Payroll").unwrap_err().to_string(),
        "table not found: 'hr.Payroll'"
    );
}

#[test]
fn test_alias_prefixed_column() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);
    r.set_alias("e", c.employees);

    assert_eq!(r.find_table("e").unwrap(), c.employees);
    assert_eq!(r.find_column("e.name").unwrap(), c.emp_name);
    assert_eq!(r.alias("e"), Some(&AliasTarget::Element(c.employees)));
    assert_eq!(r.alias_of(c.employees), Some("e"));
}

#[test]
fn test_derived_alias_is_not_an_element() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);
    r.set_derived_alias("total", Some(DataType::Decimal));

    assert_eq!(
        r.alias("total"),
        Some(&AliasTarget::Derived(Some(DataType::Decimal)))
    );
    assert!(r.is_alias("total"));
    assert!(r.find_table("total").is_err());
}

#[test]
fn test_repeated_lookups_are_stable() {
    let c = company();
    let mut r = Resolver::new(&c.schema, AliasVisibility::Inherit);
    let first = r.find_column("hr.Employees.name").unwrap();
    let second = r.find_column("hr.Employees.name").unwrap();
    assert_eq!(first, second);
}
