use sqlweave::error::Error;
use sqlweave::inspect::{DependencyInspector, DependencyOrder};
use sqlweave::schema::{Column, Constraint, Index, NodeId, Schema};
use sqlweave::sql::types::DataType;

/// shop: customers <- orders <- order_items -> products, plus an unrelated audit table.
struct Shop {
    schema: Schema,
    customers: NodeId,
    orders: NodeId,
    order_items: NodeId,
    products: NodeId,
    audit: NodeId,
}

fn id_table(schema: &mut Schema, ns: NodeId, name: &str) -> NodeId {
    let t = schema.add_table(ns, name).unwrap();
    schema
        .add_column(t, "id", Column::new(DataType::Integer).not_null())
        .unwrap();
    schema
        .add_constraint(t, format!("pk_{name}"), Constraint::primary_key(["id"]))
        .unwrap();
    t
}

fn shop() -> Shop {
    let mut schema = Schema::new("shop");
    let ns = schema.add_namespace("main").unwrap();

    let audit = id_table(&mut schema, ns, "audit");

    let order_items = id_table(&mut schema, ns, "order_items");
    schema
        .add_column(order_items, "order_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_column(order_items, "product_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(
            order_items,
            "fk_item_order",
            Constraint::foreign_key(["order_id"], "orders", ["id"]),
        )
        .unwrap();
    schema
        .add_constraint(
            order_items,
            "fk_item_product",
            Constraint::foreign_key(["product_id"], "products", ["id"]),
        )
        .unwrap();
    schema
        .add_index(order_items, "ix_item_order", Index::new(["order_id"]))
        .unwrap();

    let orders = id_table(&mut schema, ns, "orders");
    schema
        .add_column(orders, "customer_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(
            orders,
            "fk_order_customer",
            Constraint::foreign_key(["customer_id"], "customers", ["id"]),
        )
        .unwrap();

    let products = id_table(&mut schema, ns, "products");
    let customers = id_table(&mut schema, ns, "customers");

    Shop {
        schema,
        customers,
        orders,
        order_items,
        products,
        audit,
    }
}

#[test]
fn test_creation_order_follows_foreign_keys() {
    let s = shop();
    let mut inspector = DependencyInspector::new(&s.schema);

    let order = inspector.creation_order(&s.schema.tables()).unwrap();
    assert_eq!(
        order,
        vec![s.audit, s.products, s.customers, s.orders, s.order_items]
    );

    let drop = inspector.drop_order(&s.schema.tables()).unwrap();
    assert_eq!(
        drop,
        vec![s.order_items, s.orders, s.customers, s.products, s.audit]
    );
}

#[test]
fn test_transitive_dependency() {
    let s = shop();
    let mut inspector = DependencyInspector::new(&s.schema);

    assert!(inspector.depends_on(s.order_items, s.customers).unwrap());
    assert!(!inspector.depends_on(s.customers, s.order_items).unwrap());
    assert_eq!(
        inspector.dependency_compare(s.order_items, s.customers),
        Ok(DependencyOrder::After)
    );
    assert_eq!(
        inspector.dependency_compare(s.audit, s.products),
        Ok(DependencyOrder::Unordered)
    );
}

#[test]
fn test_index_depends_on_its_table_and_targets() {
    let s = shop();
    let mut inspector = DependencyInspector::new(&s.schema);
    let index = s.schema.child(s.order_items, "ix_item_order").unwrap();

    assert!(inspector.depends_on(index, s.order_items).unwrap());
    // Through the table's foreign key to orders.
    assert!(inspector.depends_on(index, s.orders).unwrap());
    assert!(!inspector.depends_on(s.order_items, index).unwrap());
}

#[test]
fn test_mutual_foreign_keys_are_a_cycle() {
    let mut schema = Schema::new("db");
    let ns = schema.add_namespace("main").unwrap();
    let a = id_table(&mut schema, ns, "a");
    let b = id_table(&mut schema, ns, "b");
    schema
        .add_column(a, "b_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_column(b, "a_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(a, "fk_a_b", Constraint::foreign_key(["b_id"], "b", ["id"]))
        .unwrap();
    schema
        .add_constraint(b, "fk_b_a", Constraint::foreign_key(["a_id"], "a", ["id"]))
        .unwrap();

    let mut inspector = DependencyInspector::new(&schema);
    let err = inspector.dependency_compare(a, b).unwrap_err();
    assert_eq!(
        err.to_string(),
        "reference cycle between main.a -> main.b -> main.a"
    );

    let err = inspector.creation_order(&[b, a]).unwrap_err();
    assert_eq!(
        err,
        Error::DependencyCycle(vec!["main.a".into(), "main.b".into()])
    );
}

#[test]
fn test_unresolvable_foreign_key_surfaces() {
    let mut schema = Schema::new("db");
    let ns = schema.add_namespace("main").unwrap();
    let t = id_table(&mut schema, ns, "t");
    schema
        .add_column(t, "x", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_constraint(t, "fk_x", Constraint::foreign_key(["x"], "missing", ["id"]))
        .unwrap();

    let mut inspector = DependencyInspector::new(&schema);
    let err = inspector.references(t).unwrap_err();
    assert!(err.is_resolution());
}
