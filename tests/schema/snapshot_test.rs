use insta::assert_snapshot;
use sqlweave::config::Settings;
use sqlweave::ddl::CreateTable;
use sqlweave::dialect::Dialect;
use sqlweave::schema::{
    Column, ColumnDefault, Constraint, ElementKind, Index, ReferentialAction, Schema,
    SchemaSnapshot, SnapshotError, View,
};
use sqlweave::sql::types::DataType;

fn users() -> Schema {
    let mut schema = Schema::new("app");
    let ns = schema.add_namespace("main").unwrap();
    let t = schema.add_table(ns, "users").unwrap();
    schema
        .add_column(t, "id", Column::new(DataType::Integer).auto_increment())
        .unwrap();
    schema
        .add_column(t, "email", Column::new(DataType::Varchar).length(120).not_null())
        .unwrap();
    schema
        .add_constraint(t, "pk_users", Constraint::primary_key(["id"]))
        .unwrap();
    schema
        .add_index(t, "ux_email", Index::new(["email"]).unique())
        .unwrap();
    schema
}

#[test]
fn test_export_format() {
    let json = users().to_json().unwrap();
    assert_snapshot!(json, @r#"
    {
      "name": "app",
      "namespaces": [
        {
          "name": "main",
          "tables": [
            {
              "name": "users",
              "columns": [
                {
                  "name": "id",
                  "column": {
                    "data_type": "integer",
                    "nullable": false,
                    "auto_increment": true
                  }
                },
                {
                  "name": "email",
                  "column": {
                    "data_type": "varchar",
                    "nullable": false,
                    "length": 120
                  }
                }
              ],
              "constraints": [
                {
                  "name": "pk_users",
                  "constraint": {
                    "kind": "primary_key",
                    "columns": [
                      "id"
                    ]
                  }
                }
              ],
              "indexes": [
                {
                  "name": "ux_email",
                  "index": {
                    "columns": [
                      "email"
                    ],
                    "unique": true
                  }
                }
              ]
            }
          ]
        }
      ]
    }
    "#);
}

#[test]
fn test_reexport_is_byte_identical() {
    let mut schema = users();
    let ns = schema.namespaces().next().unwrap();
    let orders = schema.add_table(ns, "orders").unwrap();
    schema
        .add_column(orders, "user_id", Column::new(DataType::Integer))
        .unwrap();
    schema
        .add_column(
            orders,
            "total",
            Column::new(DataType::Decimal)
                .precision(12, 2)
                .default_value(ColumnDefault::Float(0.5)),
        )
        .unwrap();
    schema
        .add_constraint(
            orders,
            "fk_orders_user",
            Constraint::foreign_key(["user_id"], "users", ["id"])
                .on_update(ReferentialAction::Cascade)
                .on_delete(ReferentialAction::Restrict),
        )
        .unwrap();
    schema
        .add_view(ns, "big_orders", View::with_definition("SELECT 1"))
        .unwrap();

    let first = schema.to_json().unwrap();
    let restored = Schema::from_json(&first).unwrap();
    assert_eq!(restored, schema);
    assert_eq!(restored.to_json().unwrap(), first);
}

#[test]
fn test_import_applies_defaults() {
    let json = r#"{
        "name": "app",
        "namespaces": [{
            "name": "main",
            "tables": [{
                "name": "tags",
                "columns": [
                    {"name": "id", "column": {"data_type": "integer", "auto_increment": true, "nullable": false}},
                    {"name": "label", "column": {"data_type": "varchar", "length": 40}}
                ]
            }]
        }]
    }"#;
    let schema = Schema::from_json(json).unwrap();

    let tags = schema.tables()[0];
    assert_eq!(schema.kind(tags), ElementKind::Table);
    let label = schema.child(tags, "label").unwrap();
    assert!(schema.column(label).unwrap().nullable);

    let sql = CreateTable::new("tags")
        .to_sql(&schema, &Settings::for_dialect(Dialect::Postgres))
        .unwrap();
    assert_snapshot!(sql, @r#"CREATE TABLE "tags" ("id" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, "label" VARCHAR(40))"#);
}

#[test]
fn test_import_errors() {
    let err = Schema::from_json("{\"name\": 1}").unwrap_err();
    assert!(matches!(err, SnapshotError::Parse(_)));

    let snapshot = SchemaSnapshot::capture(&users());
    let mut doubled = snapshot.clone();
    doubled.namespaces.push(snapshot.namespaces[0].clone());
    assert!(doubled.restore().is_err());
}
