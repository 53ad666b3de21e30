//! Serializable snapshots of a schema tree.
//!
//! A snapshot mirrors the tree as nested documents (namespaces → tables and
//! views → columns, constraints, indexes). Exporting a schema that was itself
//! imported from a snapshot yields byte-identical JSON.

use serde::{Deserialize, Serialize};

use super::{Column, Constraint, Element, ElementKind, Index, NodeId, Schema, View};
use crate::error::Result;

/// A snapshot of an entire datasource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub name: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceSnapshot>,
}

/// A snapshot of one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSnapshot {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<ViewSnapshot>,
}

/// A snapshot of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexSnapshot>,
}

/// A snapshot of one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub name: String,
    #[serde(default)]
    pub view: View,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub name: String,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSnapshot {
    pub name: String,
    pub constraint: Constraint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    pub index: Index,
}

impl SchemaSnapshot {
    /// Capture the current state of `schema`.
    pub fn capture(schema: &Schema) -> Self {
        let namespaces = schema
            .namespaces()
            .map(|ns| NamespaceSnapshot {
                name: schema.name(ns).to_string(),
                tables: schema
                    .children_of_kind(ns, ElementKind::Table)
                    .map(|t| capture_table(schema, t))
                    .collect(),
                views: schema
                    .children_of_kind(ns, ElementKind::View)
                    .map(|v| ViewSnapshot {
                        name: schema.name(v).to_string(),
                        view: schema.view(v).cloned().unwrap_or_default(),
                        columns: capture_columns(schema, v),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: schema.name(schema.root()).to_string(),
            namespaces,
        }
    }

    /// Rebuild a schema tree from this snapshot.
    pub fn restore(&self) -> Result<Schema> {
        let mut schema = Schema::new(self.name.clone());
        for ns in &self.namespaces {
            let ns_id = schema.add_namespace(ns.name.clone())?;
            for table in &ns.tables {
                let t = schema.add_table(ns_id, table.name.clone())?;
                for c in &table.columns {
                    schema.add_column(t, c.name.clone(), c.column.clone())?;
                }
                for c in &table.constraints {
                    schema.add_constraint(t, c.name.clone(), c.constraint.clone())?;
                }
                for i in &table.indexes {
                    schema.add_index(t, i.name.clone(), i.index.clone())?;
                }
            }
            for view in &ns.views {
                let v = schema.add_view(ns_id, view.name.clone(), view.view.clone())?;
                for c in &view.columns {
                    schema.add_column(v, c.name.clone(), c.column.clone())?;
                }
            }
        }
        Ok(schema)
    }
}

fn capture_table(schema: &Schema, table: NodeId) -> TableSnapshot {
    let mut constraints = Vec::new();
    let mut indexes = Vec::new();
    for &child in schema.children(table) {
        match &schema.node(child).element {
            Element::Constraint(c) => constraints.push(ConstraintSnapshot {
                name: schema.name(child).to_string(),
                constraint: c.clone(),
            }),
            Element::Index(i) => indexes.push(IndexSnapshot {
                name: schema.name(child).to_string(),
                index: i.clone(),
            }),
            _ => {}
        }
    }

    TableSnapshot {
        name: schema.name(table).to_string(),
        columns: capture_columns(schema, table),
        constraints,
        indexes,
    }
}

fn capture_columns(schema: &Schema, relation: NodeId) -> Vec<ColumnSnapshot> {
    schema
        .columns_of(relation)
        .filter_map(|c| {
            schema.column(c).map(|column| ColumnSnapshot {
                name: schema.name(c).to_string(),
                column: column.clone(),
            })
        })
        .collect()
}

impl Schema {
    /// Export the schema as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&SchemaSnapshot::capture(self))
    }

    /// Import a schema from JSON produced by [`Schema::to_json`].
    pub fn from_json(json: &str) -> std::result::Result<Schema, SnapshotError> {
        let snapshot: SchemaSnapshot = serde_json::from_str(json)?;
        Ok(snapshot.restore()?)
    }
}

/// Failure while importing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to parse schema snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid schema snapshot: {0}")]
    Invalid(#[from] crate::error::Error),
}
