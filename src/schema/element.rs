//! Kind-specific properties of schema elements.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sql::types::DataType;

/// Discriminant of a schema element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Datasource,
    Namespace,
    Table,
    View,
    Column,
    Constraint,
    Index,
}

impl ElementKind {
    /// Whether a child of kind `child` may be attached under this kind.
    pub fn accepts(self, child: ElementKind) -> bool {
        use ElementKind::*;
        matches!(
            (self, child),
            (Datasource, Namespace)
                | (Namespace, Table)
                | (Namespace, View)
                | (Table, Column)
                | (Table, Constraint)
                | (Table, Index)
                | (View, Column)
        )
    }

    /// Tables and views both own columns.
    pub fn is_relation(self) -> bool {
        matches!(self, ElementKind::Table | ElementKind::View)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Datasource => "datasource",
            ElementKind::Namespace => "namespace",
            ElementKind::Table => "table",
            ElementKind::View => "view",
            ElementKind::Column => "column",
            ElementKind::Constraint => "constraint",
            ElementKind::Index => "index",
        };
        write!(f, "{}", s)
    }
}

/// Element payload stored in an arena node.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Datasource,
    Namespace,
    Table,
    View(View),
    Column(Column),
    Constraint(Constraint),
    Index(Index),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Datasource => ElementKind::Datasource,
            Element::Namespace => ElementKind::Namespace,
            Element::Table => ElementKind::Table,
            Element::View(_) => ElementKind::View,
            Element::Column(_) => ElementKind::Column,
            Element::Constraint(_) => ElementKind::Constraint,
            Element::Index(_) => ElementKind::Index,
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Stored default value of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    CurrentTimestamp,
    CurrentDate,
    /// Engine expression emitted verbatim.
    Expression(String),
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until added to a schema"]
pub struct Column {
    pub data_type: DataType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unsigned: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_increment: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

fn default_nullable() -> bool {
    true
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Column {
    /// A nullable column of the given type.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: true,
            default: None,
            length: None,
            scale: None,
            unsigned: false,
            auto_increment: false,
            enum_values: Vec::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Precision and scale for decimal columns.
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.length = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Auto-increment columns are implicitly NOT NULL.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.nullable = false;
        self
    }

    pub fn enum_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Whether an INSERT may omit this column.
    pub fn has_implicit_value(&self) -> bool {
        self.auto_increment || self.default.is_some() || self.nullable
    }
}

// ============================================================================
// Constraints and indexes
// ============================================================================

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// Foreign key target and actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Dotted path of the referenced table, resolved relative to the owning table.
    pub target_table: String,
    pub target_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
}

/// Kind of table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey(ForeignKey),
}

/// Table-level constraint over an ordered column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until added to a schema"]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
}

impl Constraint {
    pub fn primary_key(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: ConstraintKind::PrimaryKey,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unique(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: ConstraintKind::Unique,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn foreign_key(
        columns: impl IntoIterator<Item = impl Into<String>>,
        target_table: impl Into<String>,
        target_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            kind: ConstraintKind::ForeignKey(ForeignKey {
                target_table: target_table.into(),
                target_columns: target_columns.into_iter().map(Into::into).collect(),
                on_update: None,
                on_delete: None,
            }),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Set ON UPDATE; no effect on non-foreign-key constraints.
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        if let ConstraintKind::ForeignKey(fk) = &mut self.kind {
            fk.on_update = Some(action);
        }
        self
    }

    /// Set ON DELETE; no effect on non-foreign-key constraints.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let ConstraintKind::ForeignKey(fk) = &mut self.kind {
            fk.on_delete = Some(action);
        }
        self
    }

    pub fn foreign_key_target(&self) -> Option<&ForeignKey> {
        match &self.kind {
            ConstraintKind::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }
}

/// Secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until added to a schema"]
pub struct Index {
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
}

impl Index {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// View definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Engine-specific SELECT text, used when no query builder is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(definition: impl Into<String>) -> Self {
        Self {
            definition: Some(definition.into()),
        }
    }
}
