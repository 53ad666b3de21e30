//! Relational schema model.
//!
//! The schema is a strict tree (Datasource → Namespace → Table/View →
//! Column/Constraint/Index) stored in an arena. Nodes are addressed by
//! [`NodeId`] handles; each node keeps a non-owning parent handle so ancestor
//! walks never need reference cycles.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::schema::{Column, Constraint, Schema};
//! use sqlweave::sql::types::DataType;
//!
//! let mut schema = Schema::new("app");
//! let hr = schema.add_namespace("hr")?;
//! let emp = schema.add_table(hr, "Employees")?;
//! schema.add_column(emp, "id", Column::new(DataType::Integer).not_null())?;
//! schema.add_constraint(emp, "pk_employees", Constraint::primary_key(["id"]))?;
//! assert_eq!(schema.path(emp), "hr.Employees");
//! ```

mod element;
mod snapshot;

pub use element::{
    Column, ColumnDefault, Constraint, ConstraintKind, Element, ElementKind, ForeignKey, Index,
    ReferentialAction, View,
};
pub use snapshot::{
    ColumnSnapshot, ConstraintSnapshot, IndexSnapshot, NamespaceSnapshot, SchemaSnapshot,
    SnapshotError, TableSnapshot, ViewSnapshot,
};

use std::fmt;

use crate::error::{Error, Result};

/// Stable handle to a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub element: Element,
}

/// Arena-backed schema tree. The root datasource is always node 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    nodes: Vec<Node>,
}

impl Schema {
    /// Create a schema with an empty datasource root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                name: name.into(),
                parent: None,
                children: Vec::new(),
                element: Element::Datasource,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn add_namespace(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.insert(self.root(), name.into(), Element::Namespace)
    }

    pub fn add_table(&mut self, namespace: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.insert(namespace, name.into(), Element::Table)
    }

    pub fn add_view(
        &mut self,
        namespace: NodeId,
        name: impl Into<String>,
        view: View,
    ) -> Result<NodeId> {
        self.insert(namespace, name.into(), Element::View(view))
    }

    pub fn add_column(
        &mut self,
        relation: NodeId,
        name: impl Into<String>,
        column: Column,
    ) -> Result<NodeId> {
        self.insert(relation, name.into(), Element::Column(column))
    }

    pub fn add_constraint(
        &mut self,
        table: NodeId,
        name: impl Into<String>,
        constraint: Constraint,
    ) -> Result<NodeId> {
        self.insert(table, name.into(), Element::Constraint(constraint))
    }

    pub fn add_index(
        &mut self,
        table: NodeId,
        name: impl Into<String>,
        index: Index,
    ) -> Result<NodeId> {
        self.insert(table, name.into(), Element::Index(index))
    }

    fn insert(&mut self, parent: NodeId, name: String, element: Element) -> Result<NodeId> {
        let parent_kind = self.kind(parent);
        let child_kind = element.kind();
        if !parent_kind.accepts(child_kind) {
            return Err(Error::InvalidParent {
                child: child_kind,
                parent: parent_kind,
            });
        }
        if name.is_empty() || name.contains('.') {
            return Err(Error::InvalidPath(name));
        }
        if self.child(parent, &name).is_some() {
            return Err(Error::DuplicateElement {
                parent: self.display_path(parent),
                name,
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent: Some(parent),
            children: Vec::new(),
            element,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Panics if `id` was not produced by this schema.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn kind(&self, id: NodeId) -> ElementKind {
        self.node(id).element.kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn children_of_kind(
        &self,
        id: NodeId,
        kind: ElementKind,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.kind(*c) == kind)
    }

    /// Child with the given name, of any kind.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.name(*c) == name)
    }

    /// Tables and views under a namespace.
    pub fn relations(&self, namespace: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(namespace)
            .iter()
            .copied()
            .filter(move |c| self.kind(*c).is_relation())
    }

    pub fn namespaces(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(self.root(), ElementKind::Namespace)
    }

    /// Every table in the schema, in declaration order.
    pub fn tables(&self) -> Vec<NodeId> {
        self.namespaces()
            .flat_map(|ns| self.children_of_kind(ns, ElementKind::Table))
            .collect()
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            schema: self,
            next: self.parent(id),
        }
    }

    /// `id` itself if it has `kind`, otherwise its nearest ancestor of that kind.
    pub fn enclosing(&self, id: NodeId, kind: ElementKind) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.kind(*n) == kind)
    }

    /// Table or view owning `id` (or `id` itself).
    pub fn relation_of(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.kind(*n).is_relation())
    }

    /// Enclosing table of `id` (views are not tables).
    pub fn table_of(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, ElementKind::Table)
    }

    pub fn namespace_of(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, ElementKind::Namespace)
    }

    /// Dot-joined names from the first namespace down to `id`.
    ///
    /// The datasource root has an empty path.
    pub fn path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|n| *n != self.root())
            .map(|n| self.name(n))
            .collect();
        names.reverse();
        names.join(".")
    }

    fn display_path(&self, id: NodeId) -> String {
        if id == self.root() {
            self.name(id).to_string()
        } else {
            self.path(id)
        }
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    pub fn column(&self, id: NodeId) -> Option<&Column> {
        match &self.node(id).element {
            Element::Column(c) => Some(c),
            _ => None,
        }
    }

    pub fn constraint(&self, id: NodeId) -> Option<&Constraint> {
        match &self.node(id).element {
            Element::Constraint(c) => Some(c),
            _ => None,
        }
    }

    pub fn index(&self, id: NodeId) -> Option<&Index> {
        match &self.node(id).element {
            Element::Index(i) => Some(i),
            _ => None,
        }
    }

    pub fn view(&self, id: NodeId) -> Option<&View> {
        match &self.node(id).element {
            Element::View(v) => Some(v),
            _ => None,
        }
    }

    /// Columns of a table or view in declaration order.
    pub fn columns_of(&self, relation: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(relation, ElementKind::Column)
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'s> {
    schema: &'s Schema,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.schema.parent(current);
        Some(current)
    }
}
