//! Structure resolver.
//!
//! Maps dotted identifier paths (`column`, `table.column`,
//! `namespace.table.column`) to schema nodes relative to a *pivot*, the
//! element currently in scope. The resolver keeps a stack of scopes; each
//! scope owns its pivot, its alias table and a per-kind cache of successful
//! lookups keyed by the literal path.
//!
//! Nested statements (subqueries, view bodies, foreign key targets) run in a
//! pushed scope via [`Resolver::scoped`], which always pops on return, so a
//! failed resolution can never leave the stack unbalanced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::schema::{ElementKind, NodeId, Schema};
use crate::sql::types::DataType;

/// Whether aliases declared in an enclosing scope are visible in nested scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasVisibility {
    /// Outer aliases stay visible; aliases declared inside a nested scope
    /// disappear when it is popped.
    #[default]
    Inherit,
    /// A nested scope only sees its own aliases.
    Isolated,
}

/// What an alias stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    /// A table, view or column of the schema.
    Element(NodeId),
    /// A computed result column, with its inferred type if known.
    Derived(Option<DataType>),
}

#[derive(Debug)]
struct Scope {
    pivot: NodeId,
    /// Declaration order is kept so `alias_of` prefers the first alias.
    aliases: Vec<(String, AliasTarget)>,
    /// Tables and views this scope reads from (FROM and JOIN targets).
    relations: Vec<NodeId>,
    cache: HashMap<(ElementKind, String), NodeId>,
}

impl Scope {
    fn new(schema: &Schema, pivot: NodeId) -> Self {
        let mut scope = Self {
            pivot,
            aliases: Vec::new(),
            relations: Vec::new(),
            cache: HashMap::new(),
        };
        scope.seed(schema);
        scope
    }

    /// Cache the pivot and its ancestors by name and by full path.
    fn seed(&mut self, schema: &Schema) {
        self.cache.clear();
        for node in std::iter::once(self.pivot).chain(schema.ancestors(self.pivot)) {
            let Some(kind) = lookup_kind(schema.kind(node)) else {
                continue;
            };
            self.cache
                .insert((kind, schema.name(node).to_string()), node);
            self.cache.insert((kind, schema.path(node)), node);
        }
    }

    fn alias(&self, name: &str) -> Option<&AliasTarget> {
        self.aliases
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, target)| target)
    }
}

/// Cache bucket for a node kind; views share the table bucket.
fn lookup_kind(kind: ElementKind) -> Option<ElementKind> {
    match kind {
        ElementKind::Column => Some(ElementKind::Column),
        ElementKind::Table | ElementKind::View => Some(ElementKind::Table),
        ElementKind::Namespace => Some(ElementKind::Namespace),
        _ => None,
    }
}

/// Scope-aware path resolver over a read-only schema.
#[derive(Debug)]
pub struct Resolver<'s> {
    schema: &'s Schema,
    visibility: AliasVisibility,
    /// Never empty: index 0 is the root scope.
    scopes: Vec<Scope>,
}

impl<'s> Resolver<'s> {
    /// A resolver whose root scope is pivoted on the datasource.
    pub fn new(schema: &'s Schema, visibility: AliasVisibility) -> Self {
        Self {
            schema,
            visibility,
            scopes: vec![Scope::new(schema, schema.root())],
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn visibility(&self) -> AliasVisibility {
        self.visibility
    }

    pub fn pivot(&self) -> NodeId {
        self.current().pivot
    }

    /// Number of pushed scopes above the root scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    // ------------------------------------------------------------------
    // Pivot and scopes
    // ------------------------------------------------------------------

    /// Re-pivot the current scope, dropping its cache and aliases.
    pub fn set_pivot(&mut self, pivot: NodeId) {
        let schema = self.schema;
        let scope = self.current_mut();
        scope.pivot = pivot;
        scope.aliases.clear();
        scope.relations.clear();
        scope.seed(schema);
        trace!(pivot = %schema.path(pivot), "resolver pivot set");
    }

    pub fn push_scope(&mut self, pivot: NodeId) {
        self.scopes.push(Scope::new(self.schema, pivot));
        trace!(
            pivot = %self.schema.path(pivot),
            depth = self.depth(),
            "resolver scope pushed"
        );
    }

    /// Pop the innermost scope and return its pivot. The root scope is never popped.
    pub fn pop_scope(&mut self) -> Option<NodeId> {
        if self.scopes.len() == 1 {
            return None;
        }
        let scope = self.scopes.pop()?;
        trace!(depth = self.depth(), "resolver scope popped");
        Some(scope.pivot)
    }

    /// Run `f` inside a scope pivoted on `pivot`; the scope is popped on every exit path.
    pub fn scoped<T>(&mut self, pivot: NodeId, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.push_scope(pivot);
        let result = f(self);
        self.pop_scope();
        result
    }

    // ------------------------------------------------------------------
    // Aliases
    // ------------------------------------------------------------------

    /// Declare `name` as a local alias of a schema element in the current scope.
    pub fn set_alias(&mut self, name: impl Into<String>, element: NodeId) {
        self.declare(name.into(), AliasTarget::Element(element));
    }

    /// Declare `name` as a computed result column in the current scope.
    pub fn set_derived_alias(&mut self, name: impl Into<String>, data_type: Option<DataType>) {
        self.declare(name.into(), AliasTarget::Derived(data_type));
    }

    fn declare(&mut self, name: String, target: AliasTarget) {
        let aliases = &mut self.current_mut().aliases;
        match aliases.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = target,
            None => aliases.push((name, target)),
        }
    }

    /// Visible alias named `name`, innermost scope first.
    pub fn alias(&self, name: &str) -> Option<&AliasTarget> {
        match self.visibility {
            AliasVisibility::Inherit => self.scopes.iter().rev().find_map(|s| s.alias(name)),
            AliasVisibility::Isolated => self.current().alias(name),
        }
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.alias(name).is_some()
    }

    /// Record that the current scope reads from `relation`.
    ///
    /// A scope that reads a relation owns its columns: [`alias_of`](Self::alias_of)
    /// does not look past it, so an enclosing alias of the same table never
    /// qualifies the nested query's own columns.
    pub fn add_relation(&mut self, relation: NodeId) {
        let relations = &mut self.current_mut().relations;
        if !relations.contains(&relation) {
            relations.push(relation);
        }
    }

    /// Relations recorded in the current scope, in declaration order.
    pub fn relations(&self) -> &[NodeId] {
        &self.current().relations
    }

    /// First visible alias declared for `element`, searching outward until a
    /// scope that reads `element` itself.
    pub fn alias_of(&self, element: NodeId) -> Option<&str> {
        let visible: &[Scope] = match self.visibility {
            AliasVisibility::Inherit => &self.scopes,
            AliasVisibility::Isolated => std::slice::from_ref(self.current()),
        };
        for scope in visible.iter().rev() {
            let alias = scope
                .aliases
                .iter()
                .find(|(_, target)| *target == AliasTarget::Element(element));
            if let Some((name, _)) = alias {
                return Some(name.as_str());
            }
            if scope.relations.contains(&element) {
                return None;
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Resolve `column`, `table.column` or `namespace.table.column`.
    pub fn find_column(&mut self, path: &str) -> Result<NodeId> {
        self.find(ElementKind::Column, path)
    }

    /// Resolve `table` or `namespace.table` (tables and views).
    pub fn find_table(&mut self, path: &str) -> Result<NodeId> {
        self.find(ElementKind::Table, path)
    }

    /// Resolve a namespace by name.
    pub fn find_namespace(&mut self, path: &str) -> Result<NodeId> {
        self.find(ElementKind::Namespace, path)
    }

    fn find(&mut self, kind: ElementKind, path: &str) -> Result<NodeId> {
        let segments: Vec<&str> = path.split('.').collect();
        let max_segments = match kind {
            ElementKind::Column => 3,
            ElementKind::Table => 2,
            _ => 1,
        };
        if segments.iter().any(|s| s.is_empty()) || segments.len() > max_segments {
            return Err(Error::InvalidPath(path.to_string()));
        }

        let aliased = self.is_alias(segments[0]);
        if kind == ElementKind::Table && segments.len() == 1 {
            if let Some(AliasTarget::Element(id)) = self.alias(path) {
                if self.schema.kind(*id).is_relation() {
                    return Ok(*id);
                }
            }
        }

        let key = (kind, path.to_string());
        if let Some(&id) = self.current().cache.get(&key) {
            trace!(%kind, path, "resolver cache hit");
            return Ok(id);
        }
        trace!(%kind, path, "resolver cache miss");

        let (name, prefix) = match segments.split_last() {
            Some((name, prefix)) => (*name, prefix),
            None => return Err(Error::InvalidPath(path.to_string())),
        };
        let parent = if prefix.is_empty() {
            self.default_parent(kind, path)?
        } else {
            let prefix = prefix.join(".");
            match kind {
                ElementKind::Column => self.find_table(&prefix)?,
                _ => self.find_namespace(&prefix)?,
            }
        };

        let found = self
            .schema
            .children(parent)
            .iter()
            .copied()
            .find(|c| self.schema.name(*c) == name && lookup_kind(self.schema.kind(*c)) == Some(kind))
            .ok_or_else(|| Error::NotFound {
                kind,
                path: path.to_string(),
            })?;

        if !aliased {
            self.current_mut().cache.insert(key, found);
        }
        Ok(found)
    }

    /// Scope that an unqualified name of `kind` is looked up in.
    fn default_parent(&self, kind: ElementKind, path: &str) -> Result<NodeId> {
        match kind {
            ElementKind::Column => self.default_table(path),
            ElementKind::Table => self.default_namespace(path),
            _ => Ok(self.schema.root()),
        }
    }

    fn default_table(&self, path: &str) -> Result<NodeId> {
        let pivot = self.pivot();
        if let Some(relation) = self.schema.relation_of(pivot) {
            return Ok(relation);
        }
        let namespace = match self.schema.kind(pivot) {
            ElementKind::Namespace => pivot,
            _ => self.default_namespace(path)?,
        };
        let candidates: Vec<NodeId> = self.schema.relations(namespace).collect();
        self.single(ElementKind::Column, path, candidates)
    }

    fn default_namespace(&self, path: &str) -> Result<NodeId> {
        let pivot = self.pivot();
        if let Some(namespace) = self.schema.enclosing(pivot, ElementKind::Namespace) {
            return Ok(namespace);
        }
        let candidates: Vec<NodeId> = self.schema.namespaces().collect();
        self.single(ElementKind::Table, path, candidates)
    }

    fn single(&self, kind: ElementKind, path: &str, candidates: Vec<NodeId>) -> Result<NodeId> {
        match candidates.as_slice() {
            [only] => Ok(*only),
            [] => Err(Error::NotFound {
                kind,
                path: path.to_string(),
            }),
            many => Err(Error::Ambiguous {
                kind,
                path: path.to_string(),
                candidates: many.iter().map(|c| self.schema.path(*c)).collect(),
            }),
        }
    }
}
