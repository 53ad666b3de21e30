//! Structure dependency inspection.
//!
//! Decides which schema elements must exist before others so migration
//! statements can be sequenced: CREATE dependency-first, DROP dependency-last.
//!
//! Foreign key targets are dotted paths relative to the owning table; they are
//! followed with the same [`Resolver`] used for statement rendering.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::inspect::DependencyInspector;
//!
//! let mut inspector = DependencyInspector::new(&schema);
//! let order = inspector.creation_order(&schema.tables())?;
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::resolve::{AliasVisibility, Resolver};
use crate::schema::{ElementKind, NodeId, Schema};

/// Relative order of two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOrder {
    /// The first element must be created before the second.
    Before,
    /// The first element must be created after the second.
    After,
    /// No ordering is forced.
    Unordered,
}

/// Answers structural dependency questions over a read-only schema.
#[derive(Debug)]
pub struct DependencyInspector<'s> {
    schema: &'s Schema,
    resolver: Resolver<'s>,
}

impl<'s> DependencyInspector<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            resolver: Resolver::new(schema, AliasVisibility::default()),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// True iff walking `child`'s parent chain reaches `parent`.
    pub fn is_ancestor_of(&self, parent: NodeId, child: NodeId) -> bool {
        self.schema.ancestors(child).any(|a| a == parent)
    }

    /// Elements `element` points at.
    ///
    /// - foreign key: its target table, then the target columns
    /// - primary key, unique constraint, index: the columns it covers
    /// - table or view: the union of its foreign keys' references
    /// - column: the target columns of every foreign key it takes part in
    pub fn references(&mut self, element: NodeId) -> Result<Vec<NodeId>> {
        let schema = self.schema;
        let mut out = Vec::new();

        match schema.kind(element) {
            ElementKind::Constraint => {
                self.constraint_references(element, &mut out)?;
            }
            ElementKind::Index => {
                if let (Some(index), Some(table)) = (schema.index(element), schema.parent(element)) {
                    let columns = self.columns_in(table, &index.columns)?;
                    out.extend(columns);
                }
            }
            ElementKind::Table | ElementKind::View => {
                for constraint in schema.children_of_kind(element, ElementKind::Constraint) {
                    let is_fk = schema
                        .constraint(constraint)
                        .is_some_and(|c| c.foreign_key_target().is_some());
                    if is_fk {
                        self.constraint_references(constraint, &mut out)?;
                    }
                }
            }
            ElementKind::Column => {
                let Some(table) = schema.parent(element) else {
                    return Ok(out);
                };
                let name = schema.name(element);
                for constraint in schema.children_of_kind(table, ElementKind::Constraint) {
                    let Some(def) = schema.constraint(constraint) else {
                        continue;
                    };
                    let Some(fk) = def.foreign_key_target() else {
                        continue;
                    };
                    let Some(position) = def.columns.iter().position(|c| c == name) else {
                        continue;
                    };
                    let target = self
                        .resolver
                        .scoped(table, |r| r.find_table(&fk.target_table))?;
                    if let Some(target_column) = fk.target_columns.get(position) {
                        let column = self
                            .resolver
                            .scoped(target, |r| r.find_column(target_column))?;
                        push_unique(&mut out, column);
                    }
                }
            }
            ElementKind::Datasource | ElementKind::Namespace => {}
        }

        trace!(
            element = %schema.path(element),
            references = out.len(),
            "collected references"
        );
        Ok(out)
    }

    fn constraint_references(&mut self, constraint: NodeId, out: &mut Vec<NodeId>) -> Result<()> {
        let schema = self.schema;
        let (Some(def), Some(table)) = (schema.constraint(constraint), schema.parent(constraint))
        else {
            return Ok(());
        };
        match def.foreign_key_target() {
            Some(fk) => {
                let target = self
                    .resolver
                    .scoped(table, |r| r.find_table(&fk.target_table))?;
                push_unique(out, target);
                for column in self.columns_in(target, &fk.target_columns)? {
                    push_unique(out, column);
                }
            }
            None => {
                for column in self.columns_in(table, &def.columns)? {
                    push_unique(out, column);
                }
            }
        }
        Ok(())
    }

    fn columns_in(&mut self, table: NodeId, names: &[String]) -> Result<Vec<NodeId>> {
        self.resolver.scoped(table, |r| {
            names.iter().map(|name| r.find_column(name)).collect()
        })
    }

    /// True if `b` is an ancestor of `a`, or if `a` references `b` directly or
    /// through a chain of references. References back into `a` itself are
    /// ignored, so a self-referencing foreign key forces no ordering.
    pub fn depends_on(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        if a == b {
            return Ok(false);
        }
        if self.is_ancestor_of(b, a) {
            return Ok(true);
        }

        let mut visited = HashSet::from([a]);
        let mut stack = vec![a];
        while let Some(current) = stack.pop() {
            for reference in self.references(current)? {
                if reference == a || self.is_ancestor_of(a, reference) {
                    continue;
                }
                if reference == b || self.is_ancestor_of(b, reference) {
                    return Ok(true);
                }
                if visited.insert(reference) {
                    stack.push(reference);
                }
            }
        }
        Ok(false)
    }

    /// Comparator for sequencing CREATE statements.
    ///
    /// Mutual dependency is reported as [`Error::DependencyCycle`].
    pub fn dependency_compare(&mut self, a: NodeId, b: NodeId) -> Result<DependencyOrder> {
        let a_needs_b = self.depends_on(a, b)?;
        let b_needs_a = self.depends_on(b, a)?;
        match (a_needs_b, b_needs_a) {
            (true, true) => {
                let cycle = vec![self.schema.path(a), self.schema.path(b), self.schema.path(a)];
                warn!(cycle = %cycle.join(" -> "), "reference cycle between schema elements");
                Err(Error::DependencyCycle(cycle))
            }
            (true, false) => Ok(DependencyOrder::After),
            (false, true) => Ok(DependencyOrder::Before),
            (false, false) => Ok(DependencyOrder::Unordered),
        }
    }

    /// `elements` ordered so every element follows everything it depends on.
    ///
    /// Unordered elements keep their input order.
    pub fn creation_order(&mut self, elements: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut graph: DiGraph<NodeId, ()> = DiGraph::with_capacity(elements.len(), 0);
        let nodes: Vec<NodeIndex> = elements.iter().map(|e| graph.add_node(*e)).collect();

        for (i, a) in elements.iter().enumerate() {
            for (j, b) in elements.iter().enumerate() {
                if i != j && self.depends_on(*a, *b)? {
                    graph.add_edge(nodes[j], nodes[i], ());
                }
            }
        }

        if let Some(cycle) = tarjan_scc(&graph).into_iter().find(|scc| scc.len() > 1) {
            let mut paths: Vec<String> = cycle
                .iter()
                .map(|idx| self.schema.path(graph[*idx]))
                .collect();
            paths.sort();
            warn!(cycle = %paths.join(" -> "), "reference cycle between schema elements");
            return Err(Error::DependencyCycle(paths));
        }

        // Kahn's algorithm, always taking the earliest ready input position.
        let mut indegree: Vec<usize> = nodes
            .iter()
            .map(|n| graph.neighbors_directed(*n, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = indegree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(elements.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(elements[i]);
            for next in graph.neighbors_directed(nodes[i], Direction::Outgoing) {
                let j = next.index();
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }
        Ok(order)
    }

    /// Reverse of [`creation_order`](Self::creation_order): dependents first.
    pub fn drop_order(&mut self, elements: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut order = self.creation_order(elements)?;
        order.reverse();
        Ok(order)
    }
}

fn push_unique(out: &mut Vec<NodeId>, id: NodeId) {
    if !out.contains(&id) {
        out.push(id);
    }
}
