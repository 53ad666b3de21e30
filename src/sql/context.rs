//! Rendering context shared by every statement and expression.
//!
//! Bundles the structure resolver, the target dialect, rendering settings,
//! declared parameter types and the result columns of the top-level SELECT.

use std::collections::HashMap;

use super::dialect::{Dialect, SqlDialect};
use super::statement::{Parameter, ResultColumn};
use super::token::{Token, TokenStream};
use super::types::DataType;
use crate::config::{NamespaceQualification, Settings};
use crate::error::{Error, Result};
use crate::resolve::Resolver;
use crate::schema::{NodeId, Schema};

/// State threaded through one compilation.
#[derive(Debug)]
pub struct RenderContext<'s> {
    resolver: Resolver<'s>,
    dialect: Dialect,
    qualification: NamespaceQualification,
    parameter_types: HashMap<String, Option<DataType>>,
    result_columns: Vec<ResultColumn>,
}

impl<'s> RenderContext<'s> {
    pub fn new(schema: &'s Schema, settings: &Settings) -> Self {
        Self {
            resolver: Resolver::new(schema, settings.resolver.alias_visibility),
            dialect: settings.dialect,
            qualification: settings.render.namespace_qualification,
            parameter_types: HashMap::new(),
            result_columns: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn schema(&self) -> &'s Schema {
        self.resolver.schema()
    }

    pub fn resolver(&self) -> &Resolver<'s> {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut Resolver<'s> {
        &mut self.resolver
    }

    /// Run `f` with the resolver pivoted on `pivot`; the scope is popped on every exit path.
    pub fn with_scope<T>(
        &mut self,
        pivot: NodeId,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.resolver.push_scope(pivot);
        let result = f(self);
        self.resolver.pop_scope();
        result
    }

    /// True while rendering inside another statement's scope.
    pub fn is_nested(&self) -> bool {
        self.resolver.depth() > 0
    }

    pub fn unsupported(&self, feature: impl Into<String>) -> Error {
        Error::unsupported(self.dialect.name(), feature)
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    fn qualify_namespaces(&self) -> bool {
        match self.qualification {
            NamespaceQualification::Always => true,
            NamespaceQualification::Never => false,
            NamespaceQualification::Auto => self.schema().namespaces().nth(1).is_some(),
        }
    }

    /// Identifier of a table or view, namespace-qualified per the settings.
    pub fn table_token(&self, relation: NodeId) -> Token {
        let schema = self.schema();
        let name = schema.name(relation).to_string();
        match schema.parent(relation) {
            Some(ns) if self.qualify_namespaces() && ns != schema.root() => {
                Token::QualifiedIdent(vec![schema.name(ns).to_string(), name])
            }
            _ => Token::Ident(name),
        }
    }

    /// Qualifier used in front of a column of `relation`: its alias if one is
    /// visible, otherwise the table identifier.
    pub fn relation_qualifier(&self, relation: NodeId) -> Token {
        match self.resolver.alias_of(relation) {
            Some(alias) => Token::Ident(alias.to_string()),
            None => self.table_token(relation),
        }
    }

    /// `qualifier.column` for a resolved column node.
    pub fn column_tokens(&self, column: NodeId, ts: &mut TokenStream) {
        let schema = self.schema();
        if let Some(relation) = schema.relation_of(column).filter(|r| *r != column) {
            ts.push(self.relation_qualifier(relation)).push(Token::Dot);
        }
        ts.ident(schema.name(column));
    }

    /// Resolve `paths` to columns of `table`, in order.
    ///
    /// Fails when a path names a column of another relation or when two paths
    /// land on the same column.
    pub(crate) fn owned_columns<S: AsRef<str>>(
        &mut self,
        table: NodeId,
        paths: impl IntoIterator<Item = S>,
    ) -> Result<Vec<NodeId>> {
        let schema = self.schema();
        let mut columns = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let column = self.resolver.find_column(path)?;
            if schema.relation_of(column) != Some(table) {
                return Err(Error::ForeignColumn {
                    table: schema.path(table),
                    column: path.to_string(),
                });
            }
            if columns.contains(&column) {
                return Err(Error::DuplicateColumn {
                    table: schema.path(table),
                    column: schema.name(column).to_string(),
                });
            }
            columns.push(column);
        }
        Ok(columns)
    }

    // ------------------------------------------------------------------
    // Parameters and result columns
    // ------------------------------------------------------------------

    /// Record a parameter; a known type is never replaced by an unknown one.
    pub fn declare_parameter(&mut self, name: &str, data_type: Option<DataType>) {
        let entry = self.parameter_types.entry(name.to_string()).or_insert(None);
        if entry.is_none() {
            *entry = data_type;
        }
    }

    pub fn push_result_column(
        &mut self,
        name: String,
        column: Option<NodeId>,
        data_type: Option<DataType>,
    ) {
        let index = self.result_columns.len();
        self.result_columns.push(ResultColumn {
            index,
            name,
            column,
            data_type,
        });
    }

    /// Parameters in textual order of `tokens`, plus the recorded result columns.
    ///
    /// One entry per placeholder: repeated names are listed again when the
    /// dialect binds each occurrence separately.
    pub(crate) fn finish(self, tokens: &TokenStream) -> (Vec<Parameter>, Vec<ResultColumn>) {
        let names = if self.dialect.binds_per_occurrence() {
            tokens.parameter_occurrences()
        } else {
            tokens.parameters()
        };
        let parameters = names
            .into_iter()
            .map(|name| {
                let data_type = self.parameter_types.get(&name).copied().flatten();
                Parameter { name, data_type }
            })
            .collect();
        (parameters, self.result_columns)
    }
}
