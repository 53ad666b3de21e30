//! DML (Data Manipulation Language) support.
//!
//! INSERT, UPDATE and DELETE builders. Each statement resolves its target
//! table first and renders everything else inside that table's scope.
//!
//! # Examples
//!
//! ```ignore
//! use sqlweave::sql::dml::{Insert, Update, Delete};
//! use sqlweave::sql::expr::{col, lit_str, lit_int, ExprExt};
//!
//! // INSERT
//! let insert = Insert::into("users")
//!     .value("name", lit_str("Alice"))
//!     .value("email", lit_str("alice@example.com"));
//!
//! // UPDATE
//! let update = Update::table("users")
//!     .set("status", lit_str("active"))
//!     .filter(col("id").eq(lit_int(1)));
//!
//! // DELETE
//! let delete = Delete::from("users")
//!     .filter(col("status").eq(lit_str("inactive")));
//! ```

use super::conditions::Conditions;
use super::context::RenderContext;
use super::ddl::default_token;
use super::dialect::SqlDialect;
use super::expr::{Expr, ExprVisitor};
use super::query::Select;
use super::statement::{CompiledStatement, Statement};
use super::token::{Token, TokenStream};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::resolve::Resolver;
use crate::schema::{NodeId, Schema};

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until compiled"]
pub struct Insert {
    pub table: String,
    pub values: Vec<(String, Expr)>,
    pub source: Option<(Vec<String>, Box<Select>)>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: &str) -> Self {
        Self {
            table: table.into(),
            values: Vec::new(),
            source: None,
        }
    }

    /// Set one column value. Setting the same column again replaces it.
    pub fn value(mut self, column: &str, value: impl Into<Expr>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.values.push((column.into(), value)),
        }
        self
    }

    /// Set several column values.
    pub fn values<'a, V: Into<Expr>>(self, pairs: impl IntoIterator<Item = (&'a str, V)>) -> Self {
        pairs
            .into_iter()
            .fold(self, |insert, (column, value)| insert.value(column, value))
    }

    /// Insert the rows of a SELECT into `columns`.
    pub fn from_select(mut self, columns: &[&str], query: Select) -> Self {
        self.source = Some((
            columns.iter().map(|c| c.to_string()).collect(),
            Box::new(query),
        ));
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = ctx.resolver_mut().find_table(&self.table)?;
        ctx.with_scope(table, |ctx| {
            ts.push(Token::Insert)
                .space()
                .push(Token::Into)
                .space()
                .push(ctx.table_token(table));

            if let Some((columns, query)) = &self.source {
                if columns.is_empty() {
                    return Err(no_values(ctx, table));
                }
                let resolved = ctx.owned_columns(table, columns)?;
                let schema = ctx.schema();
                let names: Vec<&str> = resolved.iter().map(|c| schema.name(*c)).collect();
                ts.space().ident_list(&names).space();
                return query.render(ts, ctx);
            }

            if self.values.is_empty() && ctx.dialect().supports_default_values() {
                ts.space()
                    .push(Token::Default)
                    .space()
                    .push(Token::Values);
                return Ok(());
            }

            let targets = ctx.owned_columns(table, self.values.iter().map(|(c, _)| c))?;
            let given: Vec<(NodeId, &Expr)> = targets
                .into_iter()
                .zip(self.values.iter().map(|(_, v)| v))
                .collect();

            let mut names = Vec::new();
            let mut values = TokenStream::new();
            let schema = ctx.schema();
            for column in schema.columns_of(table) {
                let Some(def) = schema.column(column) else {
                    continue;
                };
                let explicit = given.iter().find(|(id, _)| *id == column);
                if explicit.is_none() && def.auto_increment {
                    continue;
                }

                if !names.is_empty() {
                    values.comma().space();
                }
                names.push(schema.name(column));

                match explicit {
                    Some((_, value)) => value.render_hinted(&mut values, ctx, Some(def.data_type))?,
                    None if ctx.dialect().supports_default_keyword()
                        && (def.default.is_some() || def.nullable) =>
                    {
                        values.push(Token::Default);
                    }
                    None => match &def.default {
                        Some(default) => {
                            values.push(default_token(default));
                        }
                        None if def.nullable => {
                            values.push(Token::LitNull);
                        }
                        None => {
                            return Err(Error::MissingValue {
                                table: schema.path(table),
                                column: schema.name(column).to_string(),
                            })
                        }
                    },
                }
            }

            if names.is_empty() {
                return Err(no_values(ctx, table));
            }
            ts.space()
                .ident_list(names.as_slice())
                .space()
                .push(Token::Values)
                .space()
                .lparen()
                .append(&values)
                .rparen();
            Ok(())
        })
    }

    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        let table = resolver.find_table(&self.table)?;
        resolver.scoped(table, |resolver| {
            for (_, value) in &self.values {
                value.traverse(visitor, resolver)?;
            }
            if let Some((_, query)) = &self.source {
                query.traverse(visitor, resolver)?;
            }
            Ok(())
        })
    }
}

fn no_values(ctx: &RenderContext<'_>, table: NodeId) -> Error {
    Error::NoValues {
        table: ctx.schema().path(table),
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until compiled"]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub filter: Conditions,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: &str) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            filter: Conditions::new(),
        }
    }

    /// Add a SET assignment.
    pub fn set(mut self, column: &str, value: impl Into<Expr>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter.add([condition]);
        self
    }

    /// Add a batch of WHERE conditions.
    pub fn filter_all(mut self, conditions: Vec<Expr>) -> Self {
        self.filter.add(conditions);
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = ctx.resolver_mut().find_table(&self.table)?;
        ctx.with_scope(table, |ctx| {
            if self.assignments.is_empty() {
                return Err(no_values(ctx, table));
            }

            ts.push(Token::Update)
                .space()
                .push(ctx.table_token(table))
                .space()
                .push(Token::Set)
                .space();

            for (i, (column, value)) in self.assignments.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                let id = ctx.resolver_mut().find_column(column)?;
                let schema = ctx.schema();
                let data_type = schema.column(id).map(|c| c.data_type);
                ts.ident(schema.name(id)).space().push(Token::Eq).space();
                value.render_hinted(ts, ctx, data_type)?;
            }

            if !self.filter.is_empty() {
                ts.space().push(Token::Where).space();
                self.filter.render(ts, ctx)?;
            }
            Ok(())
        })
    }

    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        let table = resolver.find_table(&self.table)?;
        resolver.scoped(table, |resolver| {
            for (_, value) in &self.assignments {
                value.traverse(visitor, resolver)?;
            }
            self.filter.traverse(visitor, resolver)
        })
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until compiled"]
pub struct Delete {
    pub table: String,
    pub filter: Conditions,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: &str) -> Self {
        Self {
            table: table.into(),
            filter: Conditions::new(),
        }
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter.add([condition]);
        self
    }

    /// Add a batch of WHERE conditions.
    pub fn filter_all(mut self, conditions: Vec<Expr>) -> Self {
        self.filter.add(conditions);
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = ctx.resolver_mut().find_table(&self.table)?;
        ctx.with_scope(table, |ctx| {
            ts.push(Token::Delete)
                .space()
                .push(Token::From)
                .space()
                .push(ctx.table_token(table));

            if !self.filter.is_empty() {
                ts.space().push(Token::Where).space();
                self.filter.render(ts, ctx)?;
            }
            Ok(())
        })
    }

    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        let table = resolver.find_table(&self.table)?;
        resolver.scoped(table, |resolver| self.filter.traverse(visitor, resolver))
    }
}
