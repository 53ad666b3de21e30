//! DDL (Data Definition Language) support.
//!
//! DDL builders name an element that already exists in the schema and render
//! its definition: `CreateTable::new("hr.Employees")` emits every column and
//! table-level constraint of that table, in declaration order.
//!
//! # Examples
//!
//! ```ignore
//! use sqlweave::sql::ddl::{CreateTable, DropTable};
//!
//! let create = CreateTable::new("hr.Employees").if_not_exists();
//! let drop = DropTable::new("hr.Employees").if_exists();
//! ```

use super::context::RenderContext;
use super::dialect::{LengthRule, SqlDialect};
use super::expr::ExprVisitor;
use super::query::Select;
use super::statement::{CompiledStatement, Statement};
use super::token::{Token, TokenStream};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::resolve::Resolver;
use crate::schema::{
    Column, ColumnDefault, Constraint, ConstraintKind, ElementKind, NodeId, ReferentialAction,
    Schema,
};

/// Literal token for a stored column default.
pub(crate) fn default_token(default: &ColumnDefault) -> Token {
    match default {
        ColumnDefault::Null => Token::LitNull,
        ColumnDefault::Int(n) => Token::LitInt(*n),
        ColumnDefault::Float(f) => Token::LitFloat(*f),
        ColumnDefault::String(s) => Token::LitString(s.clone()),
        ColumnDefault::Bool(b) => Token::LitBool(*b),
        ColumnDefault::CurrentTimestamp => Token::Keyword("CURRENT_TIMESTAMP"),
        ColumnDefault::CurrentDate => Token::Keyword("CURRENT_DATE"),
        ColumnDefault::Expression(sql) => Token::Raw(sql.clone()),
    }
}

fn action_token(action: ReferentialAction) -> Token {
    match action {
        ReferentialAction::NoAction => Token::NoAction,
        ReferentialAction::Restrict => Token::Restrict,
        ReferentialAction::Cascade => Token::Cascade,
        ReferentialAction::SetNull => Token::SetNull,
        ReferentialAction::SetDefault => Token::SetDefault,
    }
}

/// Resolve `path` as a table-like element of exactly `kind`.
fn find_relation(ctx: &mut RenderContext<'_>, path: &str, kind: ElementKind) -> Result<NodeId> {
    let id = ctx.resolver_mut().find_table(path)?;
    let found = ctx.schema().kind(id);
    if found != kind {
        return Err(Error::WrongKind {
            expected: kind,
            found,
            path: path.to_string(),
        });
    }
    Ok(id)
}

/// Named child of `parent` with the given kind.
fn find_child(schema: &Schema, parent: NodeId, name: &str, kind: ElementKind) -> Result<NodeId> {
    schema
        .child(parent, name)
        .filter(|id| schema.kind(*id) == kind)
        .ok_or_else(|| Error::NotFound {
            kind,
            path: format!("{}.{}", schema.path(parent), name),
        })
}

fn if_not_exists(ts: &mut TokenStream) {
    ts.space()
        .push(Token::If)
        .space()
        .push(Token::Not)
        .space()
        .push(Token::Exists);
}

fn if_exists(ts: &mut TokenStream) {
    ts.space().push(Token::If).space().push(Token::Exists);
}

/// Resolve each column path against the current table scope and emit the
/// bare names as `(a, b)`.
fn column_list(ts: &mut TokenStream, ctx: &mut RenderContext<'_>, columns: &[String]) -> Result<()> {
    let table = ctx.resolver().pivot();
    let resolved = ctx.owned_columns(table, columns)?;
    let schema = ctx.schema();
    let names: Vec<&str> = resolved.iter().map(|c| schema.name(*c)).collect();
    ts.ident_list(&names);
    Ok(())
}

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE for a table of the schema.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct CreateTable {
    pub table: String,
    pub if_not_exists: bool,
}

impl CreateTable {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            if_not_exists: false,
        }
    }

    /// Add IF NOT EXISTS clause (skipped where unsupported).
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = find_relation(ctx, &self.table, ElementKind::Table)?;
        ctx.with_scope(table, |ctx| {
            let schema = ctx.schema();
            let dialect = ctx.dialect();

            ts.push(Token::Create).space().push(Token::Table);
            if self.if_not_exists && dialect.supports_if_not_exists() {
                if_not_exists(ts);
            }
            ts.space().push(ctx.table_token(table)).space().lparen();

            let identity: Vec<NodeId> = schema
                .columns_of(table)
                .filter(|c| schema.column(*c).is_some_and(|def| def.auto_increment))
                .collect();

            let mut first = true;
            for column in schema.columns_of(table) {
                let Some(def) = schema.column(column) else {
                    continue;
                };
                if !first {
                    ts.comma().space();
                }
                first = false;
                column_definition(ts, ctx, schema.name(column), def)?;
            }

            for constraint in schema.children_of_kind(table, ElementKind::Constraint) {
                let Some(def) = schema.constraint(constraint) else {
                    continue;
                };
                if dialect.auto_increment_implies_primary_key()
                    && def.kind == ConstraintKind::PrimaryKey
                    && !identity.is_empty()
                {
                    // The identity marker already declares the key.
                    let covers = identity.len() == 1
                        && def.columns.len() == 1
                        && def.columns[0] == schema.name(identity[0]);
                    if covers {
                        continue;
                    }
                    return Err(ctx.unsupported(format!(
                        "a primary key other than the auto-increment column on '{}'",
                        schema.path(table)
                    )));
                }
                if !first {
                    ts.comma().space();
                }
                first = false;
                constraint_definition(ts, ctx, schema.name(constraint), def)?;
            }

            ts.rparen();
            Ok(())
        })
    }
}

/// `name TYPE[(len[, scale])] [UNSIGNED] [NOT NULL] [DEFAULT v] [identity]`
fn column_definition(
    ts: &mut TokenStream,
    ctx: &RenderContext<'_>,
    name: &str,
    column: &Column,
) -> Result<()> {
    let dialect = ctx.dialect();
    let spec = dialect.type_spec(column.data_type);
    ts.ident(name).space().push(Token::Keyword(spec.name));

    if !column.enum_values.is_empty() && dialect.supports_enum_values() {
        ts.lparen();
        for (i, value) in column.enum_values.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::LitString(value.clone()));
        }
        ts.rparen();
    } else {
        let length = match spec.length {
            LengthRule::None => None,
            LengthRule::Optional => column.length,
            LengthRule::Required { max } => match column.length.or(max) {
                Some(length) => Some(length),
                None => {
                    return Err(Error::LengthRequired {
                        column: name.to_string(),
                        type_name: spec.name.to_string(),
                    })
                }
            },
        };
        if let Some(length) = length {
            ts.lparen().push(Token::LitInt(i64::from(length)));
            if let Some(scale) = column.scale {
                ts.comma().space().push(Token::LitInt(i64::from(scale)));
            }
            ts.rparen();
        }
    }

    if column.unsigned && dialect.supports_unsigned() {
        ts.space().push(Token::Unsigned);
    }
    if !column.nullable {
        ts.space().push(Token::Not).space().push(Token::Null);
    }

    if column.auto_increment {
        let marker = dialect
            .emit_auto_increment()
            .ok_or_else(|| ctx.unsupported("auto-increment columns"))?;
        ts.space().append(&marker);
    } else if let Some(default) = &column.default {
        ts.space()
            .push(Token::Default)
            .space()
            .push(default_token(default));
    }
    Ok(())
}

/// `CONSTRAINT name PRIMARY KEY (..)`, `UNIQUE (..)` or `FOREIGN KEY (..) REFERENCES ..`
fn constraint_definition(
    ts: &mut TokenStream,
    ctx: &mut RenderContext<'_>,
    name: &str,
    constraint: &Constraint,
) -> Result<()> {
    ts.push(Token::Constraint).space().ident(name).space();

    match &constraint.kind {
        ConstraintKind::PrimaryKey => {
            ts.push(Token::Primary).space().push(Token::Key).space();
            column_list(ts, ctx, &constraint.columns)?;
        }
        ConstraintKind::Unique => {
            ts.push(Token::Unique).space();
            column_list(ts, ctx, &constraint.columns)?;
        }
        ConstraintKind::ForeignKey(fk) => {
            ts.push(Token::Foreign).space().push(Token::Key).space();
            column_list(ts, ctx, &constraint.columns)?;

            let target = ctx.resolver_mut().find_table(&fk.target_table)?;
            ts.space()
                .push(Token::References)
                .space()
                .push(ctx.table_token(target))
                .space();
            ctx.with_scope(target, |ctx| column_list(ts, ctx, &fk.target_columns))?;

            if let Some(action) = fk.on_update {
                ts.space()
                    .push(Token::On)
                    .space()
                    .push(Token::Update)
                    .space()
                    .push(action_token(action));
            }
            if let Some(action) = fk.on_delete {
                ts.space()
                    .push(Token::On)
                    .space()
                    .push(Token::Delete)
                    .space()
                    .push(action_token(action));
            }
        }
    }
    Ok(())
}

// ============================================================================
// CREATE INDEX
// ============================================================================

/// CREATE INDEX for an index of the schema.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct CreateIndex {
    pub table: String,
    pub name: String,
    pub if_not_exists: bool,
}

impl CreateIndex {
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            if_not_exists: false,
        }
    }

    /// Add IF NOT EXISTS clause (skipped where unsupported).
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = find_relation(ctx, &self.table, ElementKind::Table)?;
        ctx.with_scope(table, |ctx| {
            let schema = ctx.schema();
            let id = find_child(schema, table, &self.name, ElementKind::Index)?;
            let Some(index) = schema.index(id) else {
                return Err(Error::NotFound {
                    kind: ElementKind::Index,
                    path: schema.path(id),
                });
            };

            ts.push(Token::Create);
            if index.unique {
                ts.space().push(Token::Unique);
            }
            ts.space().push(Token::Index);
            if self.if_not_exists && ctx.dialect().supports_if_not_exists() {
                if_not_exists(ts);
            }
            ts.space()
                .ident(&self.name)
                .space()
                .push(Token::On)
                .space()
                .push(ctx.table_token(table))
                .space();
            column_list(ts, ctx, &index.columns)
        })
    }
}

// ============================================================================
// CREATE NAMESPACE
// ============================================================================

/// CREATE SCHEMA / CREATE DATABASE for a namespace of the schema.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct CreateNamespace {
    pub namespace: String,
    pub if_not_exists: bool,
}

impl CreateNamespace {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.into(),
            if_not_exists: false,
        }
    }

    /// Add IF NOT EXISTS clause (skipped where unsupported).
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let namespace = ctx.resolver_mut().find_namespace(&self.namespace)?;
        let keyword = ctx
            .dialect()
            .namespace_keyword()
            .ok_or_else(|| ctx.unsupported("CREATE SCHEMA"))?;

        ts.push(Token::Create).space().push(Token::Keyword(keyword));
        if self.if_not_exists && ctx.dialect().supports_if_not_exists() {
            if_not_exists(ts);
        }
        ts.space().ident(ctx.schema().name(namespace));
        Ok(())
    }
}

// ============================================================================
// CREATE VIEW
// ============================================================================

/// CREATE VIEW for a view of the schema.
///
/// The body is the supplied query, or else the view's stored definition.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct CreateView {
    pub view: String,
    pub query: Option<Box<Select>>,
}

impl CreateView {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.into(),
            query: None,
        }
    }

    /// Use a query builder as the view body.
    pub fn as_select(mut self, query: Select) -> Self {
        self.query = Some(Box::new(query));
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let view = find_relation(ctx, &self.view, ElementKind::View)?;
        let schema = ctx.schema();

        ts.push(Token::Create)
            .space()
            .push(Token::View)
            .space()
            .push(ctx.table_token(view))
            .space()
            .push(Token::As)
            .space();

        match &self.query {
            Some(query) => {
                // The body resolves against the view's namespace, not the view itself.
                let namespace = schema.parent(view).unwrap_or_else(|| schema.root());
                let mut body = TokenStream::new();
                ctx.with_scope(namespace, |ctx| query.render(&mut body, ctx))?;
                ts.embed(body);
                Ok(())
            }
            None => match schema.view(view).and_then(|v| v.definition.as_ref()) {
                Some(definition) => {
                    ts.push(Token::Raw(definition.clone()));
                    Ok(())
                }
                None => Err(Error::MissingDefinition {
                    view: schema.path(view),
                }),
            },
        }
    }

    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        let Some(query) = &self.query else {
            return Ok(());
        };
        let view = resolver.find_table(&self.view)?;
        let schema = resolver.schema();
        let namespace = schema.parent(view).unwrap_or_else(|| schema.root());
        resolver.scoped(namespace, |resolver| query.traverse(visitor, resolver))
    }
}

// ============================================================================
// DROP TABLE / DROP VIEW
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct DropTable {
    pub table: String,
    pub if_exists: bool,
    pub cascade: bool,
}

impl DropTable {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
            cascade: false,
        }
    }

    /// Add IF EXISTS clause (skipped where unsupported).
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Add CASCADE; an error for dialects without it.
    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = find_relation(ctx, &self.table, ElementKind::Table)?;
        let dialect = ctx.dialect();
        if self.cascade && !dialect.supports_drop_cascade() {
            return Err(ctx.unsupported("DROP TABLE ... CASCADE"));
        }

        ts.push(Token::Drop).space().push(Token::Table);
        if self.if_exists && dialect.supports_if_exists() {
            if_exists(ts);
        }
        ts.space().push(ctx.table_token(table));
        if self.cascade {
            ts.space().push(Token::Cascade);
        }
        Ok(())
    }
}

/// DROP VIEW statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct DropView {
    pub view: String,
    pub if_exists: bool,
}

impl DropView {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.into(),
            if_exists: false,
        }
    }

    /// Add IF EXISTS clause (skipped where unsupported).
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let view = find_relation(ctx, &self.view, ElementKind::View)?;
        ts.push(Token::Drop).space().push(Token::View);
        if self.if_exists && ctx.dialect().supports_if_exists() {
            if_exists(ts);
        }
        ts.space().push(ctx.table_token(view));
        Ok(())
    }
}

// ============================================================================
// DROP INDEX
// ============================================================================

/// DROP INDEX statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until compiled"]
pub struct DropIndex {
    pub table: String,
    pub name: String,
    pub if_exists: bool,
}

impl DropIndex {
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            if_exists: false,
        }
    }

    /// Add IF EXISTS clause (skipped where unsupported).
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let table = find_relation(ctx, &self.table, ElementKind::Table)?;
        find_child(ctx.schema(), table, &self.name, ElementKind::Index)?;
        let dialect = ctx.dialect();

        ts.push(Token::Drop).space().push(Token::Index);
        if self.if_exists && dialect.supports_drop_index_if_exists() {
            if_exists(ts);
        }
        ts.space();

        if dialect.drop_index_requires_table() {
            ts.ident(&self.name)
                .space()
                .push(Token::On)
                .space()
                .push(ctx.table_token(table));
        } else {
            // Indexes live in the table's namespace.
            match ctx.table_token(table) {
                Token::QualifiedIdent(mut parts) => {
                    parts.pop();
                    parts.push(self.name.clone());
                    ts.push(Token::QualifiedIdent(parts));
                }
                _ => {
                    ts.ident(&self.name);
                }
            }
        }
        Ok(())
    }
}
