//! Statement sum type and compilation results.
//!
//! Compiling consumes the builder: the resulting [`CompiledStatement`] holds
//! the frozen token stream, the rendered SQL, the ordered parameter list and,
//! for SELECT, the result columns.

use tracing::debug;

use super::context::RenderContext;
use super::ddl::{CreateIndex, CreateNamespace, CreateTable, CreateView, DropIndex, DropTable, DropView};
use super::dml::{Delete, Insert, Update};
use super::expr::ExprVisitor;
use super::query::Select;
use super::token::TokenStream;
use super::types::DataType;
use crate::config::Settings;
use crate::error::Result;
use crate::resolve::Resolver;
use crate::schema::{NodeId, Schema};

/// Any statement the compiler can render.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
    CreateIndex(CreateIndex),
    CreateNamespace(CreateNamespace),
    CreateView(CreateView),
    DropTable(DropTable),
    DropIndex(DropIndex),
    DropView(DropView),
}

/// Discriminant of a [`Statement`], for logging and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateIndex,
    CreateNamespace,
    CreateView,
    DropTable,
    DropIndex,
    DropView,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::CreateTable => "CREATE TABLE",
            StatementKind::CreateIndex => "CREATE INDEX",
            StatementKind::CreateNamespace => "CREATE NAMESPACE",
            StatementKind::CreateView => "CREATE VIEW",
            StatementKind::DropTable => "DROP TABLE",
            StatementKind::DropIndex => "DROP INDEX",
            StatementKind::DropView => "DROP VIEW",
        };
        write!(f, "{}", s)
    }
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
            Statement::CreateTable(_) => StatementKind::CreateTable,
            Statement::CreateIndex(_) => StatementKind::CreateIndex,
            Statement::CreateNamespace(_) => StatementKind::CreateNamespace,
            Statement::CreateView(_) => StatementKind::CreateView,
            Statement::DropTable(_) => StatementKind::DropTable,
            Statement::DropIndex(_) => StatementKind::DropIndex,
            Statement::DropView(_) => StatementKind::DropView,
        }
    }

    /// Append this statement's tokens.
    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        match self {
            Statement::Select(s) => s.render(ts, ctx),
            Statement::Insert(s) => s.render(ts, ctx),
            Statement::Update(s) => s.render(ts, ctx),
            Statement::Delete(s) => s.render(ts, ctx),
            Statement::CreateTable(s) => s.render(ts, ctx),
            Statement::CreateIndex(s) => s.render(ts, ctx),
            Statement::CreateNamespace(s) => s.render(ts, ctx),
            Statement::CreateView(s) => s.render(ts, ctx),
            Statement::DropTable(s) => s.render(ts, ctx),
            Statement::DropIndex(s) => s.render(ts, ctx),
            Statement::DropView(s) => s.render(ts, ctx),
        }
    }

    /// Visit every expression of the statement in pre-order, each inside the
    /// resolver scope it renders in. Statements without expressions visit nothing.
    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        match self {
            Statement::Select(s) => s.traverse(visitor, resolver),
            Statement::Insert(s) => s.traverse(visitor, resolver),
            Statement::Update(s) => s.traverse(visitor, resolver),
            Statement::Delete(s) => s.traverse(visitor, resolver),
            Statement::CreateView(s) => s.traverse(visitor, resolver),
            Statement::CreateTable(_)
            | Statement::CreateIndex(_)
            | Statement::CreateNamespace(_)
            | Statement::DropTable(_)
            | Statement::DropIndex(_)
            | Statement::DropView(_) => Ok(()),
        }
    }

    /// Render against `schema` for the dialect in `settings`.
    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        let kind = self.kind();
        let mut ctx = RenderContext::new(schema, settings);
        let mut tokens = TokenStream::new();
        self.render(&mut tokens, &mut ctx)?;

        let sql = tokens.serialize(settings.dialect);
        let (parameters, result_columns) = ctx.finish(&tokens);
        debug!(
            statement = %kind,
            dialect = %settings.dialect,
            parameters = parameters.len(),
            sql = %sql,
            "compiled statement"
        );

        Ok(CompiledStatement {
            kind,
            sql,
            tokens,
            parameters,
            result_columns,
        })
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }
}

macro_rules! impl_from_statement {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Statement {
                fn from(statement: $variant) -> Self {
                    Statement::$variant(statement)
                }
            }
        )*
    };
}

impl_from_statement!(
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateIndex,
    CreateNamespace,
    CreateView,
    DropTable,
    DropIndex,
    DropView,
);

/// A named parameter and its declared or inferred type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub data_type: Option<DataType>,
}

/// An output column of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub index: usize,
    pub name: String,
    /// Schema column the value comes from, if it is a plain column reference.
    pub column: Option<NodeId>,
    pub data_type: Option<DataType>,
}

/// Output of [`Statement::compile`].
#[derive(Debug, Clone)]
pub struct CompiledStatement {
    kind: StatementKind,
    sql: String,
    tokens: TokenStream,
    parameters: Vec<Parameter>,
    result_columns: Vec<ResultColumn>,
}

impl CompiledStatement {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Parameters in textual order, one entry per placeholder the dialect binds.
    ///
    /// Positional `?` dialects repeat a name each time it appears; numbered and
    /// named placeholders list each name once.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Result columns; empty for statements that return no rows.
    pub fn result_columns(&self) -> &[ResultColumn] {
        &self.result_columns
    }
}

impl std::fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
