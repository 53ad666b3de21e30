//! SQL generation module.
//!
//! Statements are built from unresolved dotted paths, then compiled against a
//! schema: every identifier is resolved, typed tokens are emitted, and the
//! stream is serialized once for the target dialect.
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`conditions`] - WHERE / HAVING / ON accumulation
//! - [`ddl`] - CREATE and DROP statements for schema elements
//! - [`dml`] - INSERT, UPDATE, DELETE
//! - [`statement`] - Statement sum type and compilation results
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod conditions;
pub mod context;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod statement;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use conditions::Conditions;
pub use context::RenderContext;
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, case_of, case_when, coalesce, col, count, count_distinct, count_star, current_timestamp,
    default_value, func, lit_bool, lit_float, lit_int, lit_null, lit_str, list, max, min, param,
    paren, raw_sql, star, subquery, sum, table, table_col, table_star, typed_param,
    BinaryOperator, ColumnCollector, Expr, ExprExt, ExprVisitor, Literal, ParameterCollector,
    SqlKeyword, UnaryOperator,
};
pub use query::{Join, JoinType, NullsOrder, OrderByExpr, Select, SelectItem, SortDir, TableRef};
pub use statement::{CompiledStatement, Parameter, ResultColumn, Statement, StatementKind};
pub use token::{Token, TokenStream};
pub use types::DataType;

// Re-export DDL types
pub use ddl::{CreateIndex, CreateNamespace, CreateTable, CreateView, DropIndex, DropTable, DropView};

// Re-export DML types
pub use dml::{Delete, Insert, Update};
