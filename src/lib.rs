//! # sqlweave
//!
//! A schema-aware SQL statement compiler with multi-dialect output.
//!
//! ## Architecture
//!
//! Statements are built from dotted identifier paths and compiled against a
//! schema tree:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           Statement builders (Select, Insert, ...)       │
//! │        (unresolved paths, expressions, conditions)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Schema tree (namespaces, tables, columns)         │
//! │        + scoped aliases and lookup caches                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Typed token stream                      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │    SQL text + parameters + result columns                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`inspect::DependencyInspector`] answers the migration-side question of
//! which elements must be created before others.

pub mod config;
pub mod error;
pub mod inspect;
pub mod resolve;
pub mod schema;
pub mod sql;

pub use sql::ddl;
pub use sql::dialect;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{NamespaceQualification, Settings};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::error::{Error, Result};
    pub use crate::expr::{
        // Constructors
        avg,
        case_of,
        case_when,
        coalesce,
        col,
        count,
        count_distinct,
        count_star,
        current_timestamp,
        default_value,
        func,
        lit_bool,
        lit_float,
        lit_int,
        lit_null,
        lit_str,
        list,
        max,
        min,
        param,
        paren,
        raw_sql,
        star,
        subquery,
        sum,
        table,
        table_col,
        table_star,
        typed_param,
        // Types
        BinaryOperator,
        Expr,
        ExprExt,
        Literal,
        UnaryOperator,
    };
    pub use crate::inspect::{DependencyInspector, DependencyOrder};
    pub use crate::query::{JoinType, NullsOrder, OrderByExpr, Select, SelectItem, SortDir, TableRef};
    pub use crate::resolve::{AliasVisibility, Resolver};
    pub use crate::schema::{Column, ColumnDefault, Constraint, Index, NodeId, Schema, View};
    pub use crate::sql::ddl::{
        CreateIndex, CreateNamespace, CreateTable, CreateView, DropIndex, DropTable, DropView,
    };
    pub use crate::sql::dml::{Delete, Insert, Update};
    pub use crate::sql::statement::{CompiledStatement, Statement};
    pub use crate::sql::types::DataType;
}

pub use dialect::Dialect;
pub use error::{Error, Result};
pub use schema::Schema;
pub use sql::statement::{CompiledStatement, Statement};
