//! SQLite SQL dialect.
//!
//! SQLite differences from ANSI:
//! - Dynamic typing: one type name per storage class, lengths ignored
//! - Booleans are integers (1/0)
//! - `:name` parameters
//! - OFFSET requires LIMIT (`LIMIT -1` means unbounded)
//! - No DEFAULT keyword inside VALUES
//! - Result-column aliases visible in WHERE
//! - `INTEGER PRIMARY KEY AUTOINCREMENT` declares the key inline
//! - No CREATE SCHEMA (attached databases instead), no DROP ... CASCADE

use super::helpers;
use super::{SqlDialect, TypeSpec};
use crate::sql::token::TokenStream;
use crate::sql::types::DataType;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_parameter(&self, name: &str, _position: usize) -> String {
        helpers::parameter_colon(name)
    }

    fn binds_per_occurrence(&self) -> bool {
        false
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset, Some("-1"))
    }

    fn extended_alias_resolution(&self) -> bool {
        true
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlite(name)
    }

    fn supports_default_keyword(&self) -> bool {
        false
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_sqlite(dt)
    }

    fn emit_auto_increment(&self) -> Option<TokenStream> {
        Some(helpers::emit_identity_sqlite())
    }

    fn auto_increment_implies_primary_key(&self) -> bool {
        true
    }

    fn namespace_keyword(&self) -> Option<&'static str> {
        None
    }

    fn supports_drop_cascade(&self) -> bool {
        false
    }
}
