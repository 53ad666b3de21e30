//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - Positional `$n` parameters
//! - `GENERATED BY DEFAULT AS IDENTITY` for auto-increment
//! - DROP ... CASCADE

use super::helpers;
use super::{SqlDialect, TypeSpec};
use crate::sql::token::TokenStream;
use crate::sql::types::DataType;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn format_parameter(&self, _name: &str, position: usize) -> String {
        helpers::parameter_dollar(position)
    }

    fn binds_per_occurrence(&self) -> bool {
        false
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_postgres(dt)
    }

    fn emit_auto_increment(&self) -> Option<TokenStream> {
        Some(helpers::emit_identity_postgres())
    }
}
