//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - ANSI identifier quoting (`"`)
//! - Positional `$n` parameters
//! - JSON and BLOB types
//! - No column-level auto-increment (uses sequences)

use super::helpers;
use super::{SqlDialect, TypeSpec};
use crate::sql::types::DataType;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
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
        helpers::remap_function_duckdb(name)
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_duckdb(dt)
    }

    // emit_auto_increment stays None: DuckDB needs a sequence instead
}
