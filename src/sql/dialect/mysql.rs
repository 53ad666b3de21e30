//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - `||` is logical OR by default (use CONCAT())
//! - Backslash escapes inside string literals
//! - No DEFAULT VALUES (use `VALUES ()` or DEFAULT per column)
//! - OFFSET requires LIMIT
//! - No NULLS FIRST/LAST, no FULL OUTER JOIN
//! - UNSIGNED integers and inline ENUM('a', 'b') types
//! - DROP INDEX requires `ON <table>`

use super::helpers;
use super::{SqlDialect, TypeSpec};
use crate::sql::token::TokenStream;
use crate::sql::types::DataType;

/// Largest row count MySQL accepts, used as LIMIT for offset-only queries.
const UNBOUNDED_LIMIT: &str = "18446744073709551615";

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_backslash(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    // format_parameter uses the default `?`, one bind per occurrence

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset, Some(UNBOUNDED_LIMIT))
    }

    fn supports_concat_operator(&self) -> bool {
        // MySQL || is OR by default, use CONCAT() instead
        false
    }

    fn supports_full_outer_join(&self) -> bool {
        false
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mysql(name)
    }

    fn supports_default_values(&self) -> bool {
        false
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_mysql(dt)
    }

    fn emit_auto_increment(&self) -> Option<TokenStream> {
        Some(helpers::emit_identity_mysql())
    }

    fn supports_unsigned(&self) -> bool {
        true
    }

    fn supports_enum_values(&self) -> bool {
        true
    }

    fn namespace_keyword(&self) -> Option<&'static str> {
        // A MySQL schema is a database
        Some("DATABASE")
    }

    fn drop_index_requires_table(&self) -> bool {
        true
    }

    fn supports_drop_index_if_exists(&self) -> bool {
        false
    }
}
