//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - BIT booleans (1/0)
//! - `@name` parameters
//! - OFFSET FETCH for pagination (requires ORDER BY)
//! - N'...' prefix for Unicode strings
//! - NVARCHAR needs an explicit length (MAX is spelled out by TEXT-like types)
//! - IDENTITY(1, 1) for auto-increment
//! - String concatenation with `+`
//! - No CREATE TABLE IF NOT EXISTS, no DROP ... CASCADE
//! - DROP INDEX requires `ON <table>`

use super::helpers;
use super::{SqlDialect, TypeSpec};
use crate::sql::token::TokenStream;
use crate::sql::types::DataType;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        // N prefix only when the literal is not plain ASCII
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_parameter(&self, name: &str, _position: usize) -> String {
        helpers::parameter_at(name)
    }

    fn binds_per_occurrence(&self) -> bool {
        false
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_tsql(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn supports_nulls_ordering(&self) -> bool {
        // T-SQL 2022+ supports NULLS FIRST/LAST, but older versions don't
        false
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_tsql(name)
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_tsql(dt)
    }

    fn emit_auto_increment(&self) -> Option<TokenStream> {
        Some(helpers::emit_identity_tsql())
    }

    fn supports_if_not_exists(&self) -> bool {
        false
    }

    fn supports_drop_cascade(&self) -> bool {
        false
    }

    fn drop_index_requires_table(&self) -> bool {
        true
    }
}
