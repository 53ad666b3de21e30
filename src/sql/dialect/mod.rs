//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (PG/DuckDB/SQLite), `` ` `` (MySQL), `[]` (T-SQL)
//! - Pagination: LIMIT/OFFSET vs OFFSET FETCH
//! - Boolean literals: true/false vs 1/0
//! - Parameter placeholders: `$1`, `?`, `:name`, `@name`
//! - Column type names and length rules
//! - And capability flags consulted by the statement builders
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```
//!
//! # Capability Matrix
//!
//! | Feature | PostgreSQL | MySQL | SQLite | DuckDB | SQL Server |
//! |---------|-----------|-------|--------|--------|------------|
//! | DEFAULT VALUES | ✓ | ❌ | ✓ | ✓ | ✓ |
//! | DEFAULT in VALUES | ✓ | ✓ | ❌ | ✓ | ✓ |
//! | NULLS FIRST/LAST | ✓ | ❌ | ✓ | ✓ | ❌ |
//! | FULL OUTER JOIN | ✓ | ❌ | ✓ | ✓ | ✓ |
//! | DROP ... CASCADE | ✓ | ✓ | ❌ | ✓ | ❌ |
//! | CREATE TABLE IF NOT EXISTS | ✓ | ✓ | ✓ | ✓ | ❌ |
//! | CREATE SCHEMA | ✓ | DATABASE | ❌ | ✓ | ✓ |
//! | Auto-increment | IDENTITY | AUTO_INCREMENT | AUTOINCREMENT | ❌ | IDENTITY |
//!
//! Legend: ✓ = supported, ❌ = not supported

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;
mod tsql;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use serde::{Deserialize, Serialize};

use super::token::TokenStream;
use super::types::DataType;

/// How a dialect type takes a length argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// Never emit a length.
    None,
    /// Emit the column length when present.
    Optional,
    /// A length must be emitted; `max` is used when the column has none.
    /// `max: None` means the type has no finite maximum to fall back to.
    Required { max: Option<u32> },
}

/// Dialect type name for an abstract data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: &'static str,
    pub length: LengthRule,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - PostgreSQL/DuckDB/SQLite: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - T-SQL: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    /// Override for Unicode prefix (T-SQL N'...').
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL/DuckDB: `true`/`false`
    /// - MySQL/SQLite/T-SQL: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    /// Placeholder for a named parameter at its 1-based first-appearance position.
    ///
    /// Defaults to the positional `?` placeholder.
    fn format_parameter(&self, name: &str, position: usize) -> String {
        let _ = (name, position);
        "?".into()
    }

    /// Whether each placeholder binds one value, so a parameter used twice
    /// must be supplied twice. True for the positional `?` default.
    fn binds_per_occurrence(&self) -> bool {
        true
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    ///
    /// - PostgreSQL/DuckDB/MySQL/SQLite: `LIMIT n OFFSET m` (default)
    /// - T-SQL: `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (override)
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset, None)
    }

    /// Whether this dialect requires ORDER BY for OFFSET/LIMIT.
    ///
    /// T-SQL requires ORDER BY when using OFFSET FETCH.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// String concatenation operator.
    ///
    /// - ANSI/PostgreSQL/DuckDB/SQLite: `||`
    /// - T-SQL: `+`
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Whether this dialect supports the `||` concat operator.
    ///
    /// MySQL uses `||` as logical OR by default.
    fn supports_concat_operator(&self) -> bool {
        true
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// Whether this dialect supports FULL OUTER JOIN.
    fn supports_full_outer_join(&self) -> bool {
        true
    }

    /// Whether this dialect supports NULLS FIRST/LAST in ORDER BY.
    fn supports_nulls_ordering(&self) -> bool {
        true
    }

    /// Whether result-column aliases are visible while FROM/JOIN/WHERE are
    /// rendered. When false they are registered after WHERE/HAVING.
    fn extended_alias_resolution(&self) -> bool {
        false
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    // =========================================================================
    // INSERT
    // =========================================================================

    /// Whether `INSERT INTO t DEFAULT VALUES` is accepted.
    fn supports_default_values(&self) -> bool {
        true
    }

    /// Whether the `DEFAULT` keyword may stand in for a value inside VALUES.
    fn supports_default_keyword(&self) -> bool {
        true
    }

    // =========================================================================
    // DDL Support
    // =========================================================================

    /// Type name and length rule for an abstract data type.
    fn type_spec(&self, dt: DataType) -> TypeSpec {
        helpers::type_spec_postgres(dt)
    }

    /// Auto-increment marker, or `None` when the dialect has no column-level form.
    fn emit_auto_increment(&self) -> Option<TokenStream> {
        None
    }

    /// Whether the auto-increment marker already declares the primary key.
    fn auto_increment_implies_primary_key(&self) -> bool {
        false
    }

    /// Whether integer columns accept UNSIGNED.
    fn supports_unsigned(&self) -> bool {
        false
    }

    /// Whether an enumerated-value list is emitted with the type name.
    fn supports_enum_values(&self) -> bool {
        false
    }

    /// Keyword used by CREATE for a namespace, `None` if namespaces can't be created.
    fn namespace_keyword(&self) -> Option<&'static str> {
        Some("SCHEMA")
    }

    /// Whether this dialect supports IF NOT EXISTS for CREATE statements.
    fn supports_if_not_exists(&self) -> bool {
        true
    }

    /// Whether this dialect supports IF EXISTS for DROP statements.
    fn supports_if_exists(&self) -> bool {
        true
    }

    /// Whether this dialect supports CASCADE on DROP TABLE.
    fn supports_drop_cascade(&self) -> bool {
        true
    }

    /// Whether DROP INDEX needs `ON <table>`.
    fn drop_index_requires_table(&self) -> bool {
        false
    }

    /// Whether DROP INDEX accepts IF EXISTS.
    fn supports_drop_index_if_exists(&self) -> bool {
        self.supports_if_exists()
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
    #[default]
    DuckDb,
    TSql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::Sqlite => &Sqlite,
            Dialect::DuckDb => &DuckDb,
            Dialect::TSql => &TSql,
        }
    }

    /// All dialects, in declaration order.
    pub fn all() -> [Dialect; 5] {
        [
            Dialect::Postgres,
            Dialect::MySql,
            Dialect::Sqlite,
            Dialect::DuckDb,
            Dialect::TSql,
        ]
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_parameter(&self, name: &str, position: usize) -> String {
        self.dialect().format_parameter(name, position)
    }

    fn binds_per_occurrence(&self) -> bool {
        self.dialect().binds_per_occurrence()
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        self.dialect().emit_limit_offset(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn concat_operator(&self) -> &'static str {
        self.dialect().concat_operator()
    }

    fn supports_concat_operator(&self) -> bool {
        self.dialect().supports_concat_operator()
    }

    fn supports_full_outer_join(&self) -> bool {
        self.dialect().supports_full_outer_join()
    }

    fn supports_nulls_ordering(&self) -> bool {
        self.dialect().supports_nulls_ordering()
    }

    fn extended_alias_resolution(&self) -> bool {
        self.dialect().extended_alias_resolution()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn supports_default_values(&self) -> bool {
        self.dialect().supports_default_values()
    }

    fn supports_default_keyword(&self) -> bool {
        self.dialect().supports_default_keyword()
    }

    fn type_spec(&self, dt: DataType) -> TypeSpec {
        self.dialect().type_spec(dt)
    }

    fn emit_auto_increment(&self) -> Option<TokenStream> {
        self.dialect().emit_auto_increment()
    }

    fn auto_increment_implies_primary_key(&self) -> bool {
        self.dialect().auto_increment_implies_primary_key()
    }

    fn supports_unsigned(&self) -> bool {
        self.dialect().supports_unsigned()
    }

    fn supports_enum_values(&self) -> bool {
        self.dialect().supports_enum_values()
    }

    fn namespace_keyword(&self) -> Option<&'static str> {
        self.dialect().namespace_keyword()
    }

    fn supports_if_not_exists(&self) -> bool {
        self.dialect().supports_if_not_exists()
    }

    fn supports_if_exists(&self) -> bool {
        self.dialect().supports_if_exists()
    }

    fn supports_drop_cascade(&self) -> bool {
        self.dialect().supports_drop_cascade()
    }

    fn drop_index_requires_table(&self) -> bool {
        self.dialect().drop_index_requires_table()
    }

    fn supports_drop_index_if_exists(&self) -> bool {
        self.dialect().supports_drop_index_if_exists()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
