//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};
use super::super::types::DataType;
use super::{LengthRule, TypeSpec};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with backslashes escaped as well (MySQL default SQL mode).
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// `$1`, `$2`, ... by position.
/// Used by: Postgres, DuckDB
pub fn parameter_dollar(position: usize) -> String {
    format!("${}", position)
}

/// `:name`.
/// Used by: SQLite
pub fn parameter_colon(name: &str) -> String {
    format!(":{}", name)
}

/// `@name`.
/// Used by: T-SQL
pub fn parameter_at(name: &str) -> String {
    format!("@{}", name)
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
///
/// `unbounded` is the LIMIT value emitted when only an offset is given, for
/// engines that reject a bare OFFSET.
pub fn emit_limit_offset_standard(
    limit: Option<u64>,
    offset: Option<u64>,
    unbounded: Option<&'static str>,
) -> TokenStream {
    let mut ts = TokenStream::new();

    match (limit, unbounded) {
        (Some(lim), _) => {
            ts.push(Token::Limit)
                .space()
                .push(Token::LitInt(lim as i64));
        }
        (None, Some(all)) if offset.is_some() => {
            ts.push(Token::Limit).space().push(Token::Keyword(all));
        }
        _ => {}
    }

    if let Some(off) = offset {
        if !ts.is_empty() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(Token::LitInt(off as i64));
    }

    ts
}

/// Emit OFFSET ... ROWS FETCH NEXT ... ROWS ONLY (T-SQL style).
/// Note: Requires ORDER BY clause in T-SQL
pub fn emit_limit_offset_tsql(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();
    if limit.is_none() && offset.is_none() {
        return ts;
    }

    let off = offset.unwrap_or(0);
    ts.push(Token::Offset)
        .space()
        .push(Token::LitInt(off as i64))
        .space()
        .push(Token::Rows);

    if let Some(lim) = limit {
        ts.space()
            .push(Token::Fetch)
            .space()
            .push(Token::Next)
            .space()
            .push(Token::LitInt(lim as i64))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for Postgres dialect.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("TO_CHAR"),
        "DATE_FORMAT" => Some("TO_CHAR"),
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for DuckDB dialect.
pub fn remap_function_duckdb(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "TO_CHAR" => Some("STRFTIME"),
        "DATE_FORMAT" => Some("STRFTIME"),
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for SQLite dialect.
pub fn remap_function_sqlite(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "TO_CHAR" => Some("STRFTIME"),
        "DATE_FORMAT" => Some("STRFTIME"),
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "SUBSTRING" => Some("SUBSTR"),
        "CHAR_LENGTH" => Some("LENGTH"),
        _ => None,
    }
}

/// Remap functions for MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("DATE_FORMAT"),
        "TO_CHAR" => Some("DATE_FORMAT"),
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "SUBSTR" => Some("SUBSTRING"),
        _ => None,
    }
}

/// Remap functions for T-SQL dialect.
pub fn remap_function_tsql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        "CHAR_LENGTH" => Some("LEN"),
        "SUBSTR" => Some("SUBSTRING"),
        "NOW" => Some("GETDATE"),
        "STRFTIME" => Some("FORMAT"),
        "TO_CHAR" => Some("FORMAT"),
        "DATE_FORMAT" => Some("FORMAT"),
        "NVL" => Some("ISNULL"),
        "IFNULL" => Some("ISNULL"),
        _ => None,
    }
}

// =============================================================================
// Type Names
// =============================================================================

/// Type names for ANSI/Postgres style.
pub fn type_spec_postgres(dt: DataType) -> TypeSpec {
    match dt {
        DataType::Bool => TypeSpec::plain("BOOLEAN"),
        DataType::TinyInt | DataType::SmallInt => TypeSpec::plain("SMALLINT"),
        DataType::Integer => TypeSpec::plain("INTEGER"),
        DataType::BigInt => TypeSpec::plain("BIGINT"),
        DataType::Real => TypeSpec::plain("REAL"),
        DataType::Double => TypeSpec::plain("DOUBLE PRECISION"),
        DataType::Decimal => TypeSpec::optional("NUMERIC"),
        DataType::Char => TypeSpec::optional("CHAR"),
        DataType::Varchar => TypeSpec::optional("VARCHAR"),
        DataType::Text | DataType::Enum => TypeSpec::plain("TEXT"),
        DataType::Binary => TypeSpec::plain("BYTEA"),
        DataType::Date => TypeSpec::plain("DATE"),
        DataType::Time => TypeSpec::plain("TIME"),
        DataType::Timestamp => TypeSpec::plain("TIMESTAMP"),
        DataType::TimestampTz => TypeSpec::plain("TIMESTAMPTZ"),
        DataType::Json => TypeSpec::plain("JSONB"),
        DataType::Uuid => TypeSpec::plain("UUID"),
    }
}

/// Type names for DuckDB.
pub fn type_spec_duckdb(dt: DataType) -> TypeSpec {
    match dt {
        DataType::TinyInt => TypeSpec::plain("TINYINT"),
        DataType::Double => TypeSpec::plain("DOUBLE"),
        DataType::Decimal => TypeSpec::optional("DECIMAL"),
        DataType::Binary => TypeSpec::plain("BLOB"),
        DataType::Json => TypeSpec::plain("JSON"),
        other => type_spec_postgres(other),
    }
}

/// Type names for MySQL.
pub fn type_spec_mysql(dt: DataType) -> TypeSpec {
    match dt {
        DataType::Bool => TypeSpec::plain("BOOLEAN"),
        DataType::TinyInt => TypeSpec::plain("TINYINT"),
        DataType::SmallInt => TypeSpec::plain("SMALLINT"),
        DataType::Integer => TypeSpec::plain("INT"),
        DataType::BigInt => TypeSpec::plain("BIGINT"),
        DataType::Real => TypeSpec::plain("FLOAT"),
        DataType::Double => TypeSpec::plain("DOUBLE"),
        DataType::Decimal => TypeSpec::optional("DECIMAL"),
        DataType::Char => TypeSpec::required("CHAR", Some(255)),
        DataType::Varchar => TypeSpec::required("VARCHAR", Some(65535)),
        DataType::Text => TypeSpec::plain("TEXT"),
        DataType::Binary => TypeSpec::plain("BLOB"),
        DataType::Date => TypeSpec::plain("DATE"),
        DataType::Time => TypeSpec::plain("TIME"),
        DataType::Timestamp => TypeSpec::plain("DATETIME"),
        DataType::TimestampTz => TypeSpec::plain("TIMESTAMP"),
        DataType::Json => TypeSpec::plain("JSON"),
        DataType::Uuid => TypeSpec::required("CHAR", Some(36)),
        DataType::Enum => TypeSpec::plain("ENUM"),
    }
}

/// Type names for SQLite: one per storage class, lengths never emitted.
pub fn type_spec_sqlite(dt: DataType) -> TypeSpec {
    let name = match dt {
        DataType::Bool
        | DataType::TinyInt
        | DataType::SmallInt
        | DataType::Integer
        | DataType::BigInt => "INTEGER",
        DataType::Real | DataType::Double => "REAL",
        DataType::Decimal => "NUMERIC",
        DataType::Binary => "BLOB",
        _ => "TEXT",
    };
    TypeSpec::plain(name)
}

/// Type names for T-SQL.
pub fn type_spec_tsql(dt: DataType) -> TypeSpec {
    match dt {
        DataType::Bool => TypeSpec::plain("BIT"),
        DataType::TinyInt => TypeSpec::plain("TINYINT"),
        DataType::SmallInt => TypeSpec::plain("SMALLINT"),
        DataType::Integer => TypeSpec::plain("INT"),
        DataType::BigInt => TypeSpec::plain("BIGINT"),
        DataType::Real => TypeSpec::plain("REAL"),
        DataType::Double => TypeSpec::plain("FLOAT"),
        DataType::Decimal => TypeSpec::optional("DECIMAL"),
        DataType::Char => TypeSpec::required("NCHAR", Some(4000)),
        DataType::Varchar | DataType::Enum => TypeSpec::required("NVARCHAR", None),
        DataType::Text | DataType::Json => TypeSpec::plain("NVARCHAR(MAX)"),
        DataType::Binary => TypeSpec::plain("VARBINARY(MAX)"),
        DataType::Date => TypeSpec::plain("DATE"),
        DataType::Time => TypeSpec::plain("TIME"),
        DataType::Timestamp => TypeSpec::plain("DATETIME2"),
        DataType::TimestampTz => TypeSpec::plain("DATETIMEOFFSET"),
        DataType::Uuid => TypeSpec::plain("UNIQUEIDENTIFIER"),
    }
}

impl TypeSpec {
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            length: LengthRule::None,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            length: LengthRule::Optional,
        }
    }

    pub const fn required(name: &'static str, max: Option<u32>) -> Self {
        Self {
            name,
            length: LengthRule::Required { max },
        }
    }
}

// =============================================================================
// Identity / Auto-Increment
// =============================================================================

/// Emit identity for Postgres.
pub fn emit_identity_postgres() -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Keyword("GENERATED BY DEFAULT AS IDENTITY"));
    ts
}

/// Emit identity for T-SQL (IDENTITY(1, 1)).
pub fn emit_identity_tsql() -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Keyword("IDENTITY"))
        .lparen()
        .push(Token::LitInt(1))
        .comma()
        .space()
        .push(Token::LitInt(1))
        .rparen();
    ts
}

/// Emit identity for MySQL (AUTO_INCREMENT).
pub fn emit_identity_mysql() -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Keyword("AUTO_INCREMENT"));
    ts
}

/// Emit identity for SQLite; only valid on an INTEGER PRIMARY KEY column.
pub fn emit_identity_sqlite() -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Primary)
        .space()
        .push(Token::Key)
        .space()
        .push(Token::Keyword("AUTOINCREMENT"));
    ts
}
