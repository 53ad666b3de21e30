//! Abstract column data types.
//!
//! These are engine-neutral; each dialect maps them to a concrete type name
//! (and length rule) through [`SqlDialect::type_spec`](super::dialect::SqlDialect::type_spec).
//! Length, precision and enumerated values live on the schema column, not here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-neutral data type of a column or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Bool,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    /// Fixed precision; precision and scale come from the column.
    Decimal,
    Char,
    Varchar,
    Text,
    Binary,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Json,
    Uuid,
    /// String restricted to the column's enumerated values.
    Enum,
}

impl DataType {
    /// Parse a type name such as `bigint`, `varchar` or `timestamptz`.
    ///
    /// Any parenthesized suffix is ignored: `varchar(255)` parses as `Varchar`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let base = match s.find('(') {
            Some(i) => s[..i].trim_end(),
            None => s.as_str(),
        };

        Some(match base {
            "bool" | "boolean" | "bit" => DataType::Bool,
            "tinyint" | "int8" => DataType::TinyInt,
            "smallint" | "int16" | "int2" => DataType::SmallInt,
            "int" | "integer" | "int32" | "int4" => DataType::Integer,
            "bigint" | "int64" => DataType::BigInt,
            "real" | "float" | "float4" | "float32" => DataType::Real,
            "double" | "double precision" | "float8" | "float64" => DataType::Double,
            "decimal" | "numeric" => DataType::Decimal,
            "char" | "character" | "nchar" => DataType::Char,
            "varchar" | "character varying" | "nvarchar" => DataType::Varchar,
            "text" | "string" | "clob" => DataType::Text,
            "binary" | "blob" | "bytea" | "varbinary" => DataType::Binary,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "timestamp" | "datetime" | "datetime2" => DataType::Timestamp,
            "timestamptz" | "timestamp with time zone" | "datetimeoffset" => DataType::TimestampTz,
            "json" | "jsonb" => DataType::Json,
            "uuid" | "guid" | "uniqueidentifier" => DataType::Uuid,
            "enum" => DataType::Enum,
            _ => return None,
        })
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, DataType::Real | DataType::Double | DataType::Decimal)
    }

    pub fn is_textual(self) -> bool {
        matches!(
            self,
            DataType::Char | DataType::Varchar | DataType::Text | DataType::Enum
        )
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::Time | DataType::Timestamp | DataType::TimestampTz
        )
    }

    /// Widening order inside the numeric and textual families.
    fn rank(self) -> u8 {
        match self {
            DataType::TinyInt => 1,
            DataType::SmallInt => 2,
            DataType::Integer => 3,
            DataType::BigInt => 4,
            DataType::Decimal => 5,
            DataType::Real => 6,
            DataType::Double => 7,
            DataType::Enum => 1,
            DataType::Char => 2,
            DataType::Varchar => 3,
            DataType::Text => 4,
            _ => 0,
        }
    }

    /// Type both operands can be represented in, or `None` when they are unrelated.
    pub fn common_type(self, other: DataType) -> Option<DataType> {
        if self == other {
            return Some(self);
        }
        let same_family = (self.is_numeric() && other.is_numeric())
            || (self.is_textual() && other.is_textual());
        if !same_family {
            return None;
        }
        Some(if self.rank() >= other.rank() { self } else { other })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Bool => "BOOLEAN",
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::Real => "REAL",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Char => "CHAR",
            DataType::Varchar => "VARCHAR",
            DataType::Text => "TEXT",
            DataType::Binary => "BINARY",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampTz => "TIMESTAMPTZ",
            DataType::Json => "JSON",
            DataType::Uuid => "UUID",
            DataType::Enum => "ENUM",
        };
        write!(f, "{}", s)
    }
}
