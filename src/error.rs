//! Error types shared by resolution, tokenization and dependency inspection.

use thiserror::Error;

use crate::schema::ElementKind;

/// Errors raised while resolving identifiers or compiling statements.
///
/// Every failure carries enough context (the attempted path, the table or
/// column involved) to be reported without re-running the compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{kind} not found: '{path}'")]
    NotFound { kind: ElementKind, path: String },

    #[error("ambiguous {kind} reference '{path}' (candidates: {})", .candidates.join(", "))]
    Ambiguous {
        kind: ElementKind,
        path: String,
        candidates: Vec<String>,
    },

    #[error("invalid path: '{0}'")]
    InvalidPath(String),

    #[error("expected a {expected} at '{path}', found a {found}")]
    WrongKind {
        expected: ElementKind,
        found: ElementKind,
        path: String,
    },

    #[error("'{parent}' already contains an element named '{name}'")]
    DuplicateElement { parent: String, name: String },

    #[error("a {child} cannot be placed under a {parent}")]
    InvalidParent {
        child: ElementKind,
        parent: ElementKind,
    },

    #[error("no column values given for '{table}'")]
    NoValues { table: String },

    #[error("column '{column}' of '{table}' has no value and no default")]
    MissingValue { table: String, column: String },

    #[error("column '{column}' does not belong to '{table}'")]
    ForeignColumn { table: String, column: String },

    #[error("column '{column}' of '{table}' is listed more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("UNION parts must not carry their own LIMIT, OFFSET or ORDER BY")]
    UnionWithLimitOrOrder,

    #[error("view '{view}' has no definition")]
    MissingDefinition { view: String },

    #[error("column '{column}' requires a length but {type_name} has no maximum length")]
    LengthRequired { column: String, type_name: String },

    #[error("{feature} is not supported by the {dialect} dialect")]
    Unsupported {
        dialect: &'static str,
        feature: String,
    },

    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("reference cycle between {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Error::Unsupported {
            dialect,
            feature: feature.into(),
        }
    }

    /// True for "not found" and "ambiguous" resolution failures.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::Ambiguous { .. } | Error::InvalidPath(_)
        )
    }
}
