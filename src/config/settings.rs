//! TOML-based compiler settings.
//!
//! Settings are passed explicitly into every compilation; nothing here is
//! process-wide state.
//!
//! Example configuration:
//! ```toml
//! dialect = "postgres"
//!
//! [resolver]
//! alias_visibility = "inherit"   # or "isolated"
//!
//! [render]
//! namespace_qualification = "auto"   # "always" | "never"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolve::AliasVisibility;
use crate::sql::dialect::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Target dialect for compiled statements.
    pub dialect: Dialect,

    /// Structure resolver policy.
    pub resolver: ResolverSettings,

    /// Rendering options.
    pub render: RenderSettings,
}

/// Structure resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Whether aliases of an enclosing scope stay visible inside nested scopes.
    pub alias_visibility: AliasVisibility,
}

/// Rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// When table identifiers carry their namespace.
    pub namespace_qualification: NamespaceQualification,
}

/// Namespace qualification policy for emitted table identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceQualification {
    /// Qualify only when the datasource holds more than one namespace.
    #[default]
    Auto,
    Always,
    Never,
}

impl Settings {
    /// Default settings targeting `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Replace the target dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Replace the alias visibility policy.
    #[must_use]
    pub fn with_alias_visibility(mut self, visibility: AliasVisibility) -> Self {
        self.resolver.alias_visibility = visibility;
        self
    }

    /// Replace the namespace qualification policy.
    #[must_use]
    pub fn with_namespace_qualification(mut self, policy: NamespaceQualification) -> Self {
        self.render.namespace_qualification = policy;
        self
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
