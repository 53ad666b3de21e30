//! Compiler configuration.
//!
//! Handles dialect selection, resolver policy and rendering options.

mod settings;

pub use settings::{
    NamespaceQualification, RenderSettings, ResolverSettings, Settings, SettingsError,
};
