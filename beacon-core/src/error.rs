//! Error types for Beacon.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`BeaconError`] - Top-level error type for all Beacon operations
//! - [`PluginError`] - Errors raised by an individual plugin
//! - [`PipelineError`] - Errors from pipeline registration
//! - [`ConfigError`] - Errors while loading a [`ClientConfig`]
//! - [`InvalidEnumValue`] - A string outside one of the closed code domains
//!
//! [`ClientConfig`]: crate::ClientConfig

use thiserror::Error;

/// A boxed error type for plugin-provided errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Beacon operations.
#[derive(Error, Debug)]
pub enum BeaconError {
    /// A plugin failed.
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// The pipeline rejected an operation.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// The configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A string could not be mapped to a wire code.
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// A value outside one of the closed attribute domains.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {domain} value: {value:?}")]
pub struct InvalidEnumValue {
    /// Name of the domain, e.g. `"resource flow"`.
    pub domain: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Errors raised while running a plugin.
#[derive(Error, Debug)]
pub enum PluginError {
    /// `enrich` or `deliver` returned an error.
    #[error("plugin `{name}` failed to execute")]
    Execute {
        /// Plugin name.
        name: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// `setup` returned an error.
    #[error("plugin `{name}` failed to set up")]
    Setup {
        /// Plugin name.
        name: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// `teardown` returned an error.
    #[error("plugin `{name}` failed to tear down")]
    Teardown {
        /// Plugin name.
        name: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// The plugin panicked.
    #[error("plugin `{name}` panicked: {message}")]
    Panicked {
        /// Plugin name.
        name: String,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl PluginError {
    /// Name of the plugin that failed.
    pub fn plugin_name(&self) -> &str {
        match self {
            PluginError::Execute { name, .. }
            | PluginError::Setup { name, .. }
            | PluginError::Teardown { name, .. }
            | PluginError::Panicked { name, .. } => name,
        }
    }
}

/// Errors from pipeline registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A plugin with this name is already registered.
    #[error("plugin already registered: {0}")]
    DuplicateName(String),
}

/// Errors while loading a client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The document could not be parsed.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

// Convenience conversions
impl From<BoxError> for BeaconError {
    fn from(err: BoxError) -> Self {
        BeaconError::Custom(err)
    }
}
