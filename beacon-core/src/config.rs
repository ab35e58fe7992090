//! Client configuration.
//!
//! A [`ClientConfig`] is captured once at initialization and never changes
//! afterwards. It can be built in code with the `with_*` methods or loaded
//! from a JSON document using the same camelCase keys as the backend's own
//! configuration.

use crate::error::ConfigError;
use serde::Deserialize;

/// Allowed values for the three custom dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDimensions {
    /// Domain of dimension 01.
    #[serde(default)]
    pub dimension01: Option<Vec<String>>,
    /// Domain of dimension 02.
    #[serde(default)]
    pub dimension02: Option<Vec<String>>,
    /// Domain of dimension 03.
    #[serde(default)]
    pub dimension03: Option<Vec<String>>,
}

/// Configuration snapshot committed at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Backend game key.
    pub game_key: String,
    /// Backend secret key.
    pub secret_key: String,
    /// User identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Application build or release version.
    #[serde(default)]
    pub build: Option<String>,
    /// Enable info-level transport logging.
    #[serde(default)]
    pub debug: bool,
    /// Enable verbose transport logging.
    #[serde(default)]
    pub verbose: bool,
    /// Sessions are started and ended by the application.
    #[serde(default)]
    pub manual_session_handling: bool,
    /// Dispatch interval in milliseconds.
    #[serde(default)]
    pub event_process_interval: Option<u64>,
    /// Custom dimension domains.
    #[serde(default)]
    pub custom_dimensions: CustomDimensions,
    /// Resource currency vocabulary.
    #[serde(default)]
    pub resource_currencies: Option<Vec<String>>,
    /// Resource item type vocabulary.
    #[serde(default)]
    pub resource_item_types: Option<Vec<String>>,
    /// Event submission enabled right after initialization.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ClientConfig {
    /// Create a configuration with only the identity secrets set.
    pub fn new(game_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            game_key: game_key.into(),
            secret_key: secret_key.into(),
            user_id: None,
            build: None,
            debug: false,
            verbose: false,
            manual_session_handling: false,
            event_process_interval: None,
            custom_dimensions: CustomDimensions::default(),
            resource_currencies: None,
            resource_item_types: None,
            enabled: true,
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the identity secrets are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_key.trim().is_empty() {
            return Err(ConfigError::MissingField("gameKey"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingField("secretKey"));
        }
        Ok(())
    }

    /// Set the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the build version.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Enable info-level transport logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable verbose transport logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Hand session control to the application.
    pub fn with_manual_session_handling(mut self, manual: bool) -> Self {
        self.manual_session_handling = manual;
        self
    }

    /// Set the dispatch interval in milliseconds.
    pub fn with_event_process_interval(mut self, millis: u64) -> Self {
        self.event_process_interval = Some(millis);
        self
    }

    /// Set the custom dimension domains.
    pub fn with_custom_dimensions(mut self, dimensions: CustomDimensions) -> Self {
        self.custom_dimensions = dimensions;
        self
    }

    /// Set the resource currency vocabulary.
    pub fn with_resource_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_currencies = Some(currencies.into_iter().map(Into::into).collect());
        self
    }

    /// Set the resource item type vocabulary.
    pub fn with_resource_item_types<I, S>(mut self, item_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_item_types = Some(item_types.into_iter().map(Into::into).collect());
        self
    }

    /// Set whether submission stays enabled after initialization.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The dispatch interval in seconds, as sent to the transport.
    ///
    /// The conversion is exact: 750 ms becomes 0.75, never 0 or 1.
    pub fn event_process_interval_secs(&self) -> Option<f64> {
        self.event_process_interval
            .map(|millis| millis as f64 / 1000.0)
    }
}
