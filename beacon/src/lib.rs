//! # beacon - Typed Event Instrumentation
//!
//! `beacon` wraps an analytics backend behind a typed API. Events are plain
//! Rust values; a plugin pipeline can enrich, drop or observe them; the
//! backend itself is reached through a [`Transport`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beacon::prelude::*;
//!
//! let client = Arc::new(Client::new(my_transport));
//!
//! let consent = ConsentPlugin::queue_until_consent();
//! client.add_plugin(Stage::enrichment(consent.clone()))?;
//! client.redeliver_on_grant(&consent);
//!
//! client.init(ClientConfig::new("game-key", "secret-key"))?;
//! client.report_design(DesignEvent::new("ui:signup:click"));
//!
//! consent.grant(); // the queued design event is sent now
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod client;
mod remote;
pub mod wire;

pub use client::{Client, DispatchOutcome, SkipReason};
pub use remote::RemoteConfigSubscription;

pub use beacon_core::{
    // Events
    AdDetail,
    AdEvent,
    // Codes
    AdAction,
    AdError,
    AdType,
    // Errors
    BeaconError,
    BoxError,
    BusinessEvent,
    // Configuration
    ClientConfig,
    // Transport
    Command,
    ConfigError,
    CustomDimensions,
    // Plugins
    Destination,
    DesignEvent,
    DynEnricher,
    EnrichFuture,
    EnrichResult,
    Enricher,
    ErrorEvent,
    ErrorSeverity,
    Event,
    EventKind,
    EventPayload,
    FieldMap,
    InvalidEnumValue,
    PipelineError,
    Plugin,
    PluginError,
    ProgressionEvent,
    ProgressionStatus,
    RemoteConfigsListener,
    ResourceEvent,
    ResourceFlow,
    Transport,
    WireValue,
    codes,
};

pub use beacon_std::{Capability, Pipeline, Stage};

/// Standard plugin implementations.
pub mod plugins {
    pub use beacon_std::plugins::{ConsentPlugin, DebugPlugin, FlushCallback};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use beacon_std::testing::*;
}

/// Prelude module - common imports for Beacon.
///
/// # Usage
///
/// ```rust,ignore
/// use beacon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Codes
        AdAction,
        AdError,
        AdType,
        // Events
        AdEvent,
        BusinessEvent,
        // Client
        Client,
        ClientConfig,
        DesignEvent,
        // Plugins
        Destination,
        DispatchOutcome,
        Enricher,
        ErrorEvent,
        ErrorSeverity,
        Event,
        Plugin,
        ProgressionEvent,
        ProgressionStatus,
        ResourceEvent,
        ResourceFlow,
        Stage,
        // Transport
        Transport,
        plugins::{ConsentPlugin, DebugPlugin},
    };
}
