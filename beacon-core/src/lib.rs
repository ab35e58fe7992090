//! # beacon-core
//!
//! Core event model and seams for the Beacon instrumentation client.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins and transports that don't need the full client.
//!
//! # Building Blocks
//!
//! ## Events ([`Event`])
//!
//! Typed domain events (business, resource, progression, design, error, ad)
//! wrapped with their creation time. Events are values; enrichment produces
//! new ones.
//!
//! ## Wire codes ([`codes`])
//!
//! Closed attribute domains (resource flow, progression status, error
//! severity, ad action, ad type, ad failure reason) and their fixed numeric
//! codes.
//!
//! ## Plugins ([`Enricher`], [`Destination`])
//!
//! Two capabilities around the transport call: enrichers run before it and
//! may transform or drop, destinations observe afterwards.
//!
//! ## Transport ([`Transport`])
//!
//! The opaque backend surface: named [`Command`]s with positional
//! [`WireValue`] arguments, plus a host-capability check.
//!
//! # Error Types
//!
//! - [`BeaconError`] - Top-level error type
//! - [`PluginError`] - Plugin failures
//! - [`PipelineError`] - Registration errors
//! - [`ConfigError`] - Configuration loading errors
//! - [`InvalidEnumValue`] - Unknown attribute names

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod codes;
mod config;
mod error;
mod event;
mod plugin;
mod transport;

// Re-exports
pub use codes::{AdAction, AdError, AdType, ErrorSeverity, ProgressionStatus, ResourceFlow};
pub use config::{ClientConfig, CustomDimensions};
pub use error::{BeaconError, BoxError, ConfigError, InvalidEnumValue, PipelineError, PluginError};
pub use event::{
    AdDetail, AdEvent, BusinessEvent, DesignEvent, ErrorEvent, Event, EventKind, EventPayload,
    FieldMap, ProgressionEvent, ResourceEvent,
};
pub use plugin::{Destination, DynEnricher, EnrichFuture, EnrichResult, Enricher, Plugin};
pub use transport::{Command, RemoteConfigsListener, Transport, WireValue};
