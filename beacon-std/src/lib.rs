//! # beacon-std
//!
//! Standard implementations for the Beacon instrumentation client.
//!
//! This crate provides:
//! - **Plugin pipeline**: [`Pipeline`] and its [`Stage`] entries
//! - **Standard plugins**: [`ConsentPlugin`](plugins::ConsentPlugin),
//!   [`DebugPlugin`](plugins::DebugPlugin)
//! - **Test doubles**: the [`testing`] module

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use beacon_core;

// Modules
pub mod pipeline;
pub mod plugins;
pub mod testing;

pub use pipeline::{Capability, Pipeline, Stage};
