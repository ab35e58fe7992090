//! # Plugin Capabilities
//!
//! Plugins hook into event dispatch at one of two points:
//!
//! - [`Enricher`]: runs before the transport call. It receives the event by
//!   value and returns the event to pass on, or `None` to drop it.
//! - [`Destination`]: runs after the transport call. It observes the event
//!   that was actually dispatched and cannot influence delivery.
//!
//! Both share the [`Plugin`] supertrait, which carries the unique name and
//! the `setup`/`teardown` lifecycle.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Enricher`] uses a native `impl Future` return so implementations can be
//! written as plain `async fn`. Pipelines store plugins as trait objects
//! through the object-safe [`DynEnricher`], which every `Enricher`
//! implements automatically.

use crate::{config::ClientConfig, error::BoxError, event::Event};
use std::{future::Future, pin::Pin};

/// Result of an enrichment step. `Ok(None)` drops the event.
pub type EnrichResult = Result<Option<Event>, BoxError>;

/// A boxed enrichment future.
pub type EnrichFuture<'a> = Pin<Box<dyn Future<Output = EnrichResult> + Send + 'a>>;

/// Identity and lifecycle shared by all plugins.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Plugin`",
    label = "missing `Plugin` implementation",
    note = "Plugins must provide a unique `name`; `setup` and `teardown` are optional."
)]
pub trait Plugin: Send + Sync + 'static {
    /// Unique name within a pipeline. Used for removal.
    fn name(&self) -> &str;

    /// Called with the committed configuration, either when the client is
    /// initialized or when the plugin is registered afterwards.
    fn setup(&self, _config: &ClientConfig) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called when the plugin is removed from the pipeline.
    fn teardown(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// A stage that may transform or drop an event before delivery.
///
/// Enrichers run in registration order; each one sees the previous one's
/// output. Returning `Ok(None)` stops the chain and the event is never
/// dispatched. Returning an error aborts processing of that event.
///
/// In the synchronous dispatch path the returned future is polled exactly
/// once. An enricher whose future is not ready at that point is skipped and
/// the event continues unchanged. Use the asynchronous path when an enricher
/// genuinely needs to wait.
pub trait Enricher: Plugin {
    /// Process an event.
    fn enrich(&self, event: Event) -> impl Future<Output = EnrichResult> + Send;
}

/// Object-safe version of [`Enricher`].
pub trait DynEnricher: Plugin {
    /// Process an event (dynamic dispatch version).
    fn enrich_dyn(&self, event: Event) -> EnrichFuture<'_>;
}

// Blanket implementation: Any type implementing Enricher implements DynEnricher automatically.
impl<T: Enricher> DynEnricher for T {
    fn enrich_dyn(&self, event: Event) -> EnrichFuture<'_> {
        Box::pin(self.enrich(event))
    }
}

/// A stage that observes events after they were dispatched.
///
/// Destinations are isolated from each other: an error or panic in one does
/// not prevent the next from running.
pub trait Destination: Plugin {
    /// Observe a dispatched event.
    fn deliver(&self, event: &Event) -> Result<(), BoxError>;
}
