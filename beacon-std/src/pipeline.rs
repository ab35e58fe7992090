//! Ordered plugin pipeline.
//!
//! A [`Pipeline`] keeps enrichment and destination plugins in one list, in
//! registration order. Enrichment walks the list and applies each enricher
//! to the previous one's output; destinations are notified afterwards with
//! the event that was actually dispatched.
//!
//! Mutation takes `&mut self`. A pipeline shared behind a lock should be
//! cloned (plugins are behind `Arc`) and the lock released before running
//! plugins, so that plugins can reach back into their owner.

use beacon_core::{
    BeaconError, BoxError, ClientConfig, Destination, DynEnricher, Enricher, Event, PipelineError,
    PluginError,
};
use futures::FutureExt;
use std::{
    any::Any,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

/// Which side of the transport call a plugin runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Before dispatch; may transform or drop.
    Enrichment,
    /// After dispatch; observes only.
    Destination,
}

/// A registered plugin together with its capability.
#[derive(Clone)]
pub enum Stage {
    /// An enrichment plugin.
    Enrichment(Arc<dyn DynEnricher>),
    /// A destination plugin.
    Destination(Arc<dyn Destination>),
}

impl Stage {
    /// Wrap an enricher.
    pub fn enrichment<P: Enricher>(plugin: P) -> Self {
        Stage::Enrichment(Arc::new(plugin))
    }

    /// Wrap a destination.
    pub fn destination<P: Destination>(plugin: P) -> Self {
        Stage::Destination(Arc::new(plugin))
    }

    /// The plugin name.
    pub fn name(&self) -> &str {
        match self {
            Stage::Enrichment(p) => p.name(),
            Stage::Destination(p) => p.name(),
        }
    }

    /// The plugin capability.
    pub fn capability(&self) -> Capability {
        match self {
            Stage::Enrichment(_) => Capability::Enrichment,
            Stage::Destination(_) => Capability::Destination,
        }
    }

    fn setup(&self, config: &ClientConfig) -> Result<(), PluginError> {
        let result = match self {
            Stage::Enrichment(p) => p.setup(config),
            Stage::Destination(p) => p.setup(config),
        };
        result.map_err(|source| PluginError::Setup {
            name: self.name().to_owned(),
            source,
        })
    }

    fn teardown(&self) -> Result<(), PluginError> {
        let result = match self {
            Stage::Enrichment(p) => p.teardown(),
            Stage::Destination(p) => p.teardown(),
        };
        result.map_err(|source| PluginError::Teardown {
            name: self.name().to_owned(),
            source,
        })
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name())
            .field("capability", &self.capability())
            .finish()
    }
}

/// The ordered plugin list plus the committed configuration.
///
/// Cloning is cheap: plugins are shared behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
    config: Option<Arc<ClientConfig>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin.
    ///
    /// Names are unique: a second plugin with a registered name is rejected
    /// and nothing changes. When a configuration has already been committed
    /// the plugin's `setup` runs immediately; if it fails the plugin is not
    /// added.
    pub fn register(&mut self, stage: Stage) -> Result<(), BeaconError> {
        if self.contains(stage.name()) {
            return Err(PipelineError::DuplicateName(stage.name().to_owned()).into());
        }
        if let Some(config) = &self.config {
            stage.setup(config)?;
        }
        tracing::debug!(
            plugin = %stage.name(),
            capability = ?stage.capability(),
            "plugin registered"
        );
        self.stages.push(stage);
        Ok(())
    }

    /// Remove the plugin with this name, calling its `teardown` first.
    ///
    /// Returns `false` when no such plugin is registered. A failing teardown
    /// is logged; the plugin is removed regardless.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(index) = self.stages.iter().position(|s| s.name() == name) else {
            return false;
        };
        let stage = self.stages.remove(index);
        if let Err(err) = stage.teardown() {
            tracing::warn!(plugin = %name, error = %err, "plugin teardown failed");
        }
        tracing::debug!(plugin = %name, "plugin removed");
        true
    }

    /// Store the configuration and run `setup` on every registered plugin.
    ///
    /// Setup failures are isolated per plugin, logged and returned.
    pub fn commit_config(&mut self, config: Arc<ClientConfig>) -> Vec<PluginError> {
        let mut failures = Vec::new();
        for stage in &self.stages {
            if let Err(err) = stage.setup(&config) {
                tracing::warn!(plugin = %stage.name(), error = %err, "plugin setup failed");
                failures.push(err);
            }
        }
        self.config = Some(config);
        failures
    }

    /// Run `teardown` on every plugin in order, then clear the pipeline.
    pub fn teardown_all(&mut self) -> Vec<PluginError> {
        let mut failures = Vec::new();
        for stage in self.stages.drain(..) {
            if let Err(err) = stage.teardown() {
                tracing::warn!(plugin = %stage.name(), error = %err, "plugin teardown failed");
                failures.push(err);
            }
        }
        failures
    }

    /// Run the enrichment chain, awaiting each enricher in turn.
    ///
    /// Returns `Ok(None)` as soon as an enricher drops the event; later
    /// enrichers do not run. An enricher error or panic aborts the chain.
    pub async fn run_enrichment(&self, event: Event) -> Result<Option<Event>, PluginError> {
        let mut current = event;
        for enricher in self.enrichers() {
            let outcome = AssertUnwindSafe(enricher.enrich_dyn(current))
                .catch_unwind()
                .await;
            match settle(enricher.name(), outcome)? {
                Some(next) => current = next,
                None => {
                    tracing::trace!(plugin = %enricher.name(), "event dropped");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Run the enrichment chain without waiting.
    ///
    /// Each enricher's future is polled once. If it is not ready the
    /// enricher is skipped and the event continues unchanged; otherwise this
    /// behaves exactly like [`run_enrichment`](Self::run_enrichment).
    pub fn run_enrichment_sync(&self, event: Event) -> Result<Option<Event>, PluginError> {
        let mut current = event;
        for enricher in self.enrichers() {
            let candidate = current.clone();
            let polled = catch_unwind(AssertUnwindSafe(|| {
                enricher.enrich_dyn(candidate).now_or_never()
            }));
            let outcome = match polled {
                Ok(Some(result)) => Ok(result),
                Ok(None) => {
                    tracing::trace!(plugin = %enricher.name(), "enricher not ready, skipped");
                    continue;
                }
                Err(payload) => Err(payload),
            };
            match settle(enricher.name(), outcome)? {
                Some(next) => current = next,
                None => {
                    tracing::trace!(plugin = %enricher.name(), "event dropped");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Notify every destination, in order.
    ///
    /// Failures are isolated: each one is logged and collected, and the
    /// remaining destinations still run.
    pub fn run_destinations(&self, event: &Event) -> Vec<PluginError> {
        let mut failures = Vec::new();
        for destination in self.destinations() {
            let name = destination.name();
            let failure = match catch_unwind(AssertUnwindSafe(|| destination.deliver(event))) {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => PluginError::Execute {
                    name: name.to_owned(),
                    source,
                },
                Err(payload) => PluginError::Panicked {
                    name: name.to_owned(),
                    message: panic_message(payload.as_ref()),
                },
            };
            tracing::warn!(plugin = %name, error = %failure, "destination failed");
            failures.push(failure);
        }
        failures
    }

    /// The committed configuration, if any.
    pub fn config(&self) -> Option<&ClientConfig> {
        self.config.as_deref()
    }

    /// Whether a plugin with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name() == name)
    }

    /// Plugin names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    fn enrichers(&self) -> impl Iterator<Item = &Arc<dyn DynEnricher>> {
        self.stages.iter().filter_map(|s| match s {
            Stage::Enrichment(p) => Some(p),
            Stage::Destination(_) => None,
        })
    }

    fn destinations(&self) -> impl Iterator<Item = &Arc<dyn Destination>> {
        self.stages.iter().filter_map(|s| match s {
            Stage::Destination(p) => Some(p),
            Stage::Enrichment(_) => None,
        })
    }
}

type Caught<T> = Result<T, Box<dyn Any + Send>>;

fn settle(
    name: &str,
    outcome: Caught<Result<Option<Event>, BoxError>>,
) -> Result<Option<Event>, PluginError> {
    match outcome {
        Ok(Ok(next)) => Ok(next),
        Ok(Err(source)) => Err(PluginError::Execute {
            name: name.to_owned(),
            source,
        }),
        Err(payload) => Err(PluginError::Panicked {
            name: name.to_owned(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
