//! The dispatch client.
//!
//! [`Client`] owns the transport, the plugin pipeline and the committed
//! configuration. Every event goes through the same path:
//!
//! 1. Gate: the host must be available and the client initialized.
//! 2. Enrichment plugins, in registration order. A drop ends here.
//! 3. One transport call built from the (possibly enriched) payload.
//! 4. Destination plugins, with the event that was sent.
//!
//! # Locking
//!
//! Both dispatch paths snapshot the pipeline and release the lock before any
//! plugin or transport code runs. Plugins may therefore report further
//! events, or register and remove plugins, while the client is dispatching;
//! such changes apply to the next dispatch.

use crate::{remote::RemoteConfigSubscription, wire};
use beacon_core::{
    AdEvent, BeaconError, BusinessEvent, ClientConfig, Command, ConfigError, DesignEvent,
    ErrorEvent, Event, EventPayload, FieldMap, ProgressionEvent, RemoteConfigsListener,
    ResourceEvent, Transport, WireValue,
};
use beacon_std::{Pipeline, Stage, plugins::ConsentPlugin};
use std::{
    fmt,
    sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Why an event was not processed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The host cannot dispatch.
    HostUnavailable,
    /// [`Client::init`] has not completed.
    NotInitialized,
}

/// What happened to a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport was called and destinations notified.
    Delivered,
    /// An enrichment plugin dropped the event.
    Dropped,
    /// The event was never processed.
    Skipped(SkipReason),
    /// An enrichment plugin failed; nothing was sent.
    Aborted,
}

impl DispatchOutcome {
    /// True for [`DispatchOutcome::Delivered`].
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Typed instrumentation client over a [`Transport`].
///
/// There is no global instance: create one at the application's composition
/// root and share it (usually behind an `Arc`).
pub struct Client<T: Transport> {
    transport: Arc<T>,
    pipeline: RwLock<Pipeline>,
    config: OnceLock<Arc<ClientConfig>>,
}

impl<T: Transport> Client<T> {
    /// Create a client owning `transport`.
    pub fn new(transport: T) -> Self {
        Self::with_shared(Arc::new(transport))
    }

    /// Create a client over a shared transport.
    pub fn with_shared(transport: Arc<T>) -> Self {
        Self {
            transport,
            pipeline: RwLock::new(Pipeline::new()),
            config: OnceLock::new(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    // ---- Lifecycle ----

    /// Commit the configuration and initialize the backend.
    ///
    /// Plugins are set up first, then the configuration calls are issued in
    /// the order the backend requires, ending with `initialize`. Calling this
    /// again after a successful init, or when the host is unavailable, does
    /// nothing and returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// The only error is [`ConfigError::MissingField`] for an empty game key
    /// or secret key. It is returned before any call reaches the transport.
    pub fn init(&self, config: ClientConfig) -> Result<(), ConfigError> {
        if !self.transport.is_available() {
            tracing::debug!("host unavailable, init skipped");
            return Ok(());
        }
        if self.config.get().is_some() {
            return Ok(());
        }
        config.validate()?;

        let mut pipeline = self.write_pipeline();
        // Another thread may have won the race while we waited for the lock.
        if self.config.get().is_some() {
            return Ok(());
        }

        let config = Arc::new(config);
        pipeline.commit_config(config.clone());

        if config.debug {
            self.issue(Command::SetEnabledInfoLog, vec![true.into()]);
        }
        if config.verbose {
            self.issue(Command::SetEnabledVerboseLog, vec![true.into()]);
        }
        if config.manual_session_handling {
            self.issue(Command::SetEnabledManualSessionHandling, vec![true.into()]);
        }
        if let Some(secs) = config.event_process_interval_secs() {
            self.issue(Command::SetEventProcessInterval, vec![secs.into()]);
        }
        if let Some(build) = non_empty(config.build.as_deref()) {
            self.issue(Command::ConfigureBuild, vec![build.into()]);
        }
        if let Some(user_id) = non_empty(config.user_id.as_deref()) {
            self.issue(Command::ConfigureUserId, vec![user_id.into()]);
        }

        let dimensions = &config.custom_dimensions;
        for (command, values) in [
            (Command::ConfigureAvailableCustomDimensions01, &dimensions.dimension01),
            (Command::ConfigureAvailableCustomDimensions02, &dimensions.dimension02),
            (Command::ConfigureAvailableCustomDimensions03, &dimensions.dimension03),
            (Command::ConfigureAvailableResourceCurrencies, &config.resource_currencies),
            (Command::ConfigureAvailableResourceItemTypes, &config.resource_item_types),
        ] {
            if let Some(values) = values {
                self.issue(command, vec![values.clone().into()]);
            }
        }

        self.issue(
            Command::Initialize,
            vec![
                config.game_key.as_str().into(),
                config.secret_key.as_str().into(),
            ],
        );
        let enabled = config.enabled;
        // Set while the write lock is held, so the race check above is sound.
        let _ = self.config.set(config);
        drop(pipeline);

        if !enabled {
            self.disable();
        }
        tracing::debug!("client initialized");
        Ok(())
    }

    /// Turn event submission on. Does not require [`init`](Self::init).
    pub fn enable(&self) {
        self.call_if_available(Command::SetEnabledEventSubmission, vec![true.into()]);
    }

    /// Turn event submission off. Does not require [`init`](Self::init).
    pub fn disable(&self) {
        self.call_if_available(Command::SetEnabledEventSubmission, vec![false.into()]);
    }

    /// Whether [`init`](Self::init) completed. Always false when the host is
    /// unavailable.
    pub fn is_initialized(&self) -> bool {
        self.transport.is_available() && self.config.get().is_some()
    }

    /// The committed configuration.
    pub fn config(&self) -> Option<&ClientConfig> {
        self.config.get().map(Arc::as_ref)
    }

    // ---- Events ----

    /// Report a purchase.
    pub fn report_business(&self, event: BusinessEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report a virtual currency gain or spend.
    pub fn report_resource(&self, event: ResourceEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report progress through a multi-step flow.
    pub fn report_progression(&self, event: ProgressionEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report a custom design event.
    pub fn report_design(&self, event: DesignEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report an application error.
    pub fn report_error(&self, event: ErrorEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report an ad impression or interaction.
    pub fn report_ad(&self, event: AdEvent) -> DispatchOutcome {
        self.report(event)
    }

    /// Report any payload synchronously.
    ///
    /// Enrichers whose future is not immediately ready are skipped; use
    /// [`report_async`](Self::report_async) to wait for them.
    pub fn report(&self, payload: impl Into<EventPayload>) -> DispatchOutcome {
        if let Some(reason) = self.skip_reason() {
            tracing::trace!(?reason, "event skipped");
            return DispatchOutcome::Skipped(reason);
        }
        self.dispatch(Event::new(payload))
    }

    /// Report any payload, awaiting every enricher.
    pub async fn report_async(&self, payload: impl Into<EventPayload>) -> DispatchOutcome {
        if let Some(reason) = self.skip_reason() {
            tracing::trace!(?reason, "event skipped");
            return DispatchOutcome::Skipped(reason);
        }
        let event = Event::new(payload);
        let pipeline = self.read_pipeline().clone();
        match pipeline.run_enrichment(event).await {
            Ok(Some(event)) => self.send(&pipeline, event),
            Ok(None) => DispatchOutcome::Dropped,
            Err(err) => {
                tracing::warn!(error = %err, "enrichment failed, event aborted");
                DispatchOutcome::Aborted
            }
        }
    }

    /// Dispatch an event that was built earlier, keeping its creation time.
    ///
    /// Used to replay events released by a consent gate.
    pub fn redeliver(&self, event: Event) -> DispatchOutcome {
        if let Some(reason) = self.skip_reason() {
            tracing::trace!(?reason, "redelivery skipped");
            return DispatchOutcome::Skipped(reason);
        }
        self.dispatch(event)
    }

    fn dispatch(&self, event: Event) -> DispatchOutcome {
        let pipeline = self.read_pipeline().clone();
        match pipeline.run_enrichment_sync(event) {
            Ok(Some(event)) => self.send(&pipeline, event),
            Ok(None) => DispatchOutcome::Dropped,
            Err(err) => {
                tracing::warn!(error = %err, "enrichment failed, event aborted");
                DispatchOutcome::Aborted
            }
        }
    }

    fn send(&self, pipeline: &Pipeline, event: Event) -> DispatchOutcome {
        let (command, args) = wire::to_wire(event.payload());
        self.transport.call(command, args);
        pipeline.run_destinations(&event);
        DispatchOutcome::Delivered
    }

    // ---- Identity ----

    /// Set the user id.
    pub fn set_user_id(&self, user_id: &str) {
        self.call_if_available(Command::ConfigureUserId, vec![user_id.into()]);
    }

    /// Set the build version.
    pub fn set_build(&self, build: &str) {
        self.call_if_available(Command::ConfigureBuild, vec![build.into()]);
    }

    /// Set the active value of custom dimension 01.
    pub fn set_custom_dimension01(&self, value: &str) {
        self.call_if_available(Command::SetCustomDimension01, vec![value.into()]);
    }

    /// Set the active value of custom dimension 02.
    pub fn set_custom_dimension02(&self, value: &str) {
        self.call_if_available(Command::SetCustomDimension02, vec![value.into()]);
    }

    /// Set the active value of custom dimension 03.
    pub fn set_custom_dimension03(&self, value: &str) {
        self.call_if_available(Command::SetCustomDimension03, vec![value.into()]);
    }

    /// Set custom fields the backend attaches to every event.
    pub fn set_global_custom_event_fields(&self, fields: FieldMap) {
        self.call_if_available(Command::SetGlobalCustomEventFields, vec![fields.into()]);
    }

    // ---- Sessions ----

    /// Start a session. Only meaningful with manual session handling.
    pub fn start_session(&self) {
        if self.skip_reason().is_none() {
            self.transport.call(Command::StartSession, Vec::new());
        }
    }

    /// End the current session.
    pub fn end_session(&self) {
        if self.skip_reason().is_none() {
            self.transport.call(Command::EndSession, Vec::new());
        }
    }

    // ---- Remote configs ----

    /// Whether remote configs have been fetched.
    pub fn is_remote_configs_ready(&self) -> bool {
        if !self.transport.is_available() {
            return false;
        }
        self.transport
            .call(Command::IsRemoteConfigsReady, Vec::new())
            .as_bool()
            .unwrap_or(false)
    }

    /// A remote config value, or `default` when there is none.
    pub fn get_remote_config(&self, key: &str, default: Option<&str>) -> Option<String> {
        if !self.transport.is_available() {
            return default.map(str::to_owned);
        }
        self.transport
            .call(
                Command::GetRemoteConfigsValueAsString,
                vec![key.into(), default.unwrap_or_default().into()],
            )
            .into_string()
            .or_else(|| default.map(str::to_owned))
    }

    /// All remote configs as a JSON document, or `""`.
    pub fn get_all_remote_configs(&self) -> String {
        self.string_getter(Command::GetRemoteConfigsContentAsString)
    }

    /// The A/B testing id, or `""`.
    pub fn get_ab_testing_id(&self) -> String {
        self.string_getter(Command::GetABTestingId)
    }

    /// The A/B testing variant id, or `""`.
    pub fn get_ab_testing_variant_id(&self) -> String {
        self.string_getter(Command::GetABTestingVariantId)
    }

    /// Call `callback` whenever remote configs are updated.
    ///
    /// Keep the returned handle to unsubscribe later. When the host is
    /// unavailable nothing is registered and the handle is inert.
    pub fn on_remote_configs_ready(
        &self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> RemoteConfigSubscription {
        let transport: Arc<dyn Transport> = self.transport.clone();
        if !transport.is_available() {
            return RemoteConfigSubscription::inert(transport);
        }
        let listener = Arc::new(RemoteConfigsListener::new(callback));
        transport.call(
            Command::AddRemoteConfigsListener,
            vec![WireValue::Listener(listener.clone())],
        );
        RemoteConfigSubscription::new(transport, listener)
    }

    // ---- Plugins ----

    /// Append a plugin to the pipeline.
    ///
    /// If the client is already initialized the plugin is set up right away;
    /// a failing setup keeps it out of the pipeline.
    pub fn add_plugin(&self, stage: Stage) -> Result<(), BeaconError> {
        self.write_pipeline().register(stage)
    }

    /// Remove a plugin by name. Returns `false` if there was none.
    pub fn remove_plugin(&self, name: &str) -> bool {
        self.write_pipeline().unregister(name)
    }

    /// Tear down and remove every plugin.
    pub fn teardown_plugins(&self) {
        self.write_pipeline().teardown_all();
    }

    /// Registered plugin names, in order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.read_pipeline()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    // ---- Internals ----

    fn skip_reason(&self) -> Option<SkipReason> {
        if !self.transport.is_available() {
            Some(SkipReason::HostUnavailable)
        } else if self.config.get().is_none() {
            Some(SkipReason::NotInitialized)
        } else {
            None
        }
    }

    fn issue(&self, command: Command, args: Vec<WireValue>) {
        tracing::debug!(%command, "init step");
        self.transport.call(command, args);
    }

    fn call_if_available(&self, command: Command, args: Vec<WireValue>) {
        if self.transport.is_available() {
            self.transport.call(command, args);
        } else {
            tracing::trace!(%command, "host unavailable, call skipped");
        }
    }

    fn string_getter(&self, command: Command) -> String {
        if !self.transport.is_available() {
            return String::new();
        }
        self.transport
            .call(command, Vec::new())
            .into_string()
            .unwrap_or_default()
    }

    fn read_pipeline(&self) -> RwLockReadGuard<'_, Pipeline> {
        self.pipeline.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pipeline(&self) -> RwLockWriteGuard<'_, Pipeline> {
        self.pipeline.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> Client<T> {
    /// Replay events released by `consent` through this client.
    ///
    /// Installs a flush callback holding only a weak reference, so the
    /// plugin does not keep the client alive.
    pub fn redeliver_on_grant(self: &Arc<Self>, consent: &ConsentPlugin) {
        let client = Arc::downgrade(self);
        consent.on_grant_flush(move |events| {
            let Some(client) = client.upgrade() else {
                tracing::debug!(count = events.len(), "client gone, flushed events discarded");
                return;
            };
            for event in events {
                client.redeliver(event);
            }
        });
    }
}

impl<T: Transport> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("initialized", &self.config.get().is_some())
            .field("plugins", &self.plugin_names())
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
