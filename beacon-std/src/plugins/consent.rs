//! Consent gate.

use beacon_core::{EnrichResult, Enricher, Event, Plugin};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback receiving the queued batch when consent is granted.
pub type FlushCallback = Arc<dyn Fn(Vec<Event>) + Send + Sync>;

#[derive(Default)]
struct ConsentState {
    granted: bool,
    queue: Vec<Event>,
}

/// An enrichment plugin that drops every event until consent is granted.
///
/// With queueing enabled, events dropped before consent are kept and handed
/// to the flush callback, in their original order, on the next
/// [`grant`](ConsentPlugin::grant). The usual callback re-dispatches them
/// through the client.
///
/// The plugin is a cheap handle: clones share the same state, so keep one
/// after registering the other.
///
/// # Example
///
/// ```rust,ignore
/// let consent = ConsentPlugin::queue_until_consent();
/// client.add_plugin(Stage::enrichment(consent.clone()))?;
///
/// // Later, once the user agrees:
/// consent.grant();
/// ```
#[derive(Clone)]
pub struct ConsentPlugin {
    state: Arc<Mutex<ConsentState>>,
    on_flush: Arc<Mutex<Option<FlushCallback>>>,
    queue_enabled: bool,
}

impl ConsentPlugin {
    /// Create a gate that discards events until consent.
    pub fn new() -> Self {
        Self::with_queue(false)
    }

    /// Create a gate that queues events until consent.
    pub fn queue_until_consent() -> Self {
        Self::with_queue(true)
    }

    /// Create a gate, choosing whether pre-consent events are queued.
    pub fn with_queue(queue_enabled: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConsentState::default())),
            on_flush: Arc::new(Mutex::new(None)),
            queue_enabled,
        }
    }

    /// Let events through, flushing the queue if there is one.
    ///
    /// The queue is drained under the lock; the callback runs after the lock
    /// is released and is called at most once per grant.
    pub fn grant(&self) {
        let batch = {
            let mut state = self.state();
            state.granted = true;
            if !self.queue_enabled || state.queue.is_empty() {
                return;
            }
            std::mem::take(&mut state.queue)
        };

        let callback = self
            .on_flush
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match callback {
            Some(flush) => {
                tracing::debug!(count = batch.len(), "flushing events queued before consent");
                flush(batch);
            }
            None => {
                tracing::warn!(
                    count = batch.len(),
                    "consent granted with no flush callback, queued events discarded"
                );
            }
        }
    }

    /// Block events again. Already queued events stay queued.
    pub fn revoke(&self) {
        self.state().granted = false;
    }

    /// Whether consent is currently granted.
    pub fn is_granted(&self) -> bool {
        self.state().granted
    }

    /// Number of events waiting for consent.
    pub fn queued_len(&self) -> usize {
        self.state().queue.len()
    }

    /// Whether pre-consent events are queued.
    pub fn queue_enabled(&self) -> bool {
        self.queue_enabled
    }

    /// Set the callback that receives queued events on grant, replacing any
    /// previous one.
    pub fn on_grant_flush(&self, callback: impl Fn(Vec<Event>) + Send + Sync + 'static) {
        *self
            .on_flush
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    fn state(&self) -> MutexGuard<'_, ConsentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConsentPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ConsentPlugin {
    fn name(&self) -> &str {
        "consent"
    }
}

impl Enricher for ConsentPlugin {
    async fn enrich(&self, event: Event) -> EnrichResult {
        let mut state = self.state();
        if state.granted {
            return Ok(Some(event));
        }
        if self.queue_enabled {
            state.queue.push(event);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{DesignEvent, EventPayload};
    use futures::FutureExt;

    fn design(id: &str) -> Event {
        Event::new(DesignEvent::new(id))
    }

    fn run(plugin: &ConsentPlugin, event: Event) -> Option<Event> {
        plugin
            .enrich(event)
            .now_or_never()
            .expect("consent gate never waits")
            .unwrap()
    }

    fn ids(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .map(|e| match e.payload() {
                EventPayload::Design(d) => d.event_id.clone(),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect()
    }

    #[test]
    fn drops_until_granted() {
        let consent = ConsentPlugin::new();
        assert!(!consent.is_granted());
        assert!(run(&consent, design("a")).is_none());
        assert_eq!(consent.queued_len(), 0);

        consent.grant();
        assert!(run(&consent, design("b")).is_some());

        consent.revoke();
        assert!(run(&consent, design("c")).is_none());
    }

    #[test]
    fn grant_without_queue_never_flushes() {
        let consent = ConsentPlugin::new();
        let flushed = Arc::new(Mutex::new(0usize));
        let counter = flushed.clone();
        consent.on_grant_flush(move |_| *counter.lock().unwrap() += 1);

        run(&consent, design("a"));
        consent.grant();

        assert_eq!(*flushed.lock().unwrap(), 0);
    }

    #[test]
    fn queued_events_flush_once_in_order() {
        let consent = ConsentPlugin::queue_until_consent();
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = batches.clone();
        consent.on_grant_flush(move |batch| sink.lock().unwrap().push(batch));

        run(&consent, design("first"));
        run(&consent, design("second"));
        assert_eq!(consent.queued_len(), 2);

        consent.grant();
        consent.grant();

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(ids(&batches[0]), vec!["first", "second"]);
        assert_eq!(consent.queued_len(), 0);
    }

    #[test]
    fn revoke_keeps_queue() {
        let consent = ConsentPlugin::queue_until_consent();
        run(&consent, design("a"));
        consent.revoke();
        assert_eq!(consent.queued_len(), 1);
    }

    #[test]
    fn latest_callback_wins() {
        let consent = ConsentPlugin::queue_until_consent();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let first = hits.clone();
        consent.on_grant_flush(move |_| first.lock().unwrap().push("first"));
        let second = hits.clone();
        consent.on_grant_flush(move |_| second.lock().unwrap().push("second"));

        run(&consent, design("a"));
        consent.grant();

        assert_eq!(*hits.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn clones_share_state() {
        let consent = ConsentPlugin::queue_until_consent();
        let handle = consent.clone();

        run(&consent, design("a"));
        assert_eq!(handle.queued_len(), 1);

        handle.grant();
        assert!(consent.is_granted());
    }
}
