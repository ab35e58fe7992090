//! Testing utilities for Beacon.
//!
//! Test doubles for the transport and plugin seams. All of them are cheap to
//! clone and clones share state, so a test can keep one handle for
//! inspection while the client owns another.
//!
//! # Features
//!
//! - [`RecordingTransport`]: A transport that records every call
//! - [`RecordingDestination`]: A destination that records dispatched events
//! - [`FnEnricher`]: An enricher backed by a closure
//! - [`PendingEnricher`]: An enricher that is never ready on its first poll

use beacon_core::{
    BoxError, Command, Destination, EnrichResult, Enricher, Event, Plugin, Transport, WireValue,
};
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Transport
// ============================================================================

/// One recorded transport call.
pub type Call = (Command, Vec<WireValue>);

/// A transport that records every call it receives.
///
/// Replies can be programmed per command with
/// [`set_reply`](RecordingTransport::set_reply); unprogrammed commands reply
/// with [`WireValue::Absent`].
///
/// # Example
///
/// ```rust,ignore
/// let transport = RecordingTransport::new();
/// let client = Client::new(transport.clone());
///
/// client.init(config)?;
/// assert_eq!(transport.commands()[0], Command::SetEnabledInfoLog);
/// ```
#[derive(Clone)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    available: Arc<AtomicBool>,
    replies: Arc<Mutex<HashMap<Command, WireValue>>>,
}

impl RecordingTransport {
    /// Create an available transport.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
            replies: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a transport whose host cannot dispatch.
    pub fn unavailable() -> Self {
        let transport = Self::new();
        transport.set_available(false);
        transport
    }

    /// Toggle host availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Program the reply for a command.
    pub fn set_reply(&self, command: Command, reply: impl Into<WireValue>) {
        lock(&self.replies).insert(command, reply.into());
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Recorded command names, in order.
    pub fn commands(&self) -> Vec<Command> {
        lock(&self.calls).iter().map(|(command, _)| *command).collect()
    }

    /// Arguments of every call to one command.
    pub fn calls_for(&self, command: Command) -> Vec<Vec<WireValue>> {
        lock(&self.calls)
            .iter()
            .filter(|(c, _)| *c == command)
            .map(|(_, args)| args.clone())
            .collect()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<Call> {
        lock(&self.calls).last().cloned()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Forget recorded calls. Replies are kept.
    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn call(&self, command: Command, args: Vec<WireValue>) -> WireValue {
        lock(&self.calls).push((command, args));
        lock(&self.replies)
            .get(&command)
            .cloned()
            .unwrap_or(WireValue::Absent)
    }
}

// ============================================================================
// Recording Destination
// ============================================================================

/// A destination that records every event it observes.
#[derive(Clone)]
pub struct RecordingDestination {
    name: String,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingDestination {
    /// Create a recorder with the given plugin name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl Plugin for RecordingDestination {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Destination for RecordingDestination {
    fn deliver(&self, event: &Event) -> Result<(), BoxError> {
        lock(&self.events).push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Closure Enrichers
// ============================================================================

/// An enricher backed by a closure. Returning `None` drops the event.
pub struct FnEnricher<F> {
    name: String,
    f: F,
}

impl<F> FnEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    /// Create a new closure enricher.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Plugin for FnEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> Enricher for FnEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    async fn enrich(&self, event: Event) -> EnrichResult {
        Ok((self.f)(event))
    }
}

/// An enricher whose future yields once before completing.
///
/// The synchronous dispatch path skips it; the asynchronous path waits and
/// applies the closure.
pub struct PendingEnricher<F> {
    inner: FnEnricher<F>,
}

impl<F> PendingEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    /// Create a new pending enricher.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            inner: FnEnricher::new(name, f),
        }
    }
}

impl<F> Plugin for PendingEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<F> Enricher for PendingEnricher<F>
where
    F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
{
    async fn enrich(&self, event: Event) -> EnrichResult {
        YieldOnce { yielded: false }.await;
        self.inner.enrich(event).await
    }
}

struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::DesignEvent;

    #[test]
    fn transport_records_and_replies() {
        let transport = RecordingTransport::new();
        transport.set_reply(Command::GetABTestingId, "ab-1");

        let reply = transport.call(Command::GetABTestingId, vec![]);
        let none = transport.call(Command::StartSession, vec![]);

        assert_eq!(reply.as_str(), Some("ab-1"));
        assert!(none.is_absent());
        assert_eq!(
            transport.commands(),
            vec![Command::GetABTestingId, Command::StartSession]
        );
    }

    #[test]
    fn clones_share_state() {
        let transport = RecordingTransport::unavailable();
        let other = transport.clone();
        other.set_available(true);
        assert!(transport.is_available());

        let recorder = RecordingDestination::new("rec");
        recorder
            .clone()
            .deliver(&Event::new(DesignEvent::new("x")))
            .unwrap();
        assert_eq!(recorder.count(), 1);
    }
}
