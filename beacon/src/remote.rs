//! Remote-config readiness subscriptions.

use beacon_core::{Command, RemoteConfigsListener, Transport, WireValue};
use std::{fmt, sync::Arc};

/// Handle returned by [`Client::on_remote_configs_ready`](crate::Client::on_remote_configs_ready).
///
/// Holds the exact listener object that was handed to the transport, so that
/// [`unsubscribe`](Self::unsubscribe) can hand the same object back. Dropping
/// the handle does not unsubscribe.
pub struct RemoteConfigSubscription {
    transport: Arc<dyn Transport>,
    listener: Option<Arc<RemoteConfigsListener>>,
}

impl RemoteConfigSubscription {
    pub(crate) fn new(transport: Arc<dyn Transport>, listener: Arc<RemoteConfigsListener>) -> Self {
        Self {
            transport,
            listener: Some(listener),
        }
    }

    /// A subscription that was never registered. Unsubscribing does nothing.
    pub(crate) fn inert(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            listener: None,
        }
    }

    /// Whether a listener was registered with the transport.
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// The registered listener, if any.
    pub fn listener(&self) -> Option<&Arc<RemoteConfigsListener>> {
        self.listener.as_ref()
    }

    /// Remove the listener from the transport.
    pub fn unsubscribe(mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        if !self.transport.is_available() {
            tracing::trace!("host unavailable, remote config unsubscribe skipped");
            return;
        }
        self.transport.call(
            Command::RemoveRemoteConfigsListener,
            vec![WireValue::Listener(listener)],
        );
    }
}

impl fmt::Debug for RemoteConfigSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfigSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
