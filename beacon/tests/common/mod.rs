#![allow(dead_code)]

use beacon::{
    BoxError, Client, ClientConfig, Destination, Enricher, EnrichResult, Event, Plugin,
    testing::RecordingTransport,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Client Setup
// ============================================================================

pub fn config() -> ClientConfig {
    ClientConfig::new("gk", "sk")
}

/// A fresh client over a recording transport, plus a handle to the transport.
pub fn client() -> (Client<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::new();
    (Client::new(transport.clone()), transport)
}

/// An initialized client whose transport has forgotten the init calls.
pub fn initialized_client() -> (Client<RecordingTransport>, RecordingTransport) {
    let (client, transport) = client();
    client.init(config()).unwrap();
    transport.clear();
    (client, transport)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Test Plugins
// ============================================================================

/// Records its id into a shared order log, then passes the event on.
pub struct OrderRecordingEnricher {
    pub name: String,
    pub order: Arc<Mutex<Vec<String>>>,
}

impl OrderRecordingEnricher {
    pub fn new(name: &str, order: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            order: order.clone(),
        }
    }
}

impl Plugin for OrderRecordingEnricher {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Enricher for OrderRecordingEnricher {
    async fn enrich(&self, event: Event) -> EnrichResult {
        self.order.lock().unwrap().push(self.name.clone());
        Ok(Some(event))
    }
}

/// Counts deliveries.
pub struct CountingDestination {
    pub name: String,
    pub count: Arc<AtomicUsize>,
}

impl CountingDestination {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Plugin for CountingDestination {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Destination for CountingDestination {
    fn deliver(&self, _event: &Event) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Counts setup calls.
pub struct SetupCounter {
    pub setups: Arc<AtomicUsize>,
}

impl Plugin for SetupCounter {
    fn name(&self) -> &str {
        "setup-counter"
    }

    fn setup(&self, config: &ClientConfig) -> Result<(), BoxError> {
        assert_eq!(config.game_key, "gk");
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Destination for SetupCounter {
    fn deliver(&self, _event: &Event) -> Result<(), BoxError> {
        Ok(())
    }
}
