use beacon::{Command, WireValue};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::client;

#[test]
fn test_unsubscribe_passes_the_registered_listener() {
    let (client, transport) = client();
    let subscription = client.on_remote_configs_ready(|| {});
    assert!(subscription.is_active());

    let registered = transport.calls_for(Command::AddRemoteConfigsListener);
    let WireValue::Listener(listener) = &registered[0][0] else {
        panic!("expected a listener argument");
    };
    let listener = listener.clone();

    subscription.unsubscribe();

    let removed = transport.calls_for(Command::RemoveRemoteConfigsListener);
    let WireValue::Listener(removed) = &removed[0][0] else {
        panic!("expected a listener argument");
    };
    assert!(Arc::ptr_eq(&listener, removed));
}

#[test]
fn test_each_subscription_gets_its_own_listener() {
    let (client, transport) = client();
    let first = client.on_remote_configs_ready(|| {});
    let _second = client.on_remote_configs_ready(|| {});

    let registered = transport.calls_for(Command::AddRemoteConfigsListener);
    assert_ne!(registered[0][0], registered[1][0]);

    first.unsubscribe();
    let removed = transport.calls_for(Command::RemoveRemoteConfigsListener);
    assert_eq!(removed[0][0], registered[0][0]);
}

#[test]
fn test_listener_reaches_callback() {
    let (client, _transport) = client();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let subscription = client.on_remote_configs_ready(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    subscription.listener().unwrap().on_remote_configs_updated();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_getters_read_transport_replies() {
    let (client, transport) = client();
    transport.set_reply(Command::IsRemoteConfigsReady, true);
    transport.set_reply(Command::GetRemoteConfigsValueAsString, "blue");
    transport.set_reply(Command::GetRemoteConfigsContentAsString, r#"{"theme":"blue"}"#);
    transport.set_reply(Command::GetABTestingId, "exp-1");
    transport.set_reply(Command::GetABTestingVariantId, "variant-b");

    assert!(client.is_remote_configs_ready());
    assert_eq!(
        client.get_remote_config("theme", Some("red")).as_deref(),
        Some("blue")
    );
    assert_eq!(client.get_all_remote_configs(), r#"{"theme":"blue"}"#);
    assert_eq!(client.get_ab_testing_id(), "exp-1");
    assert_eq!(client.get_ab_testing_variant_id(), "variant-b");

    assert_eq!(
        transport.calls_for(Command::GetRemoteConfigsValueAsString),
        vec![vec![WireValue::from("theme"), WireValue::from("red")]]
    );
}

#[test]
fn test_getters_fall_back_without_replies() {
    let (client, transport) = client();

    assert!(!client.is_remote_configs_ready());
    assert_eq!(
        client.get_remote_config("theme", Some("red")).as_deref(),
        Some("red")
    );
    assert_eq!(client.get_remote_config("theme", None), None);
    assert_eq!(client.get_all_remote_configs(), "");
    assert_eq!(client.get_ab_testing_id(), "");

    assert_eq!(
        transport.calls_for(Command::GetRemoteConfigsValueAsString)[1],
        vec![WireValue::from("theme"), WireValue::from("")]
    );
}
