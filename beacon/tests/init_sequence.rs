use beacon::{
    Client, ClientConfig, Command, CustomDimensions, Stage, WireValue, testing::RecordingTransport,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{SetupCounter, client, config};

fn strings(values: &[&str]) -> WireValue {
    WireValue::List(values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn test_minimal_init_only_initializes() {
    let (client, transport) = client();
    assert!(!client.is_initialized());

    client.init(config()).unwrap();

    assert!(client.is_initialized());
    assert_eq!(
        transport.calls(),
        vec![(
            Command::Initialize,
            vec![WireValue::from("gk"), WireValue::from("sk")]
        )]
    );
}

#[test]
fn test_full_init_order() {
    let (client, transport) = client();
    let config = ClientConfig::new("gk", "sk")
        .with_debug(true)
        .with_verbose(true)
        .with_manual_session_handling(true)
        .with_event_process_interval(750)
        .with_build("1.2.3")
        .with_user_id("user-7")
        .with_custom_dimensions(CustomDimensions {
            dimension01: Some(vec!["free".into(), "pro".into()]),
            dimension02: None,
            dimension03: Some(vec!["eu".into()]),
        })
        .with_resource_currencies(["credits"])
        .with_resource_item_types(["export", "referral"]);

    client.init(config).unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            (Command::SetEnabledInfoLog, vec![WireValue::Bool(true)]),
            (Command::SetEnabledVerboseLog, vec![WireValue::Bool(true)]),
            (Command::SetEnabledManualSessionHandling, vec![WireValue::Bool(true)]),
            (Command::SetEventProcessInterval, vec![WireValue::Float(0.75)]),
            (Command::ConfigureBuild, vec![WireValue::from("1.2.3")]),
            (Command::ConfigureUserId, vec![WireValue::from("user-7")]),
            (
                Command::ConfigureAvailableCustomDimensions01,
                vec![strings(&["free", "pro"])]
            ),
            (Command::ConfigureAvailableCustomDimensions03, vec![strings(&["eu"])]),
            (Command::ConfigureAvailableResourceCurrencies, vec![strings(&["credits"])]),
            (
                Command::ConfigureAvailableResourceItemTypes,
                vec![strings(&["export", "referral"])]
            ),
            (
                Command::Initialize,
                vec![WireValue::from("gk"), WireValue::from("sk")]
            ),
        ]
    );
}

#[test]
fn test_whole_second_interval() {
    let (client, transport) = client();
    client
        .init(config().with_event_process_interval(5000))
        .unwrap();

    assert_eq!(
        transport.calls_for(Command::SetEventProcessInterval),
        vec![vec![WireValue::Float(5.0)]]
    );
}

#[test]
fn test_empty_build_and_user_id_are_skipped() {
    let (client, transport) = client();
    client.init(config().with_build("").with_user_id("")).unwrap();
    assert_eq!(transport.commands(), vec![Command::Initialize]);
}

#[test]
fn test_disabled_config_disables_after_initialize() {
    let (client, transport) = client();
    client.init(config().with_enabled(false)).unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            (
                Command::Initialize,
                vec![WireValue::from("gk"), WireValue::from("sk")]
            ),
            (Command::SetEnabledEventSubmission, vec![WireValue::Bool(false)]),
        ]
    );
}

#[test]
fn test_second_init_is_silent() {
    let (client, transport) = client();
    client.init(config()).unwrap();
    transport.clear();

    client
        .init(ClientConfig::new("other", "keys").with_debug(true))
        .unwrap();

    assert_eq!(transport.count(), 0);
    assert_eq!(client.config().map(|c| c.game_key.as_str()), Some("gk"));
}

#[test]
fn test_invalid_config_is_rejected_without_calls() {
    let (client, transport) = client();
    assert!(client.init(ClientConfig::new("", "sk")).is_err());
    assert_eq!(transport.count(), 0);
    assert!(!client.is_initialized());
}

#[test]
fn test_plugins_are_set_up_before_initialize() {
    let (client, _transport) = client();
    let setups = Arc::new(AtomicUsize::new(0));
    client
        .add_plugin(Stage::destination(SetupCounter {
            setups: setups.clone(),
        }))
        .unwrap();

    assert_eq!(setups.load(Ordering::SeqCst), 0);
    client.init(config()).unwrap();
    assert_eq!(setups.load(Ordering::SeqCst), 1);

    // Init is not repeated, and neither is setup.
    client.init(config()).unwrap();
    assert_eq!(setups.load(Ordering::SeqCst), 1);
}

#[test]
fn test_late_plugin_is_set_up_on_registration() {
    let (client, _transport) = client();
    client.init(config()).unwrap();

    let setups = Arc::new(AtomicUsize::new(0));
    client
        .add_plugin(Stage::destination(SetupCounter {
            setups: setups.clone(),
        }))
        .unwrap();
    assert_eq!(setups.load(Ordering::SeqCst), 1);
}

#[test]
fn test_enable_disable_do_not_require_init() {
    let transport = RecordingTransport::new();
    let client = Client::new(transport.clone());

    client.disable();
    client.enable();

    assert_eq!(
        transport.calls(),
        vec![
            (Command::SetEnabledEventSubmission, vec![WireValue::Bool(false)]),
            (Command::SetEnabledEventSubmission, vec![WireValue::Bool(true)]),
        ]
    );
}

#[test]
fn test_config_from_json_drives_init() {
    let (client, transport) = client();
    let config = ClientConfig::from_json_str(
        r#"{"gameKey": "gk", "secretKey": "sk", "manualSessionHandling": true}"#,
    )
    .unwrap();

    client.init(config).unwrap();

    assert_eq!(
        transport.commands(),
        vec![Command::SetEnabledManualSessionHandling, Command::Initialize]
    );
}
