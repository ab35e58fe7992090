//! Transport seam.
//!
//! The client talks to the analytics backend through a [`Transport`]: an
//! opaque surface that accepts a named [`Command`] with positional
//! [`WireValue`] arguments. How those calls are batched, retried or sent is
//! entirely the transport's concern.

use crate::event::FieldMap;
use std::{fmt, sync::Arc};

/// Every command the client may issue. `as_str` gives the exact wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Command {
    SetEnabledInfoLog,
    SetEnabledVerboseLog,
    SetEnabledManualSessionHandling,
    SetEventProcessInterval,
    ConfigureBuild,
    ConfigureUserId,
    ConfigureAvailableCustomDimensions01,
    ConfigureAvailableCustomDimensions02,
    ConfigureAvailableCustomDimensions03,
    ConfigureAvailableResourceCurrencies,
    ConfigureAvailableResourceItemTypes,
    Initialize,
    SetEnabledEventSubmission,
    AddBusinessEvent,
    AddResourceEvent,
    AddProgressionEvent,
    AddDesignEvent,
    AddErrorEvent,
    AddAdEvent,
    AddAdEventWithDuration,
    AddAdEventWithNoAdReason,
    SetCustomDimension01,
    SetCustomDimension02,
    SetCustomDimension03,
    SetGlobalCustomEventFields,
    StartSession,
    EndSession,
    IsRemoteConfigsReady,
    GetRemoteConfigsValueAsString,
    GetRemoteConfigsContentAsString,
    AddRemoteConfigsListener,
    RemoveRemoteConfigsListener,
    GetABTestingId,
    GetABTestingVariantId,
}

impl Command {
    /// The wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Command::SetEnabledInfoLog => "setEnabledInfoLog",
            Command::SetEnabledVerboseLog => "setEnabledVerboseLog",
            Command::SetEnabledManualSessionHandling => "setEnabledManualSessionHandling",
            Command::SetEventProcessInterval => "setEventProcessInterval",
            Command::ConfigureBuild => "configureBuild",
            Command::ConfigureUserId => "configureUserId",
            Command::ConfigureAvailableCustomDimensions01 => "configureAvailableCustomDimensions01",
            Command::ConfigureAvailableCustomDimensions02 => "configureAvailableCustomDimensions02",
            Command::ConfigureAvailableCustomDimensions03 => "configureAvailableCustomDimensions03",
            Command::ConfigureAvailableResourceCurrencies => "configureAvailableResourceCurrencies",
            Command::ConfigureAvailableResourceItemTypes => "configureAvailableResourceItemTypes",
            Command::Initialize => "initialize",
            Command::SetEnabledEventSubmission => "setEnabledEventSubmission",
            Command::AddBusinessEvent => "addBusinessEvent",
            Command::AddResourceEvent => "addResourceEvent",
            Command::AddProgressionEvent => "addProgressionEvent",
            Command::AddDesignEvent => "addDesignEvent",
            Command::AddErrorEvent => "addErrorEvent",
            Command::AddAdEvent => "addAdEvent",
            Command::AddAdEventWithDuration => "addAdEventWithDuration",
            Command::AddAdEventWithNoAdReason => "addAdEventWithNoAdReason",
            Command::SetCustomDimension01 => "setCustomDimension01",
            Command::SetCustomDimension02 => "setCustomDimension02",
            Command::SetCustomDimension03 => "setCustomDimension03",
            Command::SetGlobalCustomEventFields => "setGlobalCustomEventFields",
            Command::StartSession => "startSession",
            Command::EndSession => "endSession",
            Command::IsRemoteConfigsReady => "isRemoteConfigsReady",
            Command::GetRemoteConfigsValueAsString => "getRemoteConfigsValueAsString",
            Command::GetRemoteConfigsContentAsString => "getRemoteConfigsContentAsString",
            Command::AddRemoteConfigsListener => "addRemoteConfigsListener",
            Command::RemoveRemoteConfigsListener => "removeRemoteConfigsListener",
            Command::GetABTestingId => "getABTestingId",
            Command::GetABTestingVariantId => "getABTestingVariantId",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listener object handed to the transport for remote-config readiness.
///
/// The transport receives it behind an `Arc`; unsubscribing hands back the
/// same allocation, so transports can match listeners by pointer.
pub struct RemoteConfigsListener {
    callback: Box<dyn Fn() + Send + Sync>,
}

impl RemoteConfigsListener {
    /// Wrap a callback.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Invoked by the transport when remote configs are updated.
    pub fn on_remote_configs_updated(&self) {
        (self.callback)()
    }
}

impl fmt::Debug for RemoteConfigsListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfigsListener").finish_non_exhaustive()
    }
}

/// A positional argument to, or a reply from, a transport call.
#[derive(Debug, Clone)]
pub enum WireValue {
    /// No value in this position.
    Absent,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// List of strings.
    List(Vec<String>),
    /// Custom fields object.
    Fields(FieldMap),
    /// Remote-config listener. Compared by identity.
    Listener(Arc<RemoteConfigsListener>),
}

impl WireValue {
    /// True for [`WireValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, WireValue::Absent)
    }

    /// The string, if this is a [`WireValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean, if this is a [`WireValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Owned string, if this is a [`WireValue::Str`].
    pub fn into_string(self) -> Option<String> {
        match self {
            WireValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for WireValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (WireValue::Absent, WireValue::Absent) => true,
            (WireValue::Bool(a), WireValue::Bool(b)) => a == b,
            (WireValue::Int(a), WireValue::Int(b)) => a == b,
            (WireValue::Float(a), WireValue::Float(b)) => a == b,
            (WireValue::Str(a), WireValue::Str(b)) => a == b,
            (WireValue::List(a), WireValue::List(b)) => a == b,
            (WireValue::Fields(a), WireValue::Fields(b)) => a == b,
            (WireValue::Listener(a), WireValue::Listener(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        WireValue::Bool(value)
    }
}

impl From<i64> for WireValue {
    fn from(value: i64) -> Self {
        WireValue::Int(value)
    }
}

impl From<u8> for WireValue {
    fn from(value: u8) -> Self {
        WireValue::Int(i64::from(value))
    }
}

impl From<f64> for WireValue {
    fn from(value: f64) -> Self {
        WireValue::Float(value)
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Str(value.to_owned())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::Str(value)
    }
}

impl From<Vec<String>> for WireValue {
    fn from(value: Vec<String>) -> Self {
        WireValue::List(value)
    }
}

impl From<FieldMap> for WireValue {
    fn from(value: FieldMap) -> Self {
        WireValue::Fields(value)
    }
}

impl<T: Into<WireValue>> From<Option<T>> for WireValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(WireValue::Absent, Into::into)
    }
}

/// The opaque call surface of the analytics backend.
///
/// # Host capability
///
/// [`is_available`](Transport::is_available) reports whether the current
/// environment can dispatch at all. When it returns `false` the client treats
/// every gated method as a silent no-op and getters return their defaults.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Transport`",
    label = "missing `Transport` implementation",
    note = "Transports must implement `call`; `is_available` defaults to `true`."
)]
pub trait Transport: Send + Sync + 'static {
    /// Whether the host can dispatch.
    fn is_available(&self) -> bool {
        true
    }

    /// Issue a command. Fire-and-forget commands return [`WireValue::Absent`].
    fn call(&self, command: Command, args: Vec<WireValue>) -> WireValue;
}
