//! Event model.
//!
//! An [`Event`] is created the moment a report method is called and carries
//! one typed [`EventPayload`]. Events are values: enrichment consumes an
//! event and produces a new one, it never edits a shared instance.

use crate::codes::{AdAction, AdError, AdType, ErrorSeverity, ProgressionStatus, ResourceFlow};
use serde_json::Value;
use std::fmt;
use std::time::SystemTime;

/// Free-form custom fields attached to an event.
pub type FieldMap = serde_json::Map<String, Value>;

/// The closed set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Purchase.
    Business,
    /// Virtual currency flow.
    Resource,
    /// Progression milestone.
    Progression,
    /// Custom interaction.
    Design,
    /// Application error.
    Error,
    /// Ad impression or interaction.
    Ad,
}

impl EventKind {
    /// Lowercase name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Business => "business",
            EventKind::Resource => "resource",
            EventKind::Progression => "progression",
            EventKind::Design => "design",
            EventKind::Error => "error",
            EventKind::Ad => "ad",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase or subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessEvent {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Amount in minor units (cents).
    pub amount: i64,
    /// Item category.
    pub item_type: String,
    /// Item identifier.
    pub item_id: String,
    /// Where the purchase happened.
    pub cart_type: Option<String>,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl BusinessEvent {
    /// Create a business event without cart type or custom fields.
    pub fn new(
        currency: impl Into<String>,
        amount: i64,
        item_type: impl Into<String>,
        item_id: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount,
            item_type: item_type.into(),
            item_id: item_id.into(),
            cart_type: None,
            custom_fields: None,
        }
    }

    /// Set the cart type.
    pub fn with_cart_type(mut self, cart_type: impl Into<String>) -> Self {
        self.cart_type = Some(cart_type.into());
        self
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// A virtual currency gained or spent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEvent {
    /// Gained or spent.
    pub flow: ResourceFlow,
    /// Virtual currency name.
    pub currency: String,
    /// Amount gained or spent.
    pub amount: f64,
    /// Category.
    pub item_type: String,
    /// Specific source or sink.
    pub item_id: String,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl ResourceEvent {
    /// Create a resource event.
    pub fn new(
        flow: ResourceFlow,
        currency: impl Into<String>,
        amount: f64,
        item_type: impl Into<String>,
        item_id: impl Into<String>,
    ) -> Self {
        Self {
            flow,
            currency: currency.into(),
            amount,
            item_type: item_type.into(),
            item_id: item_id.into(),
            custom_fields: None,
        }
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// A step in a multi-step flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEvent {
    /// Flow status.
    pub status: ProgressionStatus,
    /// Top-level flow name.
    pub progression01: String,
    /// Current step.
    pub progression02: Option<String>,
    /// Sub-step.
    pub progression03: Option<String>,
    /// Completion score.
    pub score: Option<i64>,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl ProgressionEvent {
    /// Create a progression event for a top-level flow.
    pub fn new(status: ProgressionStatus, progression01: impl Into<String>) -> Self {
        Self {
            status,
            progression01: progression01.into(),
            progression02: None,
            progression03: None,
            score: None,
            custom_fields: None,
        }
    }

    /// Set the second level.
    pub fn with_progression02(mut self, step: impl Into<String>) -> Self {
        self.progression02 = Some(step.into());
        self
    }

    /// Set the third level.
    pub fn with_progression03(mut self, step: impl Into<String>) -> Self {
        self.progression03 = Some(step.into());
        self
    }

    /// Set the score.
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// A custom interaction, identified by a colon-separated hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignEvent {
    /// Event id, e.g. `ui:sidebar:toggle`.
    pub event_id: String,
    /// Optional numeric value.
    pub value: Option<f64>,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl DesignEvent {
    /// Create a design event.
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            value: None,
            custom_fields: None,
        }
    }

    /// Set the value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// An application error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    /// Severity.
    pub severity: ErrorSeverity,
    /// Description.
    pub message: Option<String>,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl ErrorEvent {
    /// Create an error event without a message.
    pub fn new(severity: ErrorSeverity) -> Self {
        Self {
            severity,
            message: None,
            custom_fields: None,
        }
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// Extra detail on an ad event. Selects the transport call variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdDetail {
    /// How long the ad was shown, in seconds.
    Duration(i64),
    /// Why the ad failed to show.
    NoAdReason(AdError),
}

/// An ad impression or interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AdEvent {
    /// Interaction.
    pub action: AdAction,
    /// Format.
    pub ad_type: AdType,
    /// Ad SDK name, e.g. `admob`.
    pub sdk_name: String,
    /// Placement identifier.
    pub placement: String,
    /// Duration or failure reason.
    pub detail: Option<AdDetail>,
    /// Custom fields.
    pub custom_fields: Option<FieldMap>,
}

impl AdEvent {
    /// Create an ad event without detail.
    pub fn new(
        action: AdAction,
        ad_type: AdType,
        sdk_name: impl Into<String>,
        placement: impl Into<String>,
    ) -> Self {
        Self {
            action,
            ad_type,
            sdk_name: sdk_name.into(),
            placement: placement.into(),
            detail: None,
            custom_fields: None,
        }
    }

    /// Attach a duration. Replaces any failure reason.
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.detail = Some(AdDetail::Duration(seconds));
        self
    }

    /// Attach a failure reason. Replaces any duration.
    pub fn with_no_ad_reason(mut self, reason: AdError) -> Self {
        self.detail = Some(AdDetail::NoAdReason(reason));
        self
    }

    /// Set the custom fields.
    pub fn with_custom_fields(mut self, fields: FieldMap) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

/// The typed attributes of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Purchase.
    Business(BusinessEvent),
    /// Virtual currency flow.
    Resource(ResourceEvent),
    /// Progression milestone.
    Progression(ProgressionEvent),
    /// Custom interaction.
    Design(DesignEvent),
    /// Application error.
    Error(ErrorEvent),
    /// Ad impression or interaction.
    Ad(AdEvent),
}

impl EventPayload {
    /// The kind of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Business(_) => EventKind::Business,
            EventPayload::Resource(_) => EventKind::Resource,
            EventPayload::Progression(_) => EventKind::Progression,
            EventPayload::Design(_) => EventKind::Design,
            EventPayload::Error(_) => EventKind::Error,
            EventPayload::Ad(_) => EventKind::Ad,
        }
    }

    /// The custom fields, if any.
    pub fn custom_fields(&self) -> Option<&FieldMap> {
        self.custom_fields_slot().as_ref()
    }

    fn custom_fields_slot(&self) -> &Option<FieldMap> {
        match self {
            EventPayload::Business(e) => &e.custom_fields,
            EventPayload::Resource(e) => &e.custom_fields,
            EventPayload::Progression(e) => &e.custom_fields,
            EventPayload::Design(e) => &e.custom_fields,
            EventPayload::Error(e) => &e.custom_fields,
            EventPayload::Ad(e) => &e.custom_fields,
        }
    }

    fn custom_fields_slot_mut(&mut self) -> &mut Option<FieldMap> {
        match self {
            EventPayload::Business(e) => &mut e.custom_fields,
            EventPayload::Resource(e) => &mut e.custom_fields,
            EventPayload::Progression(e) => &mut e.custom_fields,
            EventPayload::Design(e) => &mut e.custom_fields,
            EventPayload::Error(e) => &mut e.custom_fields,
            EventPayload::Ad(e) => &mut e.custom_fields,
        }
    }

    /// Named attributes in wire order. Absent optionals are left out.
    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        let mut attrs: Vec<(&'static str, Value)> = Vec::with_capacity(6);
        match self {
            EventPayload::Business(e) => {
                attrs.push(("currency", e.currency.clone().into()));
                attrs.push(("amount", e.amount.into()));
                attrs.push(("itemType", e.item_type.clone().into()));
                attrs.push(("itemId", e.item_id.clone().into()));
                if let Some(cart) = &e.cart_type {
                    attrs.push(("cartType", cart.clone().into()));
                }
            }
            EventPayload::Resource(e) => {
                attrs.push(("flowType", e.flow.as_str().into()));
                attrs.push(("currency", e.currency.clone().into()));
                attrs.push(("amount", e.amount.into()));
                attrs.push(("itemType", e.item_type.clone().into()));
                attrs.push(("itemId", e.item_id.clone().into()));
            }
            EventPayload::Progression(e) => {
                attrs.push(("status", e.status.as_str().into()));
                attrs.push(("progression01", e.progression01.clone().into()));
                if let Some(p) = &e.progression02 {
                    attrs.push(("progression02", p.clone().into()));
                }
                if let Some(p) = &e.progression03 {
                    attrs.push(("progression03", p.clone().into()));
                }
                if let Some(score) = e.score {
                    attrs.push(("score", score.into()));
                }
            }
            EventPayload::Design(e) => {
                attrs.push(("eventId", e.event_id.clone().into()));
                if let Some(value) = e.value {
                    attrs.push(("value", value.into()));
                }
            }
            EventPayload::Error(e) => {
                attrs.push(("severity", e.severity.as_str().into()));
                if let Some(message) = &e.message {
                    attrs.push(("message", message.clone().into()));
                }
            }
            EventPayload::Ad(e) => {
                attrs.push(("adAction", e.action.as_str().into()));
                attrs.push(("adType", e.ad_type.as_str().into()));
                attrs.push(("adSdkName", e.sdk_name.clone().into()));
                attrs.push(("adPlacement", e.placement.clone().into()));
                match e.detail {
                    Some(AdDetail::Duration(secs)) => attrs.push(("duration", secs.into())),
                    Some(AdDetail::NoAdReason(reason)) => {
                        attrs.push(("noAdReason", reason.as_str().into()))
                    }
                    None => {}
                }
            }
        }
        if let Some(fields) = self.custom_fields() {
            attrs.push(("customFields", Value::Object(fields.clone())));
        }
        attrs
    }
}

macro_rules! impl_from_payload {
    ($($ty:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for EventPayload {
                fn from(event: $ty) -> Self {
                    EventPayload::$variant(event)
                }
            }
        )+
    };
}

impl_from_payload! {
    BusinessEvent => Business,
    ResourceEvent => Resource,
    ProgressionEvent => Progression,
    DesignEvent => Design,
    ErrorEvent => Error,
    AdEvent => Ad,
}

/// An event flowing through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    payload: EventPayload,
    created_at: SystemTime,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(payload: impl Into<EventPayload>) -> Self {
        Self::at(payload, SystemTime::now())
    }

    /// Create an event with an explicit creation time.
    pub fn at(payload: impl Into<EventPayload>, created_at: SystemTime) -> Self {
        Self {
            payload: payload.into(),
            created_at,
        }
    }

    /// The event kind.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// The typed attributes.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// When the event was created. Observability only.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Named attributes in wire order.
    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        self.payload.attributes()
    }

    /// Consume the event and return its payload.
    pub fn into_payload(self) -> EventPayload {
        self.payload
    }

    /// A new event with a different payload and the same creation time.
    pub fn with_payload(self, payload: impl Into<EventPayload>) -> Self {
        Self {
            payload: payload.into(),
            created_at: self.created_at,
        }
    }

    /// A new event with one custom field inserted (or replaced).
    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .custom_fields_slot_mut()
            .get_or_insert_with(FieldMap::new)
            .insert(key.into(), value.into());
        self
    }
}
