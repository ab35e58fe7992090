//! Payload to transport call mapping.
//!
//! Argument order is positional and fixed by the backend. Optional values
//! that have no default are passed as [`WireValue::Absent`] so every later
//! argument keeps its position.

use beacon_core::{AdDetail, Command, EventPayload, WireValue};

/// The command and arguments that deliver this payload.
pub fn to_wire(payload: &EventPayload) -> (Command, Vec<WireValue>) {
    match payload {
        EventPayload::Business(e) => (
            Command::AddBusinessEvent,
            vec![
                e.currency.as_str().into(),
                e.amount.into(),
                e.item_type.as_str().into(),
                e.item_id.as_str().into(),
                or_empty(e.cart_type.as_deref()),
                e.custom_fields.clone().into(),
            ],
        ),
        EventPayload::Resource(e) => (
            Command::AddResourceEvent,
            vec![
                e.flow.code().into(),
                e.currency.as_str().into(),
                e.amount.into(),
                e.item_type.as_str().into(),
                e.item_id.as_str().into(),
                e.custom_fields.clone().into(),
            ],
        ),
        EventPayload::Progression(e) => (
            Command::AddProgressionEvent,
            vec![
                e.status.code().into(),
                e.progression01.as_str().into(),
                or_empty(e.progression02.as_deref()),
                or_empty(e.progression03.as_deref()),
                e.score.into(),
                e.custom_fields.clone().into(),
            ],
        ),
        EventPayload::Design(e) => (
            Command::AddDesignEvent,
            vec![
                e.event_id.as_str().into(),
                e.value.into(),
                e.custom_fields.clone().into(),
            ],
        ),
        EventPayload::Error(e) => (
            Command::AddErrorEvent,
            vec![
                e.severity.code().into(),
                or_empty(e.message.as_deref()),
                e.custom_fields.clone().into(),
            ],
        ),
        EventPayload::Ad(e) => {
            let mut args: Vec<WireValue> = vec![
                e.action.code().into(),
                e.ad_type.code().into(),
                e.sdk_name.as_str().into(),
                e.placement.as_str().into(),
            ];
            let command = match e.detail {
                Some(AdDetail::NoAdReason(reason)) => {
                    args.push(reason.code().into());
                    Command::AddAdEventWithNoAdReason
                }
                Some(AdDetail::Duration(secs)) => {
                    args.push(secs.into());
                    Command::AddAdEventWithDuration
                }
                None => Command::AddAdEvent,
            };
            args.push(e.custom_fields.clone().into());
            (command, args)
        }
    }
}

fn or_empty(value: Option<&str>) -> WireValue {
    value.unwrap_or_default().into()
}
