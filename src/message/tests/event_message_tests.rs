//! Unit tests for the event envelope.

use crate::message::domain::{Backing, Envelope, EventMessage, Message, MessageId, MetaData};
use crate::serialization::{
    adapters::json::{JsonSerializer, TypeRegistration},
    ports::SerializerExt,
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn occurred_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn evt_1(occurred_at: DateTime<Utc>) -> EventMessage<Value> {
    EventMessage::from_parts(
        MessageId::from("evt-1"),
        json!({"x": 1}),
        MetaData::empty(),
        occurred_at,
    )
}

fn stored_event(occurred_at: DateTime<Utc>) -> EventMessage<Value> {
    let codec = Arc::new(
        JsonSerializer::builder()
            .register(TypeRegistration::of::<Value>("order"))
            .build()
            .expect("valid registrations"),
    );
    let payload = codec
        .serialize_to::<String>(&json!({"x": 1}))
        .expect("payload");
    let metadata = codec
        .serialize_to::<String>(&MetaData::empty())
        .expect("metadata");
    EventMessage::from_serialized(MessageId::from("evt-1"), occurred_at, payload, metadata, codec)
        .expect("stored event")
}

#[rstest]
fn new_captures_the_clock_time() {
    let before = Utc::now();
    let event = EventMessage::new(json!({"x": 1}), &DefaultClock);
    let after = Utc::now();

    let timestamp = event.timestamp();
    assert!(
        timestamp >= before && timestamp <= after,
        "timestamp {timestamp} should be between {before} and {after}"
    );
    assert!(event.metadata().expect("eager").is_empty());
}

#[rstest]
fn new_with_metadata_keeps_supplied_metadata() {
    let event = EventMessage::new_with_metadata(
        json!({"x": 1}),
        MetaData::from_iter([("tenant", "acme")]),
        &DefaultClock,
    );

    assert_eq!(
        event.metadata().expect("eager").get("tenant"),
        Some(&json!("acme"))
    );
}

#[rstest]
#[case(MetaData::from_iter([("a", 1)]))]
#[case(MetaData::from_iter([("trace", "t1"), ("user", "u1")]))]
fn metadata_siblings_keep_identifier_and_timestamp(
    evt_1: EventMessage<Value>,
    occurred_at: DateTime<Utc>,
    #[case] metadata: MetaData,
) {
    let replaced = evt_1.with_metadata(metadata.clone());
    let merged = evt_1.and_metadata(metadata).expect("eager metadata");

    for sibling in [replaced, merged] {
        assert_eq!(sibling.identifier(), evt_1.identifier());
        assert_eq!(sibling.timestamp(), occurred_at);
        assert!(!sibling.same_instance(&evt_1));
    }
}

#[rstest]
fn no_op_updates_return_same_instance(evt_1: EventMessage<Value>) {
    assert!(evt_1.with_metadata(MetaData::empty()).same_instance(&evt_1));
    assert!(
        evt_1
            .and_metadata(MetaData::empty())
            .expect("eager")
            .same_instance(&evt_1)
    );
}

#[rstest]
fn scenario_original_metadata_is_untouched(evt_1: EventMessage<Value>) {
    let traced = evt_1
        .and_metadata(MetaData::from_iter([("trace", "t1")]))
        .expect("eager metadata");

    assert_eq!(traced.metadata().expect("eager").len(), 1);
    assert_eq!(evt_1.metadata().expect("eager").len(), 0);
}

#[rstest]
fn stored_event_decodes_lazily(occurred_at: DateTime<Utc>) {
    let event = stored_event(occurred_at);

    assert_eq!(event.backing(), Backing::LazyBacked);
    assert!(event.payload_type().is::<Value>());
    assert!(!event.is_payload_materialized());
    assert_eq!(event.timestamp(), occurred_at);

    assert_eq!(event.payload().ok(), Some(&json!({"x": 1})));
    assert!(event.is_payload_materialized());
}

#[rstest]
fn snapshot_keeps_timestamp(occurred_at: DateTime<Utc>) {
    let event = stored_event(occurred_at);

    let snapshot = event.snapshot().expect("decodable");

    assert_eq!(snapshot.backing(), Backing::Eager);
    assert_eq!(snapshot.timestamp(), occurred_at);
    assert_eq!(snapshot.identifier(), event.identifier());
    assert_eq!(snapshot.payload().ok(), Some(&json!({"x": 1})));
}

#[rstest]
fn wraps_an_existing_message(occurred_at: DateTime<Utc>) {
    let message = Message::from_parts(MessageId::from("evt-2"), 5_u32, MetaData::empty());

    let event = EventMessage::from_message(message.clone(), occurred_at);

    assert!(event.message().same_instance(&message));
    assert_eq!(event.shared_payload().map(|value| *value).ok(), Some(5));
}

#[rstest]
fn serde_round_trip_includes_timestamp(occurred_at: DateTime<Utc>) {
    let event = stored_event(occurred_at);

    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json.get("timestamp"), Some(&json!("2024-05-01T12:30:00Z")));
    assert_eq!(json.get("payload"), Some(&json!({"x": 1})));

    let restored: EventMessage<Value> = serde_json::from_value(json).expect("deserialize");
    assert_eq!(restored.timestamp(), occurred_at);
    assert_eq!(restored.identifier(), event.identifier());
    assert_eq!(restored.backing(), Backing::Eager);
}

#[rstest]
fn serde_requires_timestamp() {
    let result =
        serde_json::from_value::<EventMessage<Value>>(json!({"identifier": "evt-1", "payload": 1}));
    assert!(result.is_err());
}

#[rstest]
fn displays_identifier(evt_1: EventMessage<Value>) {
    assert_eq!(evt_1.to_string(), "EventMessage[evt-1]");
}
