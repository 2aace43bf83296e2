//! Replaying a stream of stored events of mixed types.

use super::helpers::{OrderPlaced, OrderShipped, StoredEvent, at_minute, shop_codec, store};
use eyre::{Result, ensure};
use missive::message::domain::{Envelope, EventMessage, MessageId, MetaData};
use missive::serialization::{
    adapters::json::JsonSerializer,
    domain::{DynamicPayload, SerializedObject, SerializedType},
    error::SerializationError,
    ports::Serializer,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

struct Stream {
    codec: Arc<JsonSerializer>,
    rows: Vec<StoredEvent>,
}

#[fixture]
fn stream() -> Stream {
    build_stream().expect("stream fixture")
}

fn build_stream() -> Result<Stream> {
    let codec = shop_codec()?;
    let placed = EventMessage::from_parts(
        MessageId::from("evt-1"),
        OrderPlaced {
            order_id: "o-1".to_owned(),
            quantity: 4,
        },
        MetaData::empty(),
        at_minute(1)?,
    );
    let shipped = EventMessage::from_parts(
        MessageId::from("evt-2"),
        OrderShipped {
            order_id: "o-1".to_owned(),
            carrier: "post".to_owned(),
        },
        MetaData::from_iter([("trace", "t2")]),
        at_minute(2)?,
    );
    let mut rows = vec![store(&codec, &placed)?, store(&codec, &shipped)?];

    let retired = store(&codec, &placed)?;
    rows.push(StoredEvent {
        identifier: MessageId::from("evt-3"),
        timestamp: at_minute(3)?,
        payload: SerializedObject::new(
            r#"{"reason":"gone"}"#.to_owned(),
            SerializedType::new("shop.OrderRefunded", Some("4")),
        ),
        metadata: retired.metadata,
    });
    Ok(Stream { codec, rows })
}

fn replay(stream: &Stream) -> Result<Vec<EventMessage<DynamicPayload>>> {
    stream
        .rows
        .iter()
        .cloned()
        .map(|row| {
            EventMessage::from_serialized(
                row.identifier,
                row.timestamp,
                row.payload,
                row.metadata,
                Arc::clone(&stream.codec) as Arc<dyn Serializer>,
            )
            .map_err(eyre::Report::from)
        })
        .collect()
}

#[rstest]
fn replay_skips_events_of_unknown_type(stream: Stream) -> Result<()> {
    let events = replay(&stream)?;

    let known: Vec<_> = events
        .iter()
        .filter(|event| !event.payload_type().is_unknown())
        .collect();
    ensure!(known.len() == 2, "expected two known events, got {}", known.len());

    let placed = known
        .iter()
        .find_map(|event| event.payload().ok()?.downcast_ref::<OrderPlaced>().cloned());
    let shipped = known
        .iter()
        .find_map(|event| event.payload().ok()?.downcast_ref::<OrderShipped>().cloned());
    assert_eq!(placed.map(|event| event.quantity), Some(4));
    assert_eq!(shipped.map(|event| event.carrier), Some("post".to_owned()));
    Ok(())
}

#[rstest]
fn unknown_event_keeps_identity_metadata_and_timestamp(stream: Stream) -> Result<()> {
    let events = replay(&stream)?;
    let retired = events
        .iter()
        .find(|event| event.payload_type().is_unknown())
        .ok_or_else(|| eyre::eyre!("retired event missing"))?;

    assert_eq!(retired.identifier().as_str(), "evt-3");
    assert_eq!(retired.timestamp(), at_minute(3)?);
    assert!(retired.metadata()?.is_empty());
    assert!(matches!(
        retired.payload(),
        Err(SerializationError::UnresolvedType(_))
    ));
    Ok(())
}

#[rstest]
fn payload_types_resolve_without_decoding(stream: Stream) -> Result<()> {
    let events = replay(&stream)?;

    ensure!(
        events.iter().all(|event| !event.is_payload_materialized()),
        "resolution must not decode payloads"
    );
    let resolved: Vec<bool> = events
        .iter()
        .map(|event| event.payload_type().is::<OrderShipped>())
        .collect();
    assert_eq!(resolved, vec![false, true, false]);
    Ok(())
}
