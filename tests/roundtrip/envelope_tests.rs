//! Storing and reconstructing envelopes through the JSON codec.

use super::helpers::{OrderPlaced, at_minute, shop_codec, store};
use eyre::{Result, WrapErr, ensure};
use missive::message::domain::{Backing, Envelope, EventMessage, Message, MessageId, MetaData};
use missive::serialization::ports::SerializerExt;
use rstest::rstest;
use serde_json::json;

fn placed() -> OrderPlaced {
    OrderPlaced {
        order_id: "o-100".to_owned(),
        quantity: 2,
    }
}

#[rstest]
fn stored_event_reconstructs_with_identity_and_timestamp() -> Result<()> {
    let codec = shop_codec()?;
    let original = EventMessage::from_parts(
        MessageId::from("evt-1"),
        placed(),
        MetaData::from_iter([("trace", "t1")]),
        at_minute(5)?,
    );
    let row = store(&codec, &original)?;

    let restored = EventMessage::<OrderPlaced>::from_serialized(
        row.identifier,
        row.timestamp,
        row.payload,
        row.metadata,
        codec,
    )
    .wrap_err("reconstruct event")?;

    ensure!(restored.backing() == Backing::LazyBacked, "expected lazy backing");
    ensure!(!restored.is_payload_materialized(), "payload decoded too early");
    assert_eq!(restored.identifier(), original.identifier());
    assert_eq!(restored.timestamp(), original.timestamp());
    assert_eq!(restored.payload()?, &placed());
    assert_eq!(restored.metadata()?, original.metadata()?);
    Ok(())
}

#[rstest]
fn metadata_siblings_of_stored_event_share_decoding() -> Result<()> {
    let codec = shop_codec()?;
    let original = EventMessage::from_parts(
        MessageId::from("evt-2"),
        placed(),
        MetaData::empty(),
        at_minute(6)?,
    );
    let row = store(&codec, &original)?;
    let restored = EventMessage::<OrderPlaced>::from_serialized(
        row.identifier,
        row.timestamp,
        row.payload,
        row.metadata,
        codec,
    )?;

    let tagged = restored.and_metadata(MetaData::from_iter([("tenant", "acme")]))?;
    ensure!(!tagged.is_payload_materialized(), "tagging must not decode");

    assert_eq!(tagged.payload()?.quantity, 2);
    ensure!(restored.is_payload_materialized(), "siblings share the payload cell");
    assert_eq!(tagged.metadata()?.get("tenant"), Some(&json!("acme")));
    assert!(restored.metadata()?.is_empty());
    Ok(())
}

#[rstest]
fn snapshot_crosses_a_lazy_unaware_boundary() -> Result<()> {
    let codec = shop_codec()?;
    let original = EventMessage::from_parts(
        MessageId::from("evt-3"),
        placed(),
        MetaData::from_iter([("trace", "t3")]),
        at_minute(7)?,
    );
    let row = store(&codec, &original)?;
    let restored = EventMessage::<OrderPlaced>::from_serialized(
        row.identifier,
        row.timestamp,
        row.payload,
        row.metadata,
        codec,
    )?;

    let snapshot = restored.snapshot()?;
    let persisted = serde_json::to_string(&snapshot).wrap_err("persist snapshot")?;
    let reloaded: EventMessage<OrderPlaced> =
        serde_json::from_str(&persisted).wrap_err("reload snapshot")?;

    assert_eq!(reloaded.backing(), Backing::Eager);
    assert_eq!(reloaded.identifier(), original.identifier());
    assert_eq!(reloaded.timestamp(), original.timestamp());
    assert_eq!(reloaded.payload()?, &placed());
    assert_eq!(reloaded.metadata()?, original.metadata()?);
    Ok(())
}

#[rstest]
fn message_round_trips_through_every_representation() -> Result<()> {
    let codec = shop_codec()?;
    let metadata = codec.serialize_to::<serde_json::Value>(&MetaData::from_iter([("k", "v")]))?;
    let payload = codec.serialize_to::<Vec<u8>>(&placed())?;

    let message = Message::<OrderPlaced>::from_serialized(
        MessageId::from("msg-1"),
        payload,
        metadata,
        codec,
    )?;

    assert_eq!(message.payload()?, &placed());
    assert_eq!(message.metadata()?.get("k"), Some(&json!("v")));
    Ok(())
}
