//! Codecs reaching foreign representations through a shared registry.

use super::helpers::{OrderPlaced, at_minute};
use eyre::{Result, WrapErr};
use missive::message::domain::{Envelope, EventMessage, MessageId, MetaData};
use missive::serialization::{
    adapters::json::{JsonSerializer, TypeRegistration},
    domain::{RepresentationType, SerializedObject, SerializedType},
    ports::{FnConverter, Serializer, SerializerExt},
    services::ConverterRegistry,
};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

/// A transport frame: a one-byte version tag followed by the body.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame(Vec<u8>);

const FRAME_VERSION: u8 = 1;

fn shared_registry() -> Arc<ConverterRegistry> {
    let registry = ConverterRegistry::new();
    registry.register(FnConverter::new(|bytes: &Vec<u8>| {
        let mut framed = Vec::with_capacity(bytes.len() + 1);
        framed.push(FRAME_VERSION);
        framed.extend_from_slice(bytes);
        Ok(Frame(framed))
    }));
    registry.register(FnConverter::new(|frame: &Frame| match frame.0.split_first() {
        Some((&FRAME_VERSION, body)) => Ok(body.to_vec()),
        Some((version, _)) => Err(format!("unsupported frame version {version}")),
        None => Err("empty frame".to_owned()),
    }));
    Arc::new(registry)
}

fn framed_codec(registry: &Arc<ConverterRegistry>) -> Result<Arc<JsonSerializer>> {
    let codec = JsonSerializer::builder()
        .with_converters(Arc::clone(registry))
        .register(TypeRegistration::of::<OrderPlaced>("shop.OrderPlaced"))
        .build()
        .wrap_err("build codec")?;
    Ok(Arc::new(codec))
}

fn placed() -> OrderPlaced {
    OrderPlaced {
        order_id: "o-7".to_owned(),
        quantity: 9,
    }
}

#[rstest]
fn codec_serializes_into_plugged_in_representation() -> Result<()> {
    let registry = shared_registry();
    let codec = framed_codec(&registry)?;

    assert!(codec.can_serialize_to_type::<Frame>());
    let framed = codec.serialize_to::<Frame>(&placed())?;

    let frame = framed.try_data::<Frame>()?;
    assert_eq!(frame.0.first(), Some(&FRAME_VERSION));
    assert_eq!(codec.deserialize_into::<OrderPlaced>(&framed)?, placed());
    Ok(())
}

#[rstest]
fn framed_text_is_reachable_through_a_chain() -> Result<()> {
    let registry = shared_registry();
    let codec = framed_codec(&registry)?;
    let framed = codec.serialize_to::<Frame>(&placed())?;

    let text = registry.convert_to::<String>(&framed)?;
    let document = registry.convert(&framed, RepresentationType::of::<Value>())?;

    assert_eq!(
        text.data::<String>().map(String::as_str),
        Some(r#"{"order_id":"o-7","quantity":9}"#)
    );
    assert_eq!(
        document.data::<Value>().and_then(|value| value.get("quantity")),
        Some(&Value::from(9))
    );
    assert_eq!(text.serialized_type(), framed.serialized_type());
    Ok(())
}

#[rstest]
fn lazy_event_decodes_framed_payload() -> Result<()> {
    let registry = shared_registry();
    let codec = framed_codec(&registry)?;
    let payload = codec.serialize_to::<Frame>(&placed())?;
    let metadata = codec.serialize_to::<Frame>(&MetaData::from_iter([("trace", "t7")]))?;

    let event = EventMessage::<OrderPlaced>::from_serialized(
        MessageId::from("evt-7"),
        at_minute(7)?,
        payload,
        metadata,
        codec,
    )?;

    assert_eq!(event.payload()?, &placed());
    assert_eq!(event.metadata()?.len(), 1);
    Ok(())
}

#[rstest]
fn bad_frame_surfaces_when_payload_is_read() -> Result<()> {
    let registry = shared_registry();
    let codec = framed_codec(&registry)?;
    let metadata = codec.serialize_to::<Frame>(&MetaData::empty())?;
    let payload = SerializedObject::new(
        Frame(vec![9, b'{', b'}']),
        SerializedType::unrevisioned("shop.OrderPlaced"),
    );

    let event = EventMessage::<OrderPlaced>::from_serialized(
        MessageId::from("evt-8"),
        at_minute(8)?,
        payload,
        metadata,
        Arc::clone(&codec) as Arc<dyn Serializer>,
    )?;

    let err = event.payload().expect_err("frame version 9 is unsupported");
    assert!(err.to_string().contains("unsupported frame version 9"));
    Ok(())
}
