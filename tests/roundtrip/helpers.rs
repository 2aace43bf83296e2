//! Shared fixtures for round-trip integration tests.

use chrono::{DateTime, TimeZone, Utc};
use eyre::{Result, WrapErr};
use missive::message::domain::{Envelope, EventMessage, MessageId};
use missive::serialization::{
    adapters::json::{JsonSerializer, TypeRegistration},
    domain::SerializedObject,
    ports::SerializerExt,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Event recorded when an order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: String,
    pub quantity: u32,
}

/// Event recorded when an order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShipped {
    pub order_id: String,
    pub carrier: String,
}

/// A stored event row, as an event store would hand it back.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub identifier: MessageId,
    pub timestamp: DateTime<Utc>,
    pub payload: SerializedObject,
    pub metadata: SerializedObject,
}

/// Builds the codec used by the integration tests.
pub fn shop_codec() -> Result<Arc<JsonSerializer>> {
    let codec = JsonSerializer::builder()
        .register(TypeRegistration::of::<OrderPlaced>("shop.OrderPlaced").with_revision("1"))
        .register(TypeRegistration::of::<OrderShipped>("shop.OrderShipped"))
        .build()
        .wrap_err("register shop event types")?;
    Ok(Arc::new(codec))
}

/// Returns a fixed point in time offset by `minutes`.
pub fn at_minute(minutes: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, minutes, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid minute {minutes}"))
}

/// Persists an event the way an event store would: payload and metadata as
/// UTF-8 JSON text.
pub fn store<T: Send + Sync + 'static>(
    codec: &JsonSerializer,
    event: &EventMessage<T>,
) -> Result<StoredEvent> {
    let payload = event.payload().wrap_err("read payload")?;
    let metadata = event.metadata().wrap_err("read metadata")?;
    Ok(StoredEvent {
        identifier: event.identifier().clone(),
        timestamp: event.timestamp(),
        payload: codec
            .serialize_to::<String>(payload)
            .wrap_err("serialize payload")?,
        metadata: codec
            .serialize_to::<String>(&metadata)
            .wrap_err("serialize metadata")?,
    })
}
