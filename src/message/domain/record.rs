//! Serde shape of a materialized envelope.

use super::{MessageId, MetaData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(super) struct EnvelopeRecordRef<'a, T> {
    pub(super) identifier: &'a MessageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) timestamp: Option<DateTime<Utc>>,
    pub(super) metadata: MetaData,
    pub(super) payload: &'a T,
}

#[derive(Deserialize)]
pub(super) struct EnvelopeRecord<T> {
    pub(super) identifier: MessageId,
    #[serde(default)]
    pub(super) timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) metadata: MetaData,
    pub(super) payload: T,
}
