//! Client-visible lifecycle signals
//!
//! The host application's event source is opaque to the engine; its signals
//! are normalized into [`LifecycleEvent`] values before they reach the
//! adapter. The serde wire names match the host's signal kinds so recorded
//! sessions serialize to a stable JSON shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a custom operation message.
///
/// The operation id is an explicit tag; the data travels opaquely to
/// whatever host handler consumes it. Dispatching on a tag instead of "the
/// first key of a map" keeps the measured id stable under JSON codecs that
/// do not preserve key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPayload {
    /// Logical measurement id of the operation.
    pub operation_id: String,
    /// Opaque payload handed through to the host's handler.
    #[serde(default)]
    pub data: Value,
}

/// A client-visible lifecycle signal from the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// An output began recalculating.
    Recalculating {
        /// Id of the output element.
        output_id: String,
    },
    /// An output's new value reached the client.
    ValueCommitted {
        /// Id of the output element.
        output_id: String,
    },
    /// The server started working on a computation round-trip.
    ServerBusy,
    /// The server finished and went idle.
    ServerIdle,
    /// A generic host message, optionally carrying a custom operation.
    CustomMessage {
        /// Present when the message names a measurable operation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<CustomPayload>,
    },
}

impl LifecycleEvent {
    /// Wire name of the signal kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Recalculating { .. } => "recalculating",
            Self::ValueCommitted { .. } => "value-committed",
            Self::ServerBusy => "server-busy",
            Self::ServerIdle => "server-idle",
            Self::CustomMessage { .. } => "custom-message",
        }
    }
}
