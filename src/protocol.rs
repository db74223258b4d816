//! Wire Protocol
//!
//! JSON text frames exchanged with the device controller:
//!
//! - client → device: `{"state": "on" | "off"}`
//! - device → client: any JSON object with a `status` field

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Binary LED state as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedStatus {
    On,
    Off,
}

impl LedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// The logical complement of this state.
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Exact match against the wire names; anything else is `None`.
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Outbound request asking the device to switch to `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleRequest {
    pub state: LedStatus,
}

impl ToggleRequest {
    pub fn new(state: LedStatus) -> Self {
        Self { state }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Inbound status report.
///
/// Only `status` drives the client. The device firmware attaches `error` and
/// `message` to its rejection replies, those are kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub status: String,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Parse a text frame into a [`StatusReport`] without enforcing any schema.
///
/// The `status` value is rendered as text: strings as-is, missing or `null`
/// as empty, anything else as compact JSON. A bare `null` payload has no
/// fields to read and is an error.
pub fn parse_status_report(text: &str) -> Result<StatusReport, serde_json::Error> {
    let json: Value = serde_json::from_str(text)?;

    if json.is_null() {
        return Err(serde::de::Error::custom("cannot read status of null"));
    }

    Ok(StatusReport {
        status: display_text(json.get("status")),
        error: json.get("error").map(|v| display_text(Some(v))),
        message: json.get("message").map(|v| display_text(Some(v))),
    })
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
