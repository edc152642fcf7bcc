use serde::{Deserialize, Serialize};
use tracing::debug;

use webrec_core_types::{ElementDescriptor, PageContext, RecError};

use crate::errors::ProbeError;

/// Prefix of relay lines on the console side channel.
pub const RELAY_PREFIX: &str = "RECORDER_EVENT:";

/// One captured interaction as relayed by the probe.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbePayload {
    pub window_id: String,
    pub event_type: String,
    #[serde(default)]
    pub element: ElementDescriptor,
    #[serde(default)]
    pub page: PageContext,
    #[serde(default)]
    pub event_data: serde_json::Value,
    #[serde(default)]
    pub timestamp: f64,
}

/// Parse a console line from the relay channel.
///
/// Returns `Ok(None)` for unrelated console output; an error only for lines
/// that claim the relay prefix but carry an unreadable payload.
pub fn parse_console_line(line: &str) -> Result<Option<ProbePayload>, RecError> {
    let Some(rest) = line.strip_prefix(RELAY_PREFIX) else {
        return Ok(None);
    };
    let Some((event_type, json)) = rest.split_once(':') else {
        return Err(ProbeError::MalformedPayload.into_rec_error("missing payload separator"));
    };

    let payload: ProbePayload = serde_json::from_str(json)
        .map_err(|err| ProbeError::MalformedPayload.into_rec_error(err.to_string()))?;

    if payload.event_type != event_type {
        debug!(
            line_type = event_type,
            payload_type = %payload.event_type,
            "relay line type mismatch, trusting payload"
        );
    }
    Ok(Some(payload))
}
