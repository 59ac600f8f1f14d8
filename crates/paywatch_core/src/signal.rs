use serde::Deserialize;

/// Payload that marks the normal end of a signal stream.
pub const STREAM_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SignalStatus {
    Success,
    Other(String),
}

impl SignalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SignalStatus::Success => "SUCCESS",
            SignalStatus::Other(raw) => raw,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SignalStatus::Success)
    }
}

impl From<String> for SignalStatus {
    fn from(raw: String) -> Self {
        if raw == "SUCCESS" {
            SignalStatus::Success
        } else {
            SignalStatus::Other(raw)
        }
    }
}

/// One observed transaction outcome as pushed by the stream endpoint.
///
/// `amount` is kept as raw JSON (absent means null); `latency_ms` must be numeric.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalRecord {
    pub status: SignalStatus,
    pub currency: String,
    #[serde(default)]
    pub amount: serde_json::Value,
    pub latency_ms: serde_json::Number,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed signal payload: {0}")]
    Malformed(String),
}

pub fn decode_signal(payload: &str) -> Result<SignalRecord, DecodeError> {
    serde_json::from_str(payload).map_err(|err| DecodeError::Malformed(err.to_string()))
}
