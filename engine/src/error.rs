use thiserror::Error;

/// Errors produced at the engine's decode boundaries.
///
/// Resolution itself never returns these: malformed payloads collapse to
/// documented defaults and dangling connections are skipped. The error
/// type exists for snapshot load/save and data-URI decoding, where the
/// caller can still do something meaningful with the failure.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Malformed data URI: {0}")]
    DataUri(String),
}
