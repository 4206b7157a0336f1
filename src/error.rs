use thiserror::Error;

/// Failures talking to the triage backend.
///
/// All variants are surfaced to the user as the same banner text; the
/// variant and its message only reach the log.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be sent or the response could not be read
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend error: {status}")]
    Status { status: u16 },

    /// Response body was not JSON
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response body was JSON but not an object
    #[error("malformed response body: expected a JSON object, got {kind}")]
    Malformed { kind: &'static str },

    /// Configured base address is not a usable URL
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
