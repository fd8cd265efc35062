//! Client-side error surface.
//!
//! The registry protocol distinguishes several not-exists codes; the
//! client collapses every non-success code into [`ClientApiError::CallFailed`]
//! and keeps the raw code/message for callers that want to look.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientApiError {
    /// The registry answered with a non-success result code.
    #[error("registry call failed: code={code} msg={msg}")]
    CallFailed { code: u32, msg: String },

    /// No reply within the client timeout.
    #[error("registry call timed out after {0:?}")]
    Timeout(Duration),

    /// Failure raised by the underlying transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport returned a reply shape the method does not produce.
    #[error("unexpected reply shape for {method}")]
    UnexpectedReply { method: &'static str },

    /// A successful reply was missing its payload.
    #[error("reply for {method} carried no data")]
    MissingData { method: &'static str },

    /// Opaque payload failed to base64-decode.
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}
