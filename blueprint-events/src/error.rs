use blueprint_compact::CompactError;
use thiserror::Error;

/// Errors from reading or decoding an event stream
#[derive(Error, Debug)]
pub enum StreamError {
    /// The terminal frame could not be decoded. Nothing from it is trusted.
    #[error("failed to decode {event:?} frame: {source}")]
    StreamDecodeError {
        event: String,
        #[source]
        source: CompactError,
    },

    /// The underlying byte stream failed
    #[error("stream transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("parsing service returned HTTP {0}")]
    Status(u16),

    /// The stream ended before a terminal frame arrived
    #[error("stream ended before a {0:?} frame was received")]
    Incomplete(String),

    #[error("stream read was cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for StreamError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}
