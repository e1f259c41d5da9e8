//! One parse session: progress updates, then a terminal save-data frame

use crate::{EventRouter, EventStreamReader, Flow, Outcome, StreamError};
use blueprint_compact::{CompactPayload, DecodedPayload};
use blueprint_shared::ProgressUpdate;
use blueprint_shared::api::{EVENT_PROGRESS, EVENT_SAVE_DATA};
use tokio_stream::Stream;

/// Parse a progress payload into a 0-100 percentage.
///
/// Accepts `{"progress": N}` or a bare number. Values above 100 are clamped;
/// anything else (negative, non-numeric, not JSON) is `None`.
pub fn parse_progress(payload: &str) -> Option<u8> {
    serde_json::from_str::<ProgressUpdate>(payload).ok()?.percent()
}

/// Drive `reader` until the `save-data` frame arrives and return its decoded tables.
///
/// Progress frames call `on_progress`; malformed ones are logged and skipped. A
/// malformed save-data frame fails the whole read with
/// [`StreamError::StreamDecodeError`]. The stream is released as soon as the
/// save-data frame has been handled.
pub async fn read_parse_events<S, B, E, F>(
    reader: &mut EventStreamReader<S>,
    mut on_progress: F,
) -> Result<DecodedPayload, StreamError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    F: FnMut(u8) + Send,
{
    let mut result = None;

    let outcome = {
        let mut router = EventRouter::new();
        router.on(EVENT_PROGRESS, |frame| {
            match parse_progress(&frame.payload) {
                Some(percent) => on_progress(percent),
                None => tracing::warn!(payload = %frame.payload, "Skipping malformed progress frame"),
            }
            Ok(Flow::Continue)
        });
        router.on(EVENT_SAVE_DATA, |frame| {
            let decoded = CompactPayload::parse(frame.payload.as_bytes())
                .and_then(|payload| payload.decode())
                .map_err(|source| StreamError::StreamDecodeError {
                    event: frame.event.clone(),
                    source,
                })?;
            result = Some(decoded);
            Ok(Flow::Stop)
        });
        reader.run(&mut router).await?
    };

    match (outcome, result) {
        (Outcome::Stopped, Some(decoded)) => {
            tracing::debug!(tables = decoded.len(), "Received parse result");
            Ok(decoded)
        }
        _ => Err(StreamError::Incomplete(EVENT_SAVE_DATA.to_string())),
    }
}
