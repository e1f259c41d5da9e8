//! HTTP client for the remote blueprint parsing service
//!
//! The service is a black box: it accepts a blueprint file and answers with an
//! event stream of progress frames followed by one save-data frame.

use crate::{CancelHandle, EventStreamReader, StreamError, read_parse_events};
use blueprint_compact::DecodedPayload;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};

/// Response body of the parsing service, as a stream of byte chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send>>;

/// Header carrying the uploaded file's name
const FILE_NAME_HEADER: &str = "x-blueprint-name";

#[derive(Debug, Clone)]
pub struct ParseClient {
    client: reqwest::Client,
    url: String,
}

impl ParseClient {
    /// Create a client posting to `url`.
    ///
    /// No request timeout is set here; the event stream may legitimately stay
    /// open for a long time. Callers bound the whole parse instead.
    pub fn new(url: impl Into<String>) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upload `bytes` and return a reader over the response event stream.
    ///
    /// # Errors
    /// [`StreamError::Cancelled`] if `cancel` fires before the response headers
    /// arrive. After that the returned reader watches the same handle.
    pub async fn open(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        cancel: CancelHandle,
    ) -> Result<EventStreamReader<ByteStream>, StreamError> {
        tracing::info!(url = %self.url, file = file_name, size = bytes.len(), "Uploading blueprint for parsing");

        let request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(ACCEPT, "text/event-stream")
            .header(FILE_NAME_HEADER, file_name)
            .body(bytes)
            .send();

        // The handle also covers the upload and the wait for response headers
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %self.url, "Upload cancelled before a response arrived");
                return Err(StreamError::Cancelled);
            }
            response = request => response?,
        };

        if !response.status().is_success() {
            return Err(StreamError::Status(response.status().as_u16()));
        }

        let stream: ByteStream = Box::pin(response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())));
        Ok(EventStreamReader::with_cancel(stream, cancel))
    }

    /// Upload `bytes` and wait for the decoded parse result.
    pub async fn parse<F>(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        cancel: CancelHandle,
        on_progress: F,
    ) -> Result<DecodedPayload, StreamError>
    where
        F: FnMut(u8) + Send,
    {
        let mut reader = self.open(file_name, bytes, cancel).await?;
        read_parse_events(&mut reader, on_progress).await
    }
}
