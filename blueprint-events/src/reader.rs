//! Async read loop over a chunked byte stream

use crate::{EventRouter, Flow, FrameDecoder, ReaderState, StreamError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio_stream::{Stream, StreamExt};

/// Cancels an [`EventStreamReader`] from outside its read loop.
///
/// Cheap to clone; safe to call from any task or thread, before or during a read.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// How a read loop finished without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler returned [`Flow::Stop`]
    Stopped,
    /// The stream ran out of bytes
    Ended,
}

enum Step<T> {
    Cancelled,
    Next(Option<T>),
}

/// Reads frames from `S` and dispatches them until a handler stops the loop.
///
/// The reader owns the stream. It is dropped as soon as the loop stops, fails
/// or is cancelled, so no bytes are pulled after that point.
#[derive(Debug)]
pub struct EventStreamReader<S> {
    stream: Option<S>,
    decoder: FrameDecoder,
    cancel: CancelHandle,
    reads: usize,
}

impl<S, B, E> EventStreamReader<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    pub fn new(stream: S) -> Self {
        Self::with_cancel(stream, CancelHandle::new())
    }

    /// Use an existing handle, e.g. one shared with a timeout task
    pub fn with_cancel(stream: S, cancel: CancelHandle) -> Self {
        Self {
            stream: Some(stream),
            decoder: FrameDecoder::new(),
            cancel,
            reads: 0,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> ReaderState {
        self.decoder.state()
    }

    /// Number of chunks pulled from the stream so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// True once the underlying stream has been dropped
    pub fn is_released(&self) -> bool {
        self.stream.is_none()
    }

    /// Pull chunks and dispatch frames through `router`.
    ///
    /// # Errors
    /// Handler errors, transport errors and [`StreamError::Cancelled`] all end
    /// the loop and release the stream.
    pub async fn run(&mut self, router: &mut EventRouter<'_>) -> Result<Outcome, StreamError> {
        loop {
            while let Some(frame) = self.decoder.next_frame() {
                match router.dispatch(&frame) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Stop) => {
                        tracing::debug!(event = %frame.event, reads = self.reads, "Stopping stream");
                        self.release();
                        return Ok(Outcome::Stopped);
                    }
                    Err(e) => {
                        self.release();
                        return Err(e);
                    }
                }
            }

            let Some(stream) = self.stream.as_mut() else {
                return Ok(Outcome::Ended);
            };

            let step = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Step::Cancelled,
                item = stream.next() => Step::Next(item),
            };

            match step {
                Step::Cancelled => {
                    tracing::debug!(reads = self.reads, "Stream read cancelled");
                    self.release();
                    return Err(StreamError::Cancelled);
                }
                Step::Next(Some(Ok(bytes))) => {
                    self.reads += 1;
                    self.decoder.push(bytes.as_ref());
                }
                Step::Next(Some(Err(e))) => {
                    self.release();
                    return Err(StreamError::Transport(e.into()));
                }
                Step::Next(None) => {
                    if self.decoder.buffered() > 0 {
                        tracing::debug!(
                            bytes = self.decoder.buffered(),
                            "Discarding unterminated line at end of stream"
                        );
                    }
                    self.release();
                    return Ok(Outcome::Ended);
                }
            }
        }
    }

    fn release(&mut self) {
        self.stream = None;
    }
}
