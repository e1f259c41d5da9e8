//! Frames and the incremental line decoder

use blueprint_shared::api::DEFAULT_EVENT;

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";

/// One decoded event-name/data pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub event: String,
    pub payload: String,
}

/// Where the decoder is in the two-line frame protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Waiting for an `event:` line (a bare `data:` line uses the current name)
    AwaitingEventLine,
    /// An event name was set; waiting for its `data:` line
    AwaitingDataLine,
    /// A frame was just handed out
    Dispatched,
}

/// Incremental decoder over arbitrarily chunked bytes.
///
/// Only complete, `\n`-terminated lines are acted on; the remainder stays
/// buffered until the next [`push`](Self::push).
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    /// Buffer bytes already known to contain no newline
    scanned: usize,
    event: Option<String>,
    state: ReaderState,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            event: None,
            state: ReaderState::AwaitingEventLine,
        }
    }

    /// Append raw bytes from the stream
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Current event name; sticky until the next `event:` line
    pub fn event(&self) -> &str {
        self.event.as_deref().unwrap_or(DEFAULT_EVENT)
    }

    /// Bytes waiting for a newline
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Consume buffered lines until one completes a frame.
    ///
    /// Returns `None` once no complete line is left.
    pub fn next_frame(&mut self) -> Option<StreamFrame> {
        if self.state == ReaderState::Dispatched {
            self.state = ReaderState::AwaitingEventLine;
        }

        while let Some(line) = self.next_line() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
                self.event = Some(strip_leading_space(name).to_string());
                self.state = ReaderState::AwaitingDataLine;
            } else if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
                self.state = ReaderState::Dispatched;
                return Some(StreamFrame {
                    event: self.event().to_string(),
                    payload: strip_leading_space(payload).to_string(),
                });
            } else {
                tracing::trace!(line = %line, "Ignoring unrecognised stream line");
            }
        }

        None
    }

    fn next_line(&mut self) -> Option<String> {
        let Some(newline) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.buffer.len();
            return None;
        };
        let end = self.scanned + newline;

        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
        self.scanned = 0;
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

fn strip_leading_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}
