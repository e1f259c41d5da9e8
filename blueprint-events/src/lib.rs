//! Blueprint-Events: line-framed event stream reader
//!
//! The parsing service answers an upload with a stream of two-line frames:
//!
//! ```text
//! event: progress
//! data: {"progress":42}
//!
//! event: save-data
//! data: {"materials":{"dictionary":["name","qty"],"rows":[["Iron",10]]}}
//! ```
//!
//! Bytes arrive in arbitrary chunks. [`FrameDecoder`] buffers partial lines and
//! yields complete frames; [`EventStreamReader`] pulls chunks from an async stream,
//! feeds the decoder and dispatches frames through an [`EventRouter`]. A handler
//! returning [`Flow::Stop`] ends the loop and releases the stream, so nothing
//! after the terminal frame is ever read.
//!
//! # Modules
//!
//! - [`frame`] - Frame type and the incremental line decoder
//! - [`router`] - Event name to handler dispatch
//! - [`reader`] - Async read loop with external cancellation
//! - [`session`] - Progress and save-data handling for one parse
//! - [`client`] - HTTP client for the parsing service

pub mod client;
pub mod error;
pub mod frame;
pub mod reader;
pub mod router;
pub mod session;

pub use client::ParseClient;
pub use error::StreamError;
pub use frame::{FrameDecoder, ReaderState, StreamFrame};
pub use reader::{CancelHandle, EventStreamReader, Outcome};
pub use router::{EventRouter, Flow};
pub use session::{parse_progress, read_parse_events};
