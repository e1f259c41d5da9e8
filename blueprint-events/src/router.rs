//! Event name to handler dispatch

use crate::{StreamError, StreamFrame};
use hashbrown::HashMap;

/// What the read loop should do after a frame was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop reading and release the stream
    Stop,
}

type Handler<'a> = Box<dyn FnMut(&StreamFrame) -> Result<Flow, StreamError> + Send + 'a>;

/// Handlers keyed by event name. Frames for unregistered events are dropped.
#[derive(Default)]
pub struct EventRouter<'a> {
    handlers: HashMap<String, Handler<'a>>,
}

impl<'a> EventRouter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`, replacing any previous one
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&StreamFrame) -> Result<Flow, StreamError> + Send + 'a,
    {
        self.handlers.insert(event.into(), Box::new(handler));
        self
    }

    pub fn dispatch(&mut self, frame: &StreamFrame) -> Result<Flow, StreamError> {
        match self.handlers.get_mut(&frame.event) {
            Some(handler) => handler(frame),
            None => {
                tracing::trace!(event = %frame.event, "No handler for event");
                Ok(Flow::Continue)
            }
        }
    }
}

impl std::fmt::Debug for EventRouter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("events", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str) -> StreamFrame {
        StreamFrame {
            event: event.to_string(),
            payload: String::new(),
        }
    }

    #[test]
    fn test_dispatch_by_name() {
        let mut seen = Vec::new();
        {
            let mut router = EventRouter::new();
            router.on("a", |f| {
                seen.push(f.event.clone());
                Ok(Flow::Continue)
            });

            assert_eq!(router.dispatch(&frame("a")).unwrap(), Flow::Continue);
            assert_eq!(router.dispatch(&frame("b")).unwrap(), Flow::Continue);
        }
        assert_eq!(seen, vec!["a".to_string()]);
    }

    #[test]
    fn test_handler_can_stop_and_fail() {
        let mut router = EventRouter::new();
        router
            .on("stop", |_| Ok(Flow::Stop))
            .on("fail", |_| Err(StreamError::Cancelled));

        assert_eq!(router.dispatch(&frame("stop")).unwrap(), Flow::Stop);
        assert!(router.dispatch(&frame("fail")).is_err());
    }
}
