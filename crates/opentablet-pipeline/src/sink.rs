//! Normalized-event output boundary.
//!
//! The translator's events for one frame are dispatched in a single call;
//! the slice is the atomic unit. Implementations route events into the
//! platform input subsystem, a recording buffer, or the log.

use opentablet_device_types::NormalizedEvent;

/// Consumer of normalized input events.
pub trait InputEventSink: Send {
    /// Deliver all events of one frame.
    ///
    /// Called once per frame that produced events; events from different
    /// frames are never mixed in one call.
    fn dispatch(&mut self, events: &[NormalizedEvent]);
}

/// Sink that emits each frame through `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl InputEventSink for TracingSink {
    fn dispatch(&mut self, events: &[NormalizedEvent]) {
        tracing::debug!(count = events.len(), ?events, "input frame");
    }
}

pub mod mock {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every dispatched frame for inspection from tests.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        frames: Arc<Mutex<Vec<Vec<NormalizedEvent>>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Cloneable view onto the recorded frames.
        pub fn handle(&self) -> RecordingSinkHandle {
            RecordingSinkHandle {
                frames: Arc::clone(&self.frames),
            }
        }
    }

    impl InputEventSink for RecordingSink {
        fn dispatch(&mut self, events: &[NormalizedEvent]) {
            let mut frames = self.frames.lock().unwrap_or_else(|e| e.into_inner());
            frames.push(events.to_vec());
        }
    }

    /// Observer half of a [`RecordingSink`].
    #[derive(Debug, Clone)]
    pub struct RecordingSinkHandle {
        frames: Arc<Mutex<Vec<Vec<NormalizedEvent>>>>,
    }

    impl RecordingSinkHandle {
        pub fn frame_count(&self) -> usize {
            self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
        }

        pub fn frames(&self) -> Vec<Vec<NormalizedEvent>> {
            self.frames.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }
}
