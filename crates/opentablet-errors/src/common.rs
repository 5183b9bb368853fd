//! Top-level error enum and severity classification.

use core::fmt;

use crate::{AttachError, DetachError, QueueError, TransportError};

/// Top-level error type wrapping all OpenTablet sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum OpenTabletError {
    /// Transfer and port errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Deferred-job queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Driver attach errors
    #[error("Attach error: {0}")]
    Attach(#[from] AttachError),

    /// Driver detach errors
    #[error("Detach error: {0}")]
    Detach(#[from] DetachError),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl OpenTabletError {
    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            OpenTabletError::Transport(e) => e.severity(),
            OpenTabletError::Queue(e) => e.severity(),
            OpenTabletError::Attach(_) => ErrorSeverity::Error,
            OpenTabletError::Detach(_) => ErrorSeverity::Fatal,
            OpenTabletError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Whether the pipeline absorbs this error and keeps running.
    ///
    /// Absorbed errors are counted at the point of failure and never
    /// surfaced to the driver's caller.
    pub fn is_absorbed(&self) -> bool {
        self.severity() == ErrorSeverity::Absorbed
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        OpenTabletError::Other(msg.into())
    }
}

/// Error severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Absorbed locally; the pipeline continues (per-frame failures).
    Absorbed = 0,
    /// Operation failed; the caller must handle it.
    Error = 1,
    /// Teardown-order violation or resource leak; must never be ignored.
    Fatal = 2,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Absorbed => write!(f, "absorbed"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Fatal => write!(f, "fatal"),
        }
    }
}
