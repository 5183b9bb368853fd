//! Transfer-completion and deferred-queue error types.

use crate::ErrorSeverity;

/// Errors reported by the transfer transport boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// A transfer completed with a non-success status.
    ///
    /// Never fatal: the frontend logs it and resubmits the transfer so the
    /// device keeps streaming.
    #[error("transfer completed with status {status}")]
    CompletionFailed {
        /// Transport-level status code of the failed transfer
        status: i32,
    },

    /// The transport port is closed; no further completions will arrive.
    #[error("transport port closed")]
    PortClosed,

    /// Resubmitting the transfer was rejected by the transport layer.
    #[error("transfer resubmission failed: {0}")]
    ResubmitFailed(String),

    /// Cancelling the in-flight transfer failed.
    #[error("transfer cancellation failed: {0}")]
    CancelFailed(String),
}

impl TransportError {
    /// Severity classification for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TransportError::CompletionFailed { .. } => ErrorSeverity::Absorbed,
            TransportError::PortClosed => ErrorSeverity::Error,
            TransportError::ResubmitFailed(_) => ErrorSeverity::Error,
            // Leaking an active transfer against freed buffers is a
            // fatal-class condition.
            TransportError::CancelFailed(_) => ErrorSeverity::Fatal,
        }
    }
}

/// Errors from the deferred-job hand-off channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The bounded job queue is full; the frame is dropped.
    #[error("job queue full, frame dropped")]
    Full,

    /// The worker has shut down; no further jobs can be enqueued.
    #[error("job queue closed")]
    Closed,
}

impl QueueError {
    /// Severity classification for this error.
    pub fn severity(&self) -> ErrorSeverity {
        // Either way the frame is dropped and the frontend continues.
        ErrorSeverity::Absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = TransportError::CompletionFailed { status: -32 };
        assert_eq!(err.to_string(), "transfer completed with status -32");

        assert_eq!(QueueError::Full.to_string(), "job queue full, frame dropped");
    }

    #[test]
    fn cancel_failure_is_fatal() {
        let err = TransportError::CancelFailed("still in flight".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }
}
