//! Attach/detach lifecycle error types.
//!
//! These are the only errors the driver propagates to its caller; every
//! per-frame failure is absorbed inside the pipeline.

/// Errors raised while attaching a driver instance.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AttachError {
    /// The supplied configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while detaching a driver instance.
///
/// Detach failures are fatal-class: they mean an in-flight transfer or a
/// worker may still reference resources the caller is about to free.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DetachError {
    /// The in-flight transfer could not be cancelled.
    #[error("failed to cancel in-flight transfer: {reason}")]
    CancelFailed {
        /// Transport-layer failure description
        reason: String,
    },

    /// The deferred worker panicked or was cancelled before draining.
    #[error("deferred worker terminated abnormally: {reason}")]
    WorkerFailed {
        /// Join failure description
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = AttachError::InvalidConfig("button_count 32 exceeds 18".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: button_count 32 exceeds 18"
        );

        let err = DetachError::CancelFailed {
            reason: "port unreachable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to cancel in-flight transfer: port unreachable"
        );
    }
}
