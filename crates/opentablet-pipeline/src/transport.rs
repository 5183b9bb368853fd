//! Transport boundary: completed-transfer delivery and transfer control.
//!
//! The real transport (USB host stack, hidraw, uhid) lives behind
//! [`TransferPort`]; the pipeline only ever sees completed transfers and
//! issues resubmit/cancel against the port. The `mock` module provides a
//! scripted port for tests and replay.

use async_trait::async_trait;
use opentablet_errors::TransportError;

use crate::transfer::CompletionStatus;

/// One completed transfer as delivered by the transport layer.
#[derive(Debug, Clone)]
pub struct TransferComplete {
    pub status: CompletionStatus,
    /// Captured bytes; the actual length is `data.len()`.
    pub data: Vec<u8>,
}

impl TransferComplete {
    pub fn success(data: Vec<u8>) -> Self {
        Self {
            status: CompletionStatus::Success,
            data,
        }
    }

    pub fn error(status: i32) -> Self {
        Self {
            status: CompletionStatus::Error(status),
            data: Vec::new(),
        }
    }

    pub fn actual_length(&self) -> usize {
        self.data.len()
    }
}

/// Asynchronous transfer port the capture task drives.
#[async_trait]
pub trait TransferPort: Send {
    /// Await the next completed transfer.
    ///
    /// Returns `None` when the port is closed (device gone); no further
    /// completions will ever arrive.
    async fn next_completion(&mut self) -> Option<TransferComplete>;

    /// Re-arm the transfer. Must be non-blocking; called from the capture
    /// context as its terminal action after every completion.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ResubmitFailed`] when the transport
    /// rejects the submission.
    fn resubmit(&mut self) -> Result<(), TransportError>;

    /// Cancel the in-flight transfer and wait for the cancellation to take
    /// effect. Called once at detach, before any shared state is freed.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::CancelFailed`] when the transfer could not
    /// be cancelled; the caller must treat this as fatal.
    async fn cancel(&mut self) -> Result<(), TransportError>;
}

pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use super::*;

    /// Observable side of a [`MockTransferPort`], cloneable into tests.
    #[derive(Debug, Clone, Default)]
    pub struct MockPortHandle {
        resubmissions: Arc<AtomicU64>,
        cancelled: Arc<AtomicBool>,
    }

    impl MockPortHandle {
        pub fn resubmissions(&self) -> u64 {
            self.resubmissions.load(Ordering::SeqCst)
        }

        pub fn was_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
    }

    /// Scripted transfer port: hands out queued completions in order, then
    /// reports the port as closed (or parks forever when configured to stay
    /// open, so cancellation paths can be exercised).
    pub struct MockTransferPort {
        completions: VecDeque<TransferComplete>,
        stay_open: bool,
        fail_cancel: bool,
        handle: MockPortHandle,
    }

    impl MockTransferPort {
        pub fn new() -> Self {
            Self {
                completions: VecDeque::new(),
                stay_open: false,
                fail_cancel: false,
                handle: MockPortHandle::default(),
            }
        }

        /// Queue a completion for delivery.
        pub fn push_completion(&mut self, transfer: TransferComplete) {
            self.completions.push_back(transfer);
        }

        /// Keep `next_completion` pending once the script is exhausted
        /// instead of reporting the port closed.
        pub fn stay_open(mut self) -> Self {
            self.stay_open = true;
            self
        }

        /// Make `cancel` fail, for detach-error tests.
        pub fn with_failing_cancel(mut self) -> Self {
            self.fail_cancel = true;
            self
        }

        pub fn handle(&self) -> MockPortHandle {
            self.handle.clone()
        }
    }

    impl Default for MockTransferPort {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TransferPort for MockTransferPort {
        async fn next_completion(&mut self) -> Option<TransferComplete> {
            if let Some(transfer) = self.completions.pop_front() {
                return Some(transfer);
            }
            if self.stay_open {
                // Park until the capture task is told to shut down.
                std::future::pending::<()>().await;
            }
            None
        }

        fn resubmit(&mut self) -> Result<(), TransportError> {
            self.handle.resubmissions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn cancel(&mut self) -> Result<(), TransportError> {
            if self.fail_cancel {
                return Err(TransportError::CancelFailed(
                    "mock configured to fail cancellation".to_string(),
                ));
            }
            self.handle.cancelled.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
