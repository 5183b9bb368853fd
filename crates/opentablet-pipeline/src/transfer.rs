//! Per-transfer state machine.
//!
//! Each hardware transfer is tracked explicitly: `Idle` until first armed,
//! `Submitted` while in flight, `Completed` once the transport reports it,
//! `Cancelled` at teardown. Resubmission is the only legal transition out
//! of `Completed`, which is what keeps the capture loop continuous.

/// Outcome reported by the transport for one completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Transfer delivered data.
    Success,
    /// Transfer failed with a transport-level status code.
    Error(i32),
}

impl CompletionStatus {
    pub fn is_success(self) -> bool {
        matches!(self, CompletionStatus::Success)
    }
}

/// Lifecycle state of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    Submitted,
    Completed(CompletionStatus),
    Cancelled,
}

impl TransferState {
    const fn name(self) -> &'static str {
        match self {
            TransferState::Idle => "idle",
            TransferState::Submitted => "submitted",
            TransferState::Completed(_) => "completed",
            TransferState::Cancelled => "cancelled",
        }
    }
}

/// An illegal state transition was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal transfer transition: {from} -> {to}")]
pub struct TransferStateError {
    from: &'static str,
    to: &'static str,
}

/// Tracks the state of a single transfer slot and counts submissions.
#[derive(Debug, Clone, Copy)]
pub struct TransferSlot {
    state: TransferState,
    submissions: u64,
}

impl TransferSlot {
    pub fn new() -> Self {
        Self {
            state: TransferState::Idle,
            submissions: 0,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Total times this slot has been (re)armed.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    /// Arm the transfer for the first time.
    ///
    /// # Errors
    ///
    /// Only legal from `Idle`.
    pub fn submit(&mut self) -> Result<(), TransferStateError> {
        match self.state {
            TransferState::Idle => {
                self.state = TransferState::Submitted;
                self.submissions += 1;
                Ok(())
            }
            from => Err(TransferStateError {
                from: from.name(),
                to: "submitted",
            }),
        }
    }

    /// Record a completion reported by the transport.
    ///
    /// # Errors
    ///
    /// Only legal from `Submitted`.
    pub fn complete(&mut self, status: CompletionStatus) -> Result<(), TransferStateError> {
        match self.state {
            TransferState::Submitted => {
                self.state = TransferState::Completed(status);
                Ok(())
            }
            from => Err(TransferStateError {
                from: from.name(),
                to: "completed",
            }),
        }
    }

    /// Re-arm after a completion, successful or not.
    ///
    /// # Errors
    ///
    /// Only legal from `Completed`; this is the single legal way out of
    /// that state.
    pub fn resubmit(&mut self) -> Result<(), TransferStateError> {
        match self.state {
            TransferState::Completed(_) => {
                self.state = TransferState::Submitted;
                self.submissions += 1;
                Ok(())
            }
            from => Err(TransferStateError {
                from: from.name(),
                to: "submitted",
            }),
        }
    }

    /// Cancel the transfer at teardown.
    ///
    /// # Errors
    ///
    /// Legal from every state except `Cancelled` itself.
    pub fn cancel(&mut self) -> Result<(), TransferStateError> {
        match self.state {
            TransferState::Cancelled => Err(TransferStateError {
                from: "cancelled",
                to: "cancelled",
            }),
            _ => {
                self.state = TransferState::Cancelled;
                Ok(())
            }
        }
    }
}

impl Default for TransferSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_cycles_through_resubmission() {
        let mut slot = TransferSlot::new();
        slot.submit().unwrap();
        slot.complete(CompletionStatus::Success).unwrap();
        slot.resubmit().unwrap();
        slot.complete(CompletionStatus::Error(-71)).unwrap();
        slot.resubmit().unwrap();
        assert_eq!(slot.state(), TransferState::Submitted);
        assert_eq!(slot.submissions(), 3);
    }

    #[test]
    fn resubmit_is_only_exit_from_completed() {
        let mut slot = TransferSlot::new();
        slot.submit().unwrap();
        slot.complete(CompletionStatus::Success).unwrap();

        // A second completion without resubmission is illegal.
        assert!(slot.complete(CompletionStatus::Success).is_err());
        // So is a fresh submit.
        assert!(slot.submit().is_err());

        slot.resubmit().unwrap();
        assert_eq!(slot.state(), TransferState::Submitted);
    }

    #[test]
    fn cannot_complete_unsubmitted_transfer() {
        let mut slot = TransferSlot::new();
        let err = slot.complete(CompletionStatus::Success).unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal transfer transition: idle -> completed"
        );
    }

    #[test]
    fn cancel_from_any_live_state() {
        let mut slot = TransferSlot::new();
        slot.cancel().unwrap();
        assert_eq!(slot.state(), TransferState::Cancelled);
        assert!(slot.cancel().is_err());

        let mut slot = TransferSlot::new();
        slot.submit().unwrap();
        slot.cancel().unwrap();
        assert!(slot.submit().is_err());
        assert!(slot.resubmit().is_err());
    }
}
