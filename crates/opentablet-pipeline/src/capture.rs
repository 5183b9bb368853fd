//! Event capture frontend: the completion-context half of the pipeline.
//!
//! [`CaptureFrontend::handle_completion`] is the code that runs in the
//! transport's callback context. It must not block and must not do
//! unbounded work: it checks the status, length-validates the frame, hands
//! it off with a non-blocking `try_send`, and lets the caller re-arm the
//! transfer. Every failure is absorbed by dropping the frame and counting
//! it; the capture loop never stops over a bad transfer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use opentablet_hid_tablet_protocol::MIN_FRAME_LEN;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::scheduler::PendingJob;
use crate::transfer::{CompletionStatus, TransferSlot};
use crate::transport::{TransferComplete, TransferPort};
use opentablet_errors::TransportError;

/// Frontend counters. Written from the capture context, read from anywhere.
#[derive(Debug, Default)]
pub struct CaptureStats {
    frames_enqueued: AtomicU64,
    transport_errors: AtomicU64,
    short_frames: AtomicU64,
    queue_drops: AtomicU64,
    resubmissions: AtomicU64,
}

/// Point-in-time copy of [`CaptureStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureStatsSnapshot {
    pub frames_enqueued: u64,
    pub transport_errors: u64,
    pub short_frames: u64,
    pub queue_drops: u64,
    pub resubmissions: u64,
}

impl CaptureStats {
    pub fn snapshot(&self) -> CaptureStatsSnapshot {
        CaptureStatsSnapshot {
            frames_enqueued: self.frames_enqueued.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            short_frames: self.short_frames.load(Ordering::Relaxed),
            queue_drops: self.queue_drops.load(Ordering::Relaxed),
            resubmissions: self.resubmissions.load(Ordering::Relaxed),
        }
    }

    fn count(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// The non-blocking completion handler.
pub struct CaptureFrontend {
    job_tx: mpsc::Sender<PendingJob>,
    stats: Arc<CaptureStats>,
}

impl CaptureFrontend {
    pub fn new(job_tx: mpsc::Sender<PendingJob>, stats: Arc<CaptureStats>) -> Self {
        Self { job_tx, stats }
    }

    pub fn stats(&self) -> &Arc<CaptureStats> {
        &self.stats
    }

    /// Process one completed transfer. Never blocks, never fails.
    ///
    /// The caller re-arms the transfer afterwards regardless of what
    /// happened here.
    pub fn handle_completion(&self, transfer: TransferComplete) {
        match transfer.status {
            CompletionStatus::Error(status) => {
                debug!(status, "transfer completed with error status");
                CaptureStats::count(&self.stats.transport_errors);
            }
            CompletionStatus::Success => {
                if transfer.actual_length() < MIN_FRAME_LEN {
                    trace!(len = transfer.actual_length(), "short frame dropped");
                    CaptureStats::count(&self.stats.short_frames);
                    return;
                }
                match self.job_tx.try_send(PendingJob::new(transfer.data)) {
                    Ok(()) => CaptureStats::count(&self.stats.frames_enqueued),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        // Queue full: drop the frame and keep capturing.
                        warn!("job queue full, frame dropped");
                        CaptureStats::count(&self.stats.queue_drops);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        debug!("job queue closed, frame dropped");
                        CaptureStats::count(&self.stats.queue_drops);
                    }
                }
            }
        }
    }
}

/// Drives a [`TransferPort`] through the frontend until shutdown.
///
/// The loop owns the transfer state machine: every completion moves the
/// slot to `Completed` and the unconditional resubmission moves it back to
/// `Submitted` as the terminal step. On shutdown the in-flight transfer is
/// cancelled and awaited before the task returns.
pub struct CaptureTask {
    port: Box<dyn TransferPort>,
    frontend: CaptureFrontend,
    slot: TransferSlot,
}

impl CaptureTask {
    pub fn new(port: Box<dyn TransferPort>, frontend: CaptureFrontend) -> Self {
        Self {
            port,
            frontend,
            slot: TransferSlot::new(),
        }
    }

    /// Run until the port closes or `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::CancelFailed`] when shutdown-time
    /// cancellation fails, or [`TransportError::ResubmitFailed`] when the
    /// transport rejects a re-arm.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), TransportError> {
        if self.slot.submit().is_err() {
            return Err(TransportError::ResubmitFailed(
                "transfer slot not idle at start".to_string(),
            ));
        }
        self.port.resubmit()?;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.slot
                        .cancel()
                        .map_err(|e| TransportError::CancelFailed(e.to_string()))?;
                    self.port.cancel().await?;
                    debug!("capture task cancelled in-flight transfer");
                    return Ok(());
                }
                completion = self.port.next_completion() => {
                    let Some(transfer) = completion else {
                        debug!("transport port closed, capture task exiting");
                        return Ok(());
                    };
                    if self.slot.complete(transfer.status).is_err() {
                        return Err(TransportError::ResubmitFailed(
                            "completion for unsubmitted transfer".to_string(),
                        ));
                    }
                    self.frontend.handle_completion(transfer);
                    // Re-arm unconditionally so capture is continuous.
                    if self.slot.resubmit().is_err() {
                        return Err(TransportError::ResubmitFailed(
                            "transfer slot refused re-arm".to_string(),
                        ));
                    }
                    self.port.resubmit()?;
                    CaptureStats::count(&self.frontend.stats().resubmissions);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontend_with_queue(depth: usize) -> (CaptureFrontend, mpsc::Receiver<PendingJob>) {
        let (tx, rx) = mpsc::channel(depth);
        (CaptureFrontend::new(tx, Arc::new(CaptureStats::default())), rx)
    }

    fn valid_frame() -> Vec<u8> {
        vec![0x02, 0b101, 0x00, 0x00]
    }

    #[tokio::test]
    async fn valid_frame_is_enqueued() {
        let (frontend, mut rx) = frontend_with_queue(4);
        frontend.handle_completion(TransferComplete::success(valid_frame()));

        let job = rx.try_recv().unwrap();
        assert_eq!(job.frame(), valid_frame().as_slice());
        assert_eq!(frontend.stats().snapshot().frames_enqueued, 1);
    }

    #[tokio::test]
    async fn error_status_is_counted_not_enqueued() {
        let (frontend, mut rx) = frontend_with_queue(4);
        frontend.handle_completion(TransferComplete::error(-71));

        assert!(rx.try_recv().is_err());
        let stats = frontend.stats().snapshot();
        assert_eq!(stats.transport_errors, 1);
        assert_eq!(stats.frames_enqueued, 0);
    }

    #[tokio::test]
    async fn short_frame_is_silently_dropped() {
        let (frontend, mut rx) = frontend_with_queue(4);
        frontend.handle_completion(TransferComplete::success(vec![0x02, 0x01]));

        assert!(rx.try_recv().is_err());
        assert_eq!(frontend.stats().snapshot().short_frames, 1);
    }

    #[tokio::test]
    async fn full_queue_drops_frame_without_blocking() {
        let (frontend, mut rx) = frontend_with_queue(1);
        frontend.handle_completion(TransferComplete::success(valid_frame()));
        frontend.handle_completion(TransferComplete::success(valid_frame()));

        let stats = frontend.stats().snapshot();
        assert_eq!(stats.frames_enqueued, 1);
        assert_eq!(stats.queue_drops, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_queue_drops_frame_without_blocking() {
        let (frontend, rx) = frontend_with_queue(1);
        drop(rx);
        frontend.handle_completion(TransferComplete::success(valid_frame()));
        assert_eq!(frontend.stats().snapshot().queue_drops, 1);
    }
}
