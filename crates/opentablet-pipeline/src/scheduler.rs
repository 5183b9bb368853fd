//! Deferred work scheduler: the blocking-capable half of the pipeline.
//!
//! One worker task per device instance drains a bounded FIFO queue of
//! captured frames and runs parse, translation, event dispatch and ring-log
//! append for each. A single worker is what guarantees per-device FIFO
//! execution; each successfully enqueued job runs exactly once.

use opentablet_device_types::TabletConfig;
use opentablet_hid_tablet_protocol::{ButtonMask, parse_tablet_input_report};
use opentablet_ringlog::SharedRingLog;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::sink::InputEventSink;
use crate::translate::Translator;
use opentablet_errors::DetachError;

/// Depth of the frontend-to-worker hand-off queue.
///
/// Bounds pipeline memory under an unbounded event rate; the frontend drops
/// frames once it is full.
pub const JOB_QUEUE_DEPTH: usize = 256;

/// One captured frame awaiting translation.
///
/// Owns the bytes between enqueue and execution; dropped after execution.
#[derive(Debug)]
pub struct PendingJob {
    frame: Vec<u8>,
}

impl PendingJob {
    pub fn new(frame: Vec<u8>) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }
}

/// Handle to a spawned worker: job sender plus join handle.
pub struct SchedulerHandle {
    job_tx: mpsc::Sender<PendingJob>,
    worker: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Sender the capture frontend enqueues through.
    pub fn sender(&self) -> mpsc::Sender<PendingJob> {
        self.job_tx.clone()
    }

    /// Drain and stop the worker.
    ///
    /// Dropping the last sender closes the queue; the worker finishes every
    /// job already enqueued before exiting, so shutdown is deterministic.
    /// Callers must drop their own sender clones first (the capture task
    /// does so when it stops), or the join will wait on them.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::WorkerFailed`] when the worker panicked or
    /// was aborted instead of draining.
    pub async fn shutdown(self) -> Result<(), DetachError> {
        drop(self.job_tx);
        self.worker.await.map_err(|e| DetachError::WorkerFailed {
            reason: e.to_string(),
        })
    }
}

/// Spawns the per-device worker task.
pub struct DeferredScheduler;

impl DeferredScheduler {
    /// Spawn the worker onto the current Tokio runtime.
    ///
    /// The worker owns the sink and the previous-mask state used by
    /// transition-only emission; nothing else touches either.
    pub fn spawn(
        config: &TabletConfig,
        log: SharedRingLog,
        mut sink: Box<dyn InputEventSink>,
    ) -> SchedulerHandle {
        let (job_tx, mut job_rx) = mpsc::channel::<PendingJob>(JOB_QUEUE_DEPTH);
        let translator = Translator::new(config);

        let worker = tokio::spawn(async move {
            let mut prev_mask: Option<ButtonMask> = None;
            let mut executed: u64 = 0;

            while let Some(job) = job_rx.recv().await {
                let Some(raw) = parse_tablet_input_report(job.frame()) else {
                    debug!(len = job.frame().len(), "undecodable frame skipped");
                    continue;
                };

                let output = translator.translate(&raw, prev_mask);
                prev_mask = Some(translator.effective_mask(raw.buttons));

                if !output.events.is_empty() {
                    // One dispatch call per frame: the slice is the atomic
                    // unit at the input boundary.
                    sink.dispatch(&output.events);
                }
                if !output.record.is_empty() {
                    log.append(output.record.as_bytes());
                }
                executed += 1;
            }

            info!(executed, "deferred worker drained and stopped");
        });

        SchedulerHandle { job_tx, worker }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::mock::RecordingSink;
    use opentablet_device_types::OverflowPolicy;

    fn button_frame(mask: u32) -> Vec<u8> {
        let mut frame = vec![0x02];
        frame.extend_from_slice(&mask.to_le_bytes()[..3]);
        frame
    }

    #[tokio::test]
    async fn jobs_execute_in_fifo_order() {
        let config = TabletConfig::default().with_button_count(1);
        let log = SharedRingLog::with_capacity(4096, OverflowPolicy::ResetAll);
        let sink = RecordingSink::new();
        let handle = DeferredScheduler::spawn(&config, log.clone(), Box::new(sink));

        let tx = handle.sender();
        for mask in [0b1, 0b0, 0b1, 0b0] {
            tx.send(PendingJob::new(button_frame(mask))).await.unwrap();
        }
        drop(tx);
        handle.shutdown().await.unwrap();

        let text = String::from_utf8(log.drain(4096)).unwrap();
        assert_eq!(
            text,
            "button 0 pressed\nbutton 0 released\nbutton 0 pressed\nbutton 0 released\n"
        );
    }

    #[tokio::test]
    async fn shutdown_drains_enqueued_jobs() {
        let config = TabletConfig::default().with_button_count(1);
        let log = SharedRingLog::with_capacity(8192, OverflowPolicy::DropNewest);
        let sink = RecordingSink::new();
        let events = sink.handle();
        let handle = DeferredScheduler::spawn(&config, log.clone(), Box::new(sink));

        let tx = handle.sender();
        for _ in 0..50 {
            tx.send(PendingJob::new(button_frame(0b1))).await.unwrap();
        }
        drop(tx);
        // Shutdown must not lose any of the 50 enqueued jobs.
        handle.shutdown().await.unwrap();
        assert_eq!(events.frame_count(), 50);
    }

    #[tokio::test]
    async fn undecodable_frames_are_skipped() {
        let config = TabletConfig::default();
        let log = SharedRingLog::with_capacity(1024, OverflowPolicy::ResetAll);
        let handle = DeferredScheduler::spawn(&config, log.clone(), Box::new(RecordingSink::new()));

        let tx = handle.sender();
        // Wrong report id.
        tx.send(PendingJob::new(vec![0x7F, 0, 0, 0])).await.unwrap();
        drop(tx);
        handle.shutdown().await.unwrap();
        assert!(log.is_empty());
    }
}
