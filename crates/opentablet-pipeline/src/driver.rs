//! Driver instance lifecycle.
//!
//! One [`TabletDriver`] owns everything for one attached device: the shared
//! ring log, the deferred worker, and the capture task driving the
//! transport port. There is no module-level state; attaching twice yields
//! two fully independent pipelines.

use std::sync::Arc;

use opentablet_device_types::TabletConfig;
use opentablet_ringlog::{LogReader, RingLogStats, SharedRingLog};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::capture::{CaptureFrontend, CaptureStats, CaptureStatsSnapshot, CaptureTask};
use crate::scheduler::{DeferredScheduler, SchedulerHandle};
use crate::sink::InputEventSink;
use crate::transport::TransferPort;
use opentablet_errors::{AttachError, DetachError, TransportError};

/// A running driver instance for one device.
pub struct TabletDriver {
    config: TabletConfig,
    log: SharedRingLog,
    stats: Arc<CaptureStats>,
    scheduler: SchedulerHandle,
    capture: JoinHandle<Result<(), TransportError>>,
    shutdown_tx: oneshot::Sender<()>,
}

impl TabletDriver {
    /// Attach the driver: validate the configuration, allocate the ring
    /// log, spawn the worker and the capture task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::InvalidConfig`] when the configuration fails
    /// validation; nothing is spawned in that case.
    pub fn attach(
        config: TabletConfig,
        port: Box<dyn TransferPort>,
        sink: Box<dyn InputEventSink>,
    ) -> Result<Self, AttachError> {
        config
            .validate()
            .map_err(|e| AttachError::InvalidConfig(e.to_string()))?;

        let log = SharedRingLog::with_capacity(config.log_capacity, config.overflow_policy);
        let scheduler = DeferredScheduler::spawn(&config, log.clone(), sink);
        let stats = Arc::new(CaptureStats::default());
        let frontend = CaptureFrontend::new(scheduler.sender(), Arc::clone(&stats));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let capture = tokio::spawn(CaptureTask::new(port, frontend).run(shutdown_rx));

        info!(
            vendor = format_args!("{:#06x}", config.vendor_id),
            product = format_args!("{:#06x}", config.product_id),
            buttons = config.button_count,
            capacity = config.log_capacity,
            "tablet driver attached"
        );

        Ok(Self {
            config,
            log,
            stats,
            scheduler,
            capture,
            shutdown_tx,
        })
    }

    pub fn config(&self) -> &TabletConfig {
        &self.config
    }

    /// Open the consumer read interface. Always succeeds.
    pub fn reader(&self) -> LogReader {
        self.log.reader()
    }

    pub fn capture_stats(&self) -> CaptureStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn log_stats(&self) -> RingLogStats {
        self.log.stats()
    }

    /// Detach the driver deterministically.
    ///
    /// Order matters: first the in-flight transfer is cancelled and
    /// awaited, then the worker drains every already-enqueued job and
    /// joins, and only then does the ring log go away with the driver
    /// value. No job or callback can run against freed state.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::CancelFailed`] when transfer cancellation
    /// fails (leaking an active transfer is fatal-class and must not be
    /// ignored), or [`DetachError::WorkerFailed`] when a task terminated
    /// abnormally.
    pub async fn detach(self) -> Result<(), DetachError> {
        if self.shutdown_tx.send(()).is_err() {
            debug!("capture task already stopped");
        }
        match self.capture.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(DetachError::CancelFailed {
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                return Err(DetachError::WorkerFailed {
                    reason: e.to_string(),
                });
            }
        }

        // Capture task is gone, so its sender clone is too; the worker
        // drains what is left and exits.
        self.scheduler.shutdown().await?;
        info!("tablet driver detached");
        Ok(())
    }
}
