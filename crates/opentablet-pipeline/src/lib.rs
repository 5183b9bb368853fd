//! Asynchronous event-capture and buffered-delivery pipeline.
//!
//! The path from an unpredictable transfer-completion callback to a slow
//! log consumer:
//!
//! ```text
//! transport completion ──► capture frontend ──► bounded job queue
//!                             (never blocks)        (FIFO)
//!                                                      │
//!                          deferred worker ◄──────────┘
//!                       parse ► translate ► sink dispatch ► ring log
//! ```
//!
//! The frontend runs in the completion context and must not block: it
//! validates the transfer, hands the frame off with a non-blocking send,
//! and re-arms the transfer unconditionally. The worker runs where blocking
//! is allowed and owns all buffer mutation. The two never share a lock.
//!
//! [`driver::TabletDriver`] owns one instance of the whole pipeline per
//! attached device and tears it down deterministically.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod capture;
pub mod driver;
pub mod scheduler;
pub mod sink;
pub mod transfer;
pub mod translate;
pub mod transport;

pub use capture::{CaptureFrontend, CaptureStats, CaptureStatsSnapshot, CaptureTask};
pub use driver::TabletDriver;
pub use scheduler::{DeferredScheduler, JOB_QUEUE_DEPTH, PendingJob, SchedulerHandle};
pub use sink::{InputEventSink, TracingSink};
pub use transfer::{CompletionStatus, TransferSlot, TransferState, TransferStateError};
pub use translate::{FrameOutput, Translator};
pub use transport::{TransferComplete, TransferPort};
