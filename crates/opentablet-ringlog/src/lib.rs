//! Bounded append/drain byte store for the driver's diagnostic log.
//!
//! One writer role (the deferred worker) appends formatted records; one
//! reader role (the consumer read interface) drains bytes at its own pace.
//! Both are serialized through a single lock, so a reader can never observe
//! a partially appended record.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod shared;

pub use buffer::{AppendOutcome, RingLogBuffer, RingLogStats};
pub use shared::{LogReader, SharedRingLog};
