//! Centralized error types for OpenTablet
//!
//! The error surface mirrors the driver's propagation policy: per-frame
//! failures (bad transfer status, short frame, full job queue) are absorbed
//! where they occur and only counted, while lifecycle failures (attach
//! rejection, failed transfer cancellation at detach) propagate to the
//! caller tearing the driver down.
//!
//! # Modules
//!
//! - [`common`]: top-level error enum and severity classification
//! - [`transport`]: transfer-completion and port errors
//! - [`lifecycle`]: attach/detach errors

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod lifecycle;
pub mod transport;

pub use common::{ErrorSeverity, OpenTabletError};
pub use lifecycle::{AttachError, DetachError};
pub use transport::{QueueError, TransportError};

/// A specialized `Result` type for OpenTablet operations.
pub type Result<T> = std::result::Result<T, OpenTabletError>;
