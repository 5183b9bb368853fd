//! Tablet HID report parsing primitives.
//!
//! This crate is intentionally small and I/O-free so the capture pipeline
//! can consume report parsing logic without pulling runtime concerns. It
//! defines the wire layout of one tablet input report, a zero-copy borrowed
//! view over it, and the decoded raw sample the translator consumes.

#![deny(static_mut_refs)]

pub mod ids;
pub mod report;

pub use ids::{TABLET_VENDOR_ID, is_supported_product, product_ids};
pub use report::{
    ButtonMask, MIN_FRAME_LEN, RawTabletReport, TabletInputRaw, input_report, parse_axis,
    parse_tablet_input_report, parse_tablet_report,
};
