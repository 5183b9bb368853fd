//! Device types for tablet hardware abstraction
//!
//! This crate provides the device-agnostic vocabulary of the driver: the
//! normalized events emitted at the input boundary, the button-to-key
//! mapping scheme, the pipeline policy knobs, and the validated per-device
//! configuration surface.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

use serde::{Deserialize, Serialize};

/// Most buttons any supported tablet exposes.
pub const MAX_BUTTONS: u32 = 18;

/// An absolute input axis reported by the tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Pressure,
}

impl Axis {
    /// Stable display name used in log records.
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Pressure => "Pressure",
        }
    }
}

/// Stable external key identifier a tablet button maps to.
///
/// The scheme is fixed: button indices 0-9 map to the digit keys, 10-15 to
/// the letter keys A-F, and 16-17 to auxiliary keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Digit key `0`-`9`
    Digit(u8),
    /// Letter key `A`-`F`
    Letter(char),
    /// Auxiliary key with a scheme-local ordinal
    Aux(u8),
}

/// Map a button index to its external key identifier.
///
/// Total over `0..MAX_BUTTONS`; indices at or beyond `MAX_BUTTONS` have no
/// mapping and return `None` rather than panicking.
pub const fn map_button(index: u32) -> Option<KeyCode> {
    match index {
        0..=9 => Some(KeyCode::Digit(index as u8)),
        10..=15 => Some(KeyCode::Letter((b'A' + (index as u8 - 10)) as char)),
        16..=17 => Some(KeyCode::Aux(index as u8 - 16)),
        _ => None,
    }
}

/// A semantic, device-agnostic input event.
///
/// Produced by the translator from exactly one raw frame; has no identity
/// beyond emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedEvent {
    /// Relative movement on an axis
    AxisDelta { axis: Axis, delta: i32 },
    /// Absolute position on an axis
    AxisAbsolute { axis: Axis, value: i32 },
    /// A button changed (or re-reported) its state
    ButtonState { key: KeyCode, pressed: bool },
}

/// Which button events the translator emits per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonEmitPolicy {
    /// Emit every supported index every frame (full state resync).
    #[default]
    FullState,
    /// Emit only indices whose state changed since the previous frame.
    TransitionsOnly,
}

/// What the ring log does when an append would exceed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Discard all unread data, then append the new record.
    #[default]
    ResetAll,
    /// Keep prior data and drop the new record.
    DropNewest,
    /// Truncate the new record to the space remaining.
    TruncateToFit,
}

/// Configuration rejected at attach time.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("button_count {0} exceeds supported maximum {MAX_BUTTONS}")]
    TooManyButtons(u32),

    #[error("log_capacity must be non-zero")]
    ZeroCapacity,
}

/// Per-device configuration accepted at attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletConfig {
    /// USB vendor ID of the device instance
    pub vendor_id: u16,
    /// USB product ID of the device instance
    pub product_id: u16,
    /// Number of physical buttons, at most [`MAX_BUTTONS`]
    pub button_count: u32,
    /// Uniform polarity inversion quirk for the button mask
    pub invert_buttons: bool,
    /// Ring log capacity in bytes
    pub log_capacity: usize,
    pub emit_policy: ButtonEmitPolicy,
    pub overflow_policy: OverflowPolicy,
}

impl Default for TabletConfig {
    fn default() -> Self {
        Self {
            vendor_id: 0x056A,
            product_id: 0x0357,
            button_count: 9,
            invert_buttons: false,
            log_capacity: 1024,
            emit_policy: ButtonEmitPolicy::default(),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl TabletConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    pub fn with_button_count(mut self, count: u32) -> Self {
        self.button_count = count;
        self
    }

    pub fn with_inverted_buttons(mut self, invert: bool) -> Self {
        self.invert_buttons = invert;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_emit_policy(mut self, policy: ButtonEmitPolicy) -> Self {
        self.emit_policy = policy;
        self
    }

    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the button count exceeds the supported
    /// maximum or the log capacity is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.button_count > MAX_BUTTONS {
            return Err(ConfigError::TooManyButtons(self.button_count));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
