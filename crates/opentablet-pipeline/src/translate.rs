//! Raw-frame to normalized-event translation.
//!
//! Pure: one decoded frame (plus the previous effective button mask) in,
//! a sequence of normalized events and one deterministic log record out.
//! No I/O, no locks, so the whole mapping is testable byte-for-byte.

use std::fmt::Write as _;

use opentablet_device_types::{
    Axis, ButtonEmitPolicy, NormalizedEvent, TabletConfig, map_button,
};
use opentablet_hid_tablet_protocol::{ButtonMask, TabletInputRaw};

/// Translation result for exactly one frame.
///
/// `events` is the atomic unit handed to the input boundary: every event
/// in it belongs to the same frame and must be dispatched together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameOutput {
    pub events: Vec<NormalizedEvent>,
    /// Human-readable record for the ring log. Deterministic given the
    /// events: stable field order, fixed decimal formatting.
    pub record: String,
}

impl FrameOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.record.is_empty()
    }
}

/// Pure mapping from raw frames to normalized events and log records.
#[derive(Debug, Clone)]
pub struct Translator {
    button_count: u32,
    invert_buttons: bool,
    emit_policy: ButtonEmitPolicy,
}

impl Translator {
    pub fn new(config: &TabletConfig) -> Self {
        Self {
            button_count: config.button_count,
            invert_buttons: config.invert_buttons,
            emit_policy: config.emit_policy,
        }
    }

    /// Apply the polarity quirk to a wire mask.
    ///
    /// The result is the physically asserted state; all comparisons and
    /// emissions work on effective masks only.
    pub fn effective_mask(&self, wire: ButtonMask) -> ButtonMask {
        if self.invert_buttons {
            wire.inverted(self.button_count)
        } else {
            wire
        }
    }

    /// Translate one frame.
    ///
    /// `prev` is the previous frame's *effective* mask, used only under
    /// [`ButtonEmitPolicy::TransitionsOnly`]; `None` means this is the
    /// first frame and the baseline is all-released.
    pub fn translate(&self, raw: &TabletInputRaw, prev: Option<ButtonMask>) -> FrameOutput {
        let mut out = FrameOutput::default();
        let mask = self.effective_mask(raw.buttons);

        for index in 0..self.button_count {
            let pressed = mask.pressed(index);
            let emit = match self.emit_policy {
                ButtonEmitPolicy::FullState => true,
                ButtonEmitPolicy::TransitionsOnly => {
                    let was = prev.is_some_and(|p| p.pressed(index));
                    pressed != was
                }
            };
            if !emit {
                continue;
            }
            let Some(key) = map_button(index) else {
                continue;
            };
            out.events.push(NormalizedEvent::ButtonState { key, pressed });
            let state = if pressed { "pressed" } else { "released" };
            let _ = writeln!(out.record, "button {index} {state}");
        }

        if raw.has_axes() {
            self.translate_axes(raw, &mut out);
        }

        out
    }

    fn translate_axes(&self, raw: &TabletInputRaw, out: &mut FrameOutput) {
        let mut fields: Vec<String> = Vec::with_capacity(3);
        let axes = [
            (Axis::X, raw.x),
            (Axis::Y, raw.y),
            (Axis::Pressure, raw.pressure),
        ];
        for (axis, value) in axes {
            let Some(value) = value else { continue };
            out.events.push(NormalizedEvent::AxisAbsolute {
                axis,
                value: i32::from(value),
            });
            fields.push(format!("{}={value}", axis.name()));
        }
        if !fields.is_empty() {
            let _ = writeln!(out.record, "{}", fields.join(", "));
        }
    }
}
