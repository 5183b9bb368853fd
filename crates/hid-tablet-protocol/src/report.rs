//! Tablet HID report layout constants and zero-copy report views.

#![deny(static_mut_refs)]

/// Report ID and byte offsets for tablet input reports.
///
/// The layout is a button bitmask followed by optional absolute axes.
/// Axis fields may be absent entirely (button-only frames from the
/// express-key interface report just the mask).
pub mod input_report {
    pub const REPORT_ID: u8 = 0x02;
    pub const BUTTONS_START: usize = 1;
    pub const BUTTONS_LEN: usize = 3;
    pub const X_START: usize = BUTTONS_START + BUTTONS_LEN;
    pub const Y_START: usize = X_START + 2;
    pub const PRESSURE_START: usize = Y_START + 2;
}

/// Minimum bytes required for a valid tablet report: report ID plus the
/// full button mask. Shorter transfers are dropped by the capture frontend.
pub const MIN_FRAME_LEN: usize = input_report::BUTTONS_START + input_report::BUTTONS_LEN;

/// Decoded button bitmask from one report.
///
/// Bit *i* set means button *i* was physically asserted in that frame.
/// Polarity quirks are applied by the translator, not here; this type is a
/// faithful view of the wire state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMask(u32);

impl ButtonMask {
    /// Number of mask bits carried on the wire.
    pub const WIRE_BITS: u32 = (input_report::BUTTONS_LEN as u32) * 8;

    /// Construct from a raw bit pattern.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether button `index` is asserted. Indices beyond the wire width
    /// are never asserted.
    pub const fn pressed(self, index: u32) -> bool {
        index < Self::WIRE_BITS && (self.0 >> index) & 1 == 1
    }

    /// Mask with every bit inside `width` flipped (uniform polarity
    /// inversion device quirk). Bits outside `width` are cleared.
    pub const fn inverted(self, width: u32) -> Self {
        let keep = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
        Self(!self.0 & keep)
    }
}

/// Lightweight parsed view over a tablet input report.
#[derive(Debug, Clone, Copy)]
pub struct RawTabletReport<'a> {
    report: &'a [u8],
}

impl<'a> RawTabletReport<'a> {
    /// Construct a borrowed report view without validation.
    ///
    /// Prefer [`parse_tablet_report`] when report ID/length validation is
    /// required.
    pub fn new(report: &'a [u8]) -> Self {
        Self { report }
    }

    pub fn report_id(&self) -> u8 {
        self.report.first().copied().unwrap_or(0)
    }

    pub fn report_bytes(&self) -> &'a [u8] {
        self.report
    }

    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.report.get(offset).copied()
    }

    pub fn axis_u16_le(&self, start: usize) -> Option<u16> {
        parse_axis(self.report, start)
    }

    /// Decode the button mask, little-endian across its wire bytes.
    pub fn button_mask(&self) -> Option<ButtonMask> {
        let mut bits: u32 = 0;
        for i in 0..input_report::BUTTONS_LEN {
            let byte = self.byte(input_report::BUTTONS_START + i)?;
            bits |= u32::from(byte) << (8 * i);
        }
        Some(ButtonMask::from_bits(bits))
    }
}

/// Raw input sample extracted from a single report.
///
/// Axis fields are `None` when the frame does not carry them; the mask is
/// always present in a valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletInputRaw {
    pub buttons: ButtonMask,
    pub x: Option<u16>,
    pub y: Option<u16>,
    pub pressure: Option<u16>,
}

impl TabletInputRaw {
    /// Whether this frame carries any axis field.
    pub fn has_axes(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.pressure.is_some()
    }
}

/// Parse a little-endian `u16` axis from `report` at `start`.
pub fn parse_axis(report: &[u8], start: usize) -> Option<u16> {
    let lo = report.get(start).copied()?;
    let hi = report.get(start.checked_add(1)?).copied()?;
    Some(u16::from_le_bytes([lo, hi]))
}

/// Parse a tablet input report into a lightweight borrowed view.
///
/// Returns `None` unless:
/// - report ID is `input_report::REPORT_ID`
/// - report length is at least `MIN_FRAME_LEN`
pub fn parse_tablet_report(report: &[u8]) -> Option<RawTabletReport<'_>> {
    if report.first().copied() != Some(input_report::REPORT_ID) {
        return None;
    }
    if report.len() < MIN_FRAME_LEN {
        return None;
    }
    Some(RawTabletReport::new(report))
}

/// Parse a full tablet input report.
///
/// Axis fields (X, Y, pressure) are `None` when their bytes are absent;
/// a partial axis field (one byte of two) is treated as absent.
pub fn parse_tablet_input_report(report: &[u8]) -> Option<TabletInputRaw> {
    let report = parse_tablet_report(report)?;
    let buttons = report.button_mask()?;

    Some(TabletInputRaw {
        buttons,
        x: report.axis_u16_le(input_report::X_START),
        y: report.axis_u16_le(input_report::Y_START),
        pressure: report.axis_u16_le(input_report::PRESSURE_START),
    })
}
