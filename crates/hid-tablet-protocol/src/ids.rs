//! Tablet vendor ID and product ID constants.
//!
//! The vendor ID is the Wacom Co., Ltd USB vendor ID as registered in the
//! Linux kernel `hid-ids.h` (`USB_VENDOR_ID_WACOM = 0x056a`). Product IDs
//! cover the pen-and-buttons tablets this driver targets; tablets from the
//! same family that only differ in sensing area share a report layout.

#![deny(static_mut_refs)]

/// Wacom Co., Ltd USB Vendor ID.
pub const TABLET_VENDOR_ID: u16 = 0x056A;

/// Known product IDs with the button-mask + absolute-axes report layout.
pub mod product_ids {
    /// Intuos Pro S (PTH-460)
    pub const INTUOS_PRO_S: u16 = 0x0357;
    /// Intuos Pro M (PTH-660)
    pub const INTUOS_PRO_M: u16 = 0x0358;
    /// Intuos Pro L (PTH-860)
    pub const INTUOS_PRO_L: u16 = 0x035A;
}

/// Whether `(vendor_id, product_id)` names a device this crate can parse.
pub fn is_supported_product(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == TABLET_VENDOR_ID
        && matches!(
            product_id,
            product_ids::INTUOS_PRO_S | product_ids::INTUOS_PRO_M | product_ids::INTUOS_PRO_L
        )
}
