//! MuteMe USB vendor and product ID constants.

/// MuteMe USB Vendor ID (shared 0x20A0 block).
pub const MUTEME_VENDOR_ID: u16 = 0x20A0;

/// V-USB shared Vendor ID used by the original prototype run.
pub const VUSB_VENDOR_ID: u16 = 0x16C0;

/// MuteMe (full size).
pub const PRODUCT_MUTEME: u16 = 0x42DA;

/// MuteMe Mini.
pub const PRODUCT_MUTEME_MINI: u16 = 0x42DB;

/// Prototype-run MuteMe on the V-USB VID.
pub const PRODUCT_MUTEME_PROTOTYPE: u16 = 0x27DB;

/// Returns `true` if the VID/PID pair identifies a MuteMe.
pub fn is_muteme_device(vid: u16, pid: u16) -> bool {
    match vid {
        MUTEME_VENDOR_ID => matches!(pid, PRODUCT_MUTEME | PRODUCT_MUTEME_MINI),
        VUSB_VENDOR_ID => pid == PRODUCT_MUTEME_PROTOTYPE,
        _ => false,
    }
}

/// Returns the marketing name for a known device, or `None`.
pub fn product_name(vid: u16, pid: u16) -> Option<&'static str> {
    match (vid, pid) {
        (MUTEME_VENDOR_ID, PRODUCT_MUTEME) | (VUSB_VENDOR_ID, PRODUCT_MUTEME_PROTOTYPE) => {
            Some("MuteMe")
        }
        (MUTEME_VENDOR_ID, PRODUCT_MUTEME_MINI) => Some("MuteMe Mini"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products_recognised() {
        assert!(is_muteme_device(MUTEME_VENDOR_ID, PRODUCT_MUTEME));
        assert!(is_muteme_device(MUTEME_VENDOR_ID, PRODUCT_MUTEME_MINI));
        assert!(is_muteme_device(VUSB_VENDOR_ID, PRODUCT_MUTEME_PROTOTYPE));
    }

    #[test]
    fn unknown_product_not_recognised() {
        assert!(!is_muteme_device(MUTEME_VENDOR_ID, 0x0001));
        assert!(!is_muteme_device(VUSB_VENDOR_ID, PRODUCT_MUTEME));
    }
}
