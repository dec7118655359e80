//! ThingM USB vendor and product ID constants.

/// ThingM USB Vendor ID.
pub const THINGM_VENDOR_ID: u16 = 0x27B8;

/// Blink(1), all revisions share the PID.
pub const PRODUCT_BLINK1: u16 = 0x01ED;

/// Returns `true` if the VID/PID pair identifies a Blink(1).
pub fn is_thingm_device(vid: u16, pid: u16) -> bool {
    vid == THINGM_VENDOR_ID && pid == PRODUCT_BLINK1
}

/// Returns the marketing name for a known device, or `None`.
pub fn product_name(pid: u16) -> Option<&'static str> {
    match pid {
        PRODUCT_BLINK1 => Some("Blink(1)"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink1_recognised() {
        assert!(is_thingm_device(THINGM_VENDOR_ID, PRODUCT_BLINK1));
        assert!(!is_thingm_device(THINGM_VENDOR_ID, 0x01EE));
        assert_eq!(product_name(PRODUCT_BLINK1), Some("Blink(1)"));
    }
}
