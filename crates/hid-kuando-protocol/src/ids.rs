//! Kuando USB vendor and product ID constants.
//!
//! Early Busylight Alpha units shipped on a Microchip development VID;
//! later production moved to Kuando's own 0x27BB.

/// Microchip USB Vendor ID (early Busylight Alpha units).
pub const MICROCHIP_VENDOR_ID: u16 = 0x04D8;

/// Kuando (Plenom A/S) USB Vendor ID.
pub const KUANDO_VENDOR_ID: u16 = 0x27BB;

/// Busylight Alpha on the Microchip VID.
pub const PRODUCT_ALPHA_MICROCHIP: u16 = 0xF848;

/// Busylight Alpha.
pub const PRODUCT_ALPHA: u16 = 0x3BCA;

/// Busylight Omega.
pub const PRODUCT_OMEGA: u16 = 0x3BCD;

/// Busylight Omega, later revision.
pub const PRODUCT_OMEGA_REV2: u16 = 0x3BCF;

/// Returns `true` if the VID/PID pair identifies a Busylight.
pub fn is_kuando_device(vid: u16, pid: u16) -> bool {
    match vid {
        MICROCHIP_VENDOR_ID => pid == PRODUCT_ALPHA_MICROCHIP,
        KUANDO_VENDOR_ID => matches!(pid, PRODUCT_ALPHA | PRODUCT_OMEGA | PRODUCT_OMEGA_REV2),
        _ => false,
    }
}

/// Returns the marketing name for a known device, or `None`.
pub fn product_name(vid: u16, pid: u16) -> Option<&'static str> {
    match (vid, pid) {
        (MICROCHIP_VENDOR_ID, PRODUCT_ALPHA_MICROCHIP) | (KUANDO_VENDOR_ID, PRODUCT_ALPHA) => {
            Some("Busylight Alpha")
        }
        (KUANDO_VENDOR_ID, PRODUCT_OMEGA) | (KUANDO_VENDOR_ID, PRODUCT_OMEGA_REV2) => {
            Some("Busylight Omega")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products_recognised() {
        assert!(is_kuando_device(MICROCHIP_VENDOR_ID, PRODUCT_ALPHA_MICROCHIP));
        assert!(is_kuando_device(KUANDO_VENDOR_ID, PRODUCT_ALPHA));
        assert!(is_kuando_device(KUANDO_VENDOR_ID, PRODUCT_OMEGA));
        assert!(is_kuando_device(KUANDO_VENDOR_ID, PRODUCT_OMEGA_REV2));
    }

    #[test]
    fn unknown_product_not_recognised() {
        assert!(!is_kuando_device(KUANDO_VENDOR_ID, 0x0001));
        assert!(!is_kuando_device(MICROCHIP_VENDOR_ID, PRODUCT_ALPHA));
    }

    #[test]
    fn product_names() {
        assert_eq!(
            product_name(KUANDO_VENDOR_ID, PRODUCT_ALPHA),
            Some("Busylight Alpha")
        );
        assert_eq!(
            product_name(KUANDO_VENDOR_ID, PRODUCT_OMEGA),
            Some("Busylight Omega")
        );
        assert_eq!(product_name(KUANDO_VENDOR_ID, 0xFFFF), None);
    }
}
