//! Embrava USB vendor and product ID constants.
//!
//! Two vendor IDs appear in the wild: 0x2C0D on current hardware and
//! 0x0E53 on early units. The Plantronics Status Indicator is the same
//! board behind a Plantronics VID.

/// Embrava USB Vendor ID (current hardware).
pub const EMBRAVA_VENDOR_ID: u16 = 0x2C0D;

/// Embrava USB Vendor ID used by early production runs.
pub const EMBRAVA_VENDOR_ID_ALT: u16 = 0x0E53;

/// Plantronics USB Vendor ID (Status Indicator OEM).
pub const PLANTRONICS_VENDOR_ID: u16 = 0x047F;

/// Blynclight (original).
pub const PRODUCT_BLYNCLIGHT: u16 = 0x0001;

/// Blynclight Mini.
pub const PRODUCT_BLYNCLIGHT_MINI: u16 = 0x000A;

/// Blynclight, later revision.
pub const PRODUCT_BLYNCLIGHT_REV2: u16 = 0x000C;

/// Blynclight Plus (adds the speaker).
pub const PRODUCT_BLYNCLIGHT_PLUS: u16 = 0x0010;

/// Blynclight on the early vendor ID.
pub const PRODUCT_BLYNCLIGHT_ALT: u16 = 0x2516;

/// Blynclight Mini on the early vendor ID.
pub const PRODUCT_BLYNCLIGHT_MINI_ALT: u16 = 0x2517;

/// Plantronics Status Indicator.
pub const PRODUCT_STATUS_INDICATOR: u16 = 0xD005;

/// Returns `true` if the VID/PID pair identifies a device speaking the
/// 9-byte Blynclight protocol.
pub fn is_embrava_device(vid: u16, pid: u16) -> bool {
    match vid {
        EMBRAVA_VENDOR_ID => matches!(
            pid,
            PRODUCT_BLYNCLIGHT
                | PRODUCT_BLYNCLIGHT_MINI
                | PRODUCT_BLYNCLIGHT_REV2
                | PRODUCT_BLYNCLIGHT_PLUS
        ),
        EMBRAVA_VENDOR_ID_ALT => {
            matches!(pid, PRODUCT_BLYNCLIGHT_ALT | PRODUCT_BLYNCLIGHT_MINI_ALT)
        }
        PLANTRONICS_VENDOR_ID => pid == PRODUCT_STATUS_INDICATOR,
        _ => false,
    }
}

/// Returns the marketing name for a known device, or `None`.
pub fn product_name(vid: u16, pid: u16) -> Option<&'static str> {
    match (vid, pid) {
        (EMBRAVA_VENDOR_ID, PRODUCT_BLYNCLIGHT)
        | (EMBRAVA_VENDOR_ID, PRODUCT_BLYNCLIGHT_REV2)
        | (EMBRAVA_VENDOR_ID_ALT, PRODUCT_BLYNCLIGHT_ALT) => Some("Blynclight"),
        (EMBRAVA_VENDOR_ID, PRODUCT_BLYNCLIGHT_MINI)
        | (EMBRAVA_VENDOR_ID_ALT, PRODUCT_BLYNCLIGHT_MINI_ALT) => Some("Blynclight Mini"),
        (EMBRAVA_VENDOR_ID, PRODUCT_BLYNCLIGHT_PLUS) => Some("Blynclight Plus"),
        (PLANTRONICS_VENDOR_ID, PRODUCT_STATUS_INDICATOR) => Some("Status Indicator"),
        _ => None,
    }
}
