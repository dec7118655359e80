//! MuteSync button serial protocol: framed binary commands.
//!
//! The MuteSync button has four corner LEDs behind a USB-CDC bridge
//! (a SiliconLabs CP2102, whose VID/PID it shares with plenty of
//! unrelated gadgets — claiming the device additionally requires the
//! product string to mention MuteSync). A colour command is a 13-byte
//! frame: the command byte `0x41` followed by the RGB triple repeated
//! once per LED. The firmware is stateless.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

/// SiliconLabs CP210x USB Vendor ID.
pub const CP210X_VENDOR_ID: u16 = 0x10C4;

/// CP2102 bridge product ID used by the MuteSync button.
pub const PRODUCT_CP2102: u16 = 0xEA60;

/// Command frame length in bytes.
pub const FRAME_LEN: usize = 13;

/// Number of corner LEDs.
pub const LED_COUNT: usize = 4;

/// Set-colour command byte.
pub const CMD_SET_COLOR: u8 = 0x41;

/// Nominal baud rate; the CDC bridge ignores it.
pub const BAUD_RATE: u32 = 9600;

/// Returns `true` when the VID/PID pair *and* product string identify
/// a MuteSync button.
///
/// The bridge chip's identity alone is not enough: CP2102 bridges are
/// everywhere, so the product string must name the device.
pub fn is_mutesync_device(vid: u16, pid: u16, product_string: Option<&str>) -> bool {
    vid == CP210X_VENDOR_ID
        && pid == PRODUCT_CP2102
        && product_string
            .map(|s| s.to_ascii_lowercase().contains("mutesync"))
            .unwrap_or(false)
}

/// Encode a steady colour across all four corner LEDs.
pub fn encode_solid(r: u8, g: u8, b: u8) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = CMD_SET_COLOR;
    for led in 0..LED_COUNT {
        let offset = 1 + led * 3;
        frame[offset] = r;
        frame[offset + 1] = g;
        frame[offset + 2] = b;
    }
    frame
}

/// Encode "light off".
pub fn encode_off() -> [u8; FRAME_LEN] {
    encode_solid(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_repeats_color_per_led() {
        let frame = encode_solid(1, 2, 3);
        assert_eq!(frame[0], CMD_SET_COLOR);
        for led in 0..LED_COUNT {
            assert_eq!(&frame[1 + led * 3..4 + led * 3], &[1, 2, 3]);
        }
    }

    #[test]
    fn off_is_all_zero_payload() {
        let frame = encode_off();
        assert_eq!(frame[0], CMD_SET_COLOR);
        assert!(frame[1..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn claims_require_product_string() {
        assert!(is_mutesync_device(0x10C4, 0xEA60, Some("MuteSync Button")));
        assert!(is_mutesync_device(0x10C4, 0xEA60, Some("mutesync v2")));
        // A bare CP2102 bridge is not a MuteSync.
        assert!(!is_mutesync_device(0x10C4, 0xEA60, Some("CP2102 USB to UART")));
        assert!(!is_mutesync_device(0x10C4, 0xEA60, None));
    }
}
