//! Busy Tag serial protocol: AT-style ASCII commands.
//!
//! The Busy Tag is an ESP32-based USB-CDC desk sign. Solid colour is
//! one AT command: `AT+SC=<led mask>,<hex colour>`, where mask 127
//! addresses the whole front bar. Hex digits are lowercase; the
//! firmware is stateless.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

/// Espressif USB Vendor ID (ESP32-S2 native USB).
pub const ESPRESSIF_VENDOR_ID: u16 = 0x303A;

/// Busy Tag product ID.
pub const PRODUCT_BUSY_TAG: u16 = 0x81DF;

/// LED mask addressing every front-bar LED.
pub const LED_MASK_ALL: u8 = 127;

/// Nominal baud rate; the CDC bridge ignores it.
pub const BAUD_RATE: u32 = 9600;

/// Returns `true` if the VID/PID pair identifies a Busy Tag.
pub fn is_busytag_device(vid: u16, pid: u16) -> bool {
    vid == ESPRESSIF_VENDOR_ID && pid == PRODUCT_BUSY_TAG
}

/// Encode a steady colour across the masked LEDs.
pub fn encode_solid(r: u8, g: u8, b: u8) -> Vec<u8> {
    format!("AT+SC={LED_MASK_ALL},{r:02x}{g:02x}{b:02x}").into_bytes()
}

/// Encode "light off".
pub fn encode_off() -> Vec<u8> {
    encode_solid(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_is_an_at_command() {
        assert_eq!(encode_solid(255, 0, 0), b"AT+SC=127,ff0000");
    }

    #[test]
    fn off_is_black() {
        assert_eq!(encode_off(), b"AT+SC=127,000000");
    }

    #[test]
    fn device_id_recognised() {
        assert!(is_busytag_device(ESPRESSIF_VENDOR_ID, PRODUCT_BUSY_TAG));
        assert!(!is_busytag_device(ESPRESSIF_VENDOR_ID, 0x0001));
    }
}
