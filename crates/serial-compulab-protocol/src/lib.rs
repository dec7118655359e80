//! CompuLab fit-statUSB serial protocol: ASCII line commands.
//!
//! The fit-statUSB is a USB-CDC device taking short ASCII commands
//! terminated by a newline. Colour commands are `B#rrggbb\n` with
//! lowercase hex channels. The firmware is stateless and latches the
//! last command; the CDC link ignores the configured baud rate.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

/// CompuLab USB Vendor ID.
pub const COMPULAB_VENDOR_ID: u16 = 0x2047;

/// fit-statUSB product ID.
pub const PRODUCT_FIT_STATUSB: u16 = 0x03DF;

/// Nominal baud rate; the CDC bridge ignores it.
pub const BAUD_RATE: u32 = 9600;

/// Returns `true` if the VID/PID pair identifies a fit-statUSB.
pub fn is_compulab_device(vid: u16, pid: u16) -> bool {
    vid == COMPULAB_VENDOR_ID && pid == PRODUCT_FIT_STATUSB
}

/// Encode a steady colour command, newline terminated.
pub fn encode_solid(r: u8, g: u8, b: u8) -> Vec<u8> {
    format!("B#{r:02x}{g:02x}{b:02x}\n").into_bytes()
}

/// Encode "light off".
pub fn encode_off() -> Vec<u8> {
    encode_solid(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_red_command() {
        assert_eq!(encode_solid(255, 0, 0), b"B#ff0000\n");
    }

    #[test]
    fn mixed_color_is_lowercase_hex() {
        assert_eq!(encode_solid(0x0A, 0xBC, 0x0D), b"B#0abc0d\n");
    }

    #[test]
    fn off_is_black() {
        assert_eq!(encode_off(), b"B#000000\n");
    }

    #[test]
    fn device_id_recognised() {
        assert!(is_compulab_device(COMPULAB_VENDOR_ID, PRODUCT_FIT_STATUSB));
        assert!(!is_compulab_device(COMPULAB_VENDOR_ID, 0x0001));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Commands are always 9 bytes, newline terminated, and parse
        /// back to the input colour.
        #[test]
        fn prop_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let cmd = encode_solid(r, g, b);
            prop_assert_eq!(cmd.len(), 9);
            prop_assert_eq!(cmd[0], b'B');
            prop_assert_eq!(cmd[1], b'#');
            prop_assert_eq!(*cmd.last().expect("nonempty"), b'\n');

            let hex = std::str::from_utf8(&cmd[2..8]).expect("ascii");
            prop_assert_eq!(u8::from_str_radix(&hex[0..2], 16).expect("hex"), r);
            prop_assert_eq!(u8::from_str_radix(&hex[2..4], 16).expect("hex"), g);
            prop_assert_eq!(u8::from_str_radix(&hex[4..6], 16).expect("hex"), b);
        }
    }
}
