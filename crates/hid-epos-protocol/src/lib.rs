//! EPOS Busylight HID protocol: 10-byte set-colour commands.
//!
//! The EPOS (ex-Sennheiser) headset busylight has two LED groups that
//! this protocol always drives together. One action word (0x1202,
//! "set colour") covers everything; the final byte gates the LEDs on
//! or off. The firmware is stateless.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.
//!
//! # Command layout (10 bytes)
//! | Offset | Field   | Value                          |
//! |--------|---------|--------------------------------|
//! | 0      | report  | constant 0x01                  |
//! | 1-2    | action  | 0x12 0x02 (set colour)         |
//! | 3-5    | colour  | R, G, B for the first group    |
//! | 6-8    | colour  | R, G, B for the second group   |
//! | 9      | on      | 1 lit, 0 dark                  |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

/// EPOS USB Vendor ID (Sennheiser Communications).
pub const EPOS_VENDOR_ID: u16 = 0x1395;

/// EPOS Busylight product ID.
pub const PRODUCT_BUSYLIGHT: u16 = 0x0074;

/// Command length in bytes.
pub const REPORT_LEN: usize = 10;

const REPORT_ID: u8 = 0x01;
const ACTION_SET_COLOR: [u8; 2] = [0x12, 0x02];

/// Returns `true` if the VID/PID pair identifies an EPOS Busylight.
pub fn is_epos_device(vid: u16, pid: u16) -> bool {
    vid == EPOS_VENDOR_ID && pid == PRODUCT_BUSYLIGHT
}

/// Encode a steady colour on both LED groups.
///
/// Black clears the on-gate as well, matching what the vendor software
/// sends for "off".
pub fn encode_solid(r: u8, g: u8, b: u8) -> [u8; REPORT_LEN] {
    let on = u8::from(!(r == 0 && g == 0 && b == 0));
    [
        REPORT_ID,
        ACTION_SET_COLOR[0],
        ACTION_SET_COLOR[1],
        r,
        g,
        b,
        r,
        g,
        b,
        on,
    ]
}

/// Encode "light off".
pub fn encode_off() -> [u8; REPORT_LEN] {
    encode_solid(0, 0, 0)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The two LED groups always carry identical colour, and the
        /// on-gate reflects darkness exactly.
        #[test]
        fn prop_groups_match(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let report = encode_solid(r, g, b);
            prop_assert_eq!(&report[3..6], &report[6..9]);
            prop_assert_eq!(report[9] == 1, r != 0 || g != 0 || b != 0);
        }
    }
}
