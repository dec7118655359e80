//! Luxafor Flag HID protocol: 8-byte command reports.
//!
//! The Flag has six individually addressable LEDs (three on the flag
//! face, three on the back bar). Commands select a mode in the first
//! byte and a LED group or single LED in the second; the firmware is
//! stateless and latches the last command.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.
//!
//! # Command layout (8 bytes)
//! | Offset | Field   | Value                                      |
//! |--------|---------|--------------------------------------------|
//! | 0      | command | 1 colour, 2 fade, 3 strobe, 4 wave, 6 pattern |
//! | 1      | leds    | 0xFF all, 0x41 back, 0x42 front, 1-6 single |
//! | 2-4    | colour  | R, G, B                                    |
//! | 5-7    | trailer | command-specific (fade time, speed, repeat) |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod command;
pub mod ids;

pub use command::{
    encode_color, encode_fade, encode_off, encode_strobe, LedTarget, Command, LED_COUNT,
    REPORT_LEN,
};
pub use ids::{is_luxafor_device, product_name, LUXAFOR_VENDOR_ID, PRODUCT_FLAG};
