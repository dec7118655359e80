//! Embrava Blynclight HID protocol: 9-byte command encoding.
//!
//! The Blynclight family (and the Plantronics Status Indicator OEM
//! rebadge) accepts a single fixed-length output report that fully
//! describes the light's state. The firmware latches the last report;
//! the device is stateless and needs no keep-alive.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware or HID plumbing.
//!
//! # Command layout (9 bytes)
//! | Offset | Field  | Value                                          |
//! |--------|--------|------------------------------------------------|
//! | 0      | header | constant 0x00                                  |
//! | 1      | red    | 8-bit channel                                  |
//! | 2      | blue   | 8-bit channel (wire order is R, B, G)          |
//! | 3      | green  | 8-bit channel                                  |
//! | 4      | flags  | bit0 off, bit1 dim, bit2 flash, bits3-5 speed  |
//! | 5      | music  | bits0-3 tune, bit4 play, bit5 repeat           |
//! | 6      | sound  | bits0-3 volume, bit4 mute                      |
//! | 7-8    | footer | constant 0xFF 0x22                             |
//!
//! The flash speed field is one-hot: only 1, 2, and 4 are legal. Other
//! values put the firmware into an unpleasant strobe, so the type
//! system forbids them here.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod command;
pub mod ids;

pub use command::{
    decode_color, encode_blink, encode_off, encode_solid, FlashSpeed, FLAG_DIM, FLAG_FLASH,
    FLAG_OFF, REPORT_LEN,
};
pub use ids::{is_embrava_device, product_name, EMBRAVA_VENDOR_ID, EMBRAVA_VENDOR_ID_ALT,
    PLANTRONICS_VENDOR_ID};
