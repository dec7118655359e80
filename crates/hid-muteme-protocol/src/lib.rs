//! MuteMe HID protocol: 2-byte commands, 3-bit colour.
//!
//! The MuteMe button can only display eight colours: each channel is a
//! single bit. Callers must quantise 24-bit colour before encoding.
//! The device also reports touch events on a 4-byte input report; that
//! read path is not required for light operation and is not modelled
//! here.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.
//!
//! # Command layout (2 bytes)
//! | Offset | Field | Value                                         |
//! |--------|-------|-----------------------------------------------|
//! | 0      | header| constant 0x00                                 |
//! | 1      | bits  | bit0 red, bit1 green, bit2 blue, bit4 dim,    |
//! |        |       | bit5 blink, bit6 sleep                        |
//!
//! Fast blink is expressed as blink+dim; the firmware halves the blink
//! period when both bits are set.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod command;
pub mod ids;

pub use command::{
    encode_blink, encode_off, encode_solid, BlinkRate, BIT_BLINK, BIT_BLUE, BIT_DIM, BIT_GREEN,
    BIT_RED, BIT_SLEEP, REPORT_LEN,
};
pub use ids::{is_muteme_device, product_name, MUTEME_VENDOR_ID, VUSB_VENDOR_ID};
