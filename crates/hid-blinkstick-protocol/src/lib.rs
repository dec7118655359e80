//! Agile Innovative BlinkStick HID protocol.
//!
//! One VID/PID covers the whole product line; the variant (and with it
//! the LED count) is recovered from the serial number's major version
//! or the USB release number. Reports are variable length, selected by
//! the leading report-id byte, and every colour slot is written in
//! G, R, B order. The firmware has no blink of its own; hosts
//! synthesise all effects.
//!
//! This crate is intentionally I/O-free: pure functions and types that
//! can be tested without hardware.
//!
//! # Report layouts
//! | Report | Bytes            | Use                          |
//! |--------|------------------|------------------------------|
//! | 1      | `[1, G, R, B]`   | single-LED devices           |
//! | 5      | `[5, ch, i, R, G, B]` | one LED by index        |
//! | 6..=9  | `[id, ch, (G,R,B)×n]` | 8/16/32/64-LED dataframe |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod ids;
pub mod report;
pub mod variant;

pub use ids::{is_blinkstick_device, BLINKSTICK_PRODUCT_ID, BLINKSTICK_VENDOR_ID};
pub use report::{encode_frame, encode_indexed, encode_single, Report};
pub use variant::BlinkStickVariant;
