//! ThingM Blink(1) HID protocol: 8-byte feature-report commands.
//!
//! The Blink(1) mk2 has two LEDs (top and bottom) and speaks an
//! ASCII-opcode command set over *feature* reports — it ignores output
//! reports entirely. The firmware can play short colour patterns from
//! its own pattern memory, which is how hardware blink works here:
//! write two pattern lines, persist them, start the loop.
//!
//! This crate is intentionally I/O-free: pure functions and constants
//! that can be tested without hardware.
//!
//! # Command layout (8 bytes)
//! | Offset | Field  | Value                                       |
//! |--------|--------|---------------------------------------------|
//! | 0      | report | constant 0x01                               |
//! | 1      | action | ASCII opcode ('c' fade, 'n' set, 'P', 'W', 'p') |
//! | 2-4    | colour | R, G, B (or opcode-specific operands)       |
//! | 5-6    | fade   | big-endian fade time, milliseconds          |
//! | 7      | leds   | 0 all, 1 top, 2 bottom (or pattern line)    |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod command;
pub mod ids;

pub use command::{
    fade_to_color, play_loop, save_patterns, set_color, write_pattern_line, Action, Led,
    REPORT_LEN,
};
pub use ids::{is_thingm_device, product_name, PRODUCT_BLINK1, THINGM_VENDOR_ID};
