//! Kuando Busylight HID protocol: 64-byte step programs.
//!
//! The Busylight Alpha and Omega execute a tiny program of up to seven
//! 8-byte steps; an eighth 8-byte region at the tail carries device
//! settings, a mandatory pad, and a checksum. The firmware is
//! *stateful*: it reverts to dark unless the host keeps transmitting —
//! a keep-alive step must arrive at least every
//! [`KEEPALIVE_MAX_SECS`] seconds.
//!
//! This crate is intentionally I/O-free: pure functions and types that
//! can be tested without hardware.
//!
//! # Program layout (64 bytes)
//! | Bytes  | Field                                          |
//! |--------|------------------------------------------------|
//! | 0-55   | steps 0-6, 8 bytes each                        |
//! | 56     | sensitivity                                    |
//! | 57     | timeout                                        |
//! | 58     | trigger                                        |
//! | 59-61  | pad, constant 0xFF 0xFF 0xFF                   |
//! | 62-63  | checksum: big-endian 16-bit sum of bytes 0-61  |
//!
//! # Step layout (8 bytes)
//! | Offset | Field                                               |
//! |--------|-----------------------------------------------------|
//! | 0      | opcode: hi nibble op, lo nibble target / timeout    |
//! | 1      | repeat count                                        |
//! | 2-4    | red, green, blue as PWM percentages, 0-100          |
//! | 5      | on duration, tenths of a second                     |
//! | 6      | off duration, tenths of a second                    |
//! | 7      | bit7 update, bits3-6 ringtone, bits0-2 volume       |
//!
//! Colour channels above 100 are clamped to 100; the firmware treats
//! the field as a percentage duty cycle.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod ids;
pub mod program;

pub use ids::{is_kuando_device, product_name, KUANDO_VENDOR_ID, MICROCHIP_VENDOR_ID};
pub use program::{
    checksum, clamp_pwm, program_blink, program_keepalive, program_off, program_solid,
    CommandBuffer, OpCode, Step, KEEPALIVE_MAX_SECS, PWM_MAX, REPORT_LEN, STEP_COUNT, STEP_LEN,
};
