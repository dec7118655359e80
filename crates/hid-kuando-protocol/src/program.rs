//! Busylight step-program encoding.

/// Program length in bytes.
pub const REPORT_LEN: usize = 64;

/// Number of program steps (the eighth 8-byte slot is the tail).
pub const STEP_COUNT: usize = 7;

/// Step length in bytes.
pub const STEP_LEN: usize = 8;

/// Maximum PWM value a colour channel may carry.
pub const PWM_MAX: u8 = 100;

/// Longest keep-alive timeout the 4-bit field can express, in seconds.
pub const KEEPALIVE_MAX_SECS: u8 = 15;

const PAD_OFFSET: usize = 59;
const CHECKSUM_OFFSET: usize = 62;

/// Step opcodes (hi nibble of the step's first byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Jump = 0x1,
    Reset = 0x2,
    Boot = 0x4,
    KeepAlive = 0x8,
}

/// Clamp a colour channel to the legal PWM range.
///
/// The firmware interprets the field as a percentage; values above 100
/// are clamped rather than rescaled.
pub fn clamp_pwm(channel: u8) -> u8 {
    channel.min(PWM_MAX)
}

/// One 8-byte program step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step([u8; STEP_LEN]);

impl Step {
    /// Jump to `target` displaying a colour, optionally cycling on/off
    /// durations (tenths of a second) `repeat` times.
    pub fn jump(
        target: u8,
        (r, g, b): (u8, u8, u8),
        repeat: u8,
        on_tenths: u8,
        off_tenths: u8,
    ) -> Self {
        Step([
            ((OpCode::Jump as u8) << 4) | (target & 0x07),
            repeat,
            clamp_pwm(r),
            clamp_pwm(g),
            clamp_pwm(b),
            on_tenths,
            off_tenths,
            0x00,
        ])
    }

    /// Extend the firmware watchdog by `timeout_secs` (clamped to 15).
    pub fn keep_alive(timeout_secs: u8) -> Self {
        let timeout = timeout_secs.min(KEEPALIVE_MAX_SECS);
        Step([
            ((OpCode::KeepAlive as u8) << 4) | (timeout & 0x0F),
            0,
            0,
            0,
            0,
            0,
            0,
            0,
        ])
    }

    /// Reset the device program.
    pub fn reset() -> Self {
        Step([((OpCode::Reset as u8) << 4), 0, 0, 0, 0, 0, 0, 0])
    }

    /// Raw step bytes.
    pub fn bytes(&self) -> [u8; STEP_LEN] {
        self.0
    }
}

/// A 64-byte command buffer under construction.
///
/// `finalize` stamps the pad and checksum; until then the tail bytes
/// hold their mandatory constants and zeroed settings.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    buf: [u8; REPORT_LEN],
}

impl CommandBuffer {
    pub fn new() -> Self {
        let mut buf = [0u8; REPORT_LEN];
        buf[PAD_OFFSET..PAD_OFFSET + 3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
        Self { buf }
    }

    /// Place `step` at program slot `index` (0..=6).
    pub fn set_step(&mut self, index: usize, step: &Step) -> &mut Self {
        assert!(index < STEP_COUNT, "step index {index} out of range");
        let offset = index * STEP_LEN;
        self.buf[offset..offset + STEP_LEN].copy_from_slice(&step.bytes());
        self
    }

    /// Stamp the checksum and return the wire bytes.
    pub fn finalize(mut self) -> [u8; REPORT_LEN] {
        let sum: u16 = self.buf[..CHECKSUM_OFFSET]
            .iter()
            .map(|&byte| byte as u16)
            .sum();
        self.buf[CHECKSUM_OFFSET..].copy_from_slice(&sum.to_be_bytes());
        self.buf
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of an encoded program, as the firmware computes it.
pub fn checksum(report: &[u8; REPORT_LEN]) -> u16 {
    report[..CHECKSUM_OFFSET]
        .iter()
        .map(|&byte| byte as u16)
        .sum()
}

/// Program: display a steady colour.
pub fn program_solid(r: u8, g: u8, b: u8) -> [u8; REPORT_LEN] {
    let mut buffer = CommandBuffer::new();
    buffer.set_step(0, &Step::jump(0, (r, g, b), 0, 0, 0));
    buffer.finalize()
}

/// Program: go dark.
pub fn program_off() -> [u8; REPORT_LEN] {
    program_solid(0, 0, 0)
}

/// Program: hardware blink between the colour and dark.
pub fn program_blink(r: u8, g: u8, b: u8, on_tenths: u8, off_tenths: u8) -> [u8; REPORT_LEN] {
    let mut buffer = CommandBuffer::new();
    buffer.set_step(0, &Step::jump(0, (r, g, b), 0, on_tenths, off_tenths));
    buffer.finalize()
}

/// Program: extend the firmware watchdog without changing the colour
/// program already running.
pub fn program_keepalive(timeout_secs: u8) -> [u8; REPORT_LEN] {
    let mut buffer = CommandBuffer::new();
    buffer.set_step(0, &Step::keep_alive(timeout_secs));
    buffer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_places_jump_in_step_zero() {
        let report = program_solid(10, 20, 30);
        assert_eq!(report[0], 0x10); // Jump, target 0
        assert_eq!(&report[2..5], &[10, 20, 30]);
        assert_eq!(report[5], 0); // on time
        assert_eq!(report[6], 0); // off time
    }

    #[test]
    fn channels_clamp_to_pwm_range() {
        let report = program_solid(255, 100, 101);
        assert_eq!(&report[2..5], &[100, 100, 100]);
    }

    #[test]
    fn pad_field_is_constant() {
        let report = program_solid(1, 2, 3);
        assert_eq!(&report[59..62], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn checksum_matches_sum_of_preceding_bytes() {
        let report = program_solid(10, 20, 30);
        let expected = checksum(&report);
        assert_eq!(
            u16::from_be_bytes([report[62], report[63]]),
            expected
        );
    }

    #[test]
    fn keepalive_packs_timeout_nibble() {
        let report = program_keepalive(15);
        assert_eq!(report[0], 0x8F);

        // Over-long timeouts clamp to the 4-bit maximum.
        let report = program_keepalive(99);
        assert_eq!(report[0], 0x8F);

        let report = program_keepalive(7);
        assert_eq!(report[0], 0x87);
    }

    #[test]
    fn blink_carries_duty_cycles_in_tenths() {
        let report = program_blink(0, 0, 100, 5, 5);
        assert_eq!(report[5], 5);
        assert_eq!(report[6], 5);
    }

    #[test]
    fn off_is_black_solid() {
        let report = program_off();
        assert_eq!(&report[2..5], &[0, 0, 0]);
        assert_eq!(report[0], 0x10);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn step_seven_is_the_tail_and_rejected() {
        CommandBuffer::new().set_step(7, &Step::reset());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(500))]

        /// The checksum field always equals the 16-bit sum of bytes 0..62.
        #[test]
        fn prop_checksum_law(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            on in any::<u8>(), off in any::<u8>(),
        ) {
            let report = program_blink(r, g, b, on, off);
            let sum: u16 = report[..62].iter().map(|&x| x as u16).sum();
            prop_assert_eq!(u16::from_be_bytes([report[62], report[63]]), sum);
        }

        /// Colour fields never exceed the PWM ceiling.
        #[test]
        fn prop_pwm_clamp(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let report = program_solid(r, g, b);
            prop_assert!(report[2] <= PWM_MAX);
            prop_assert!(report[3] <= PWM_MAX);
            prop_assert!(report[4] <= PWM_MAX);
            // Values already in range pass through untouched.
            if r <= PWM_MAX { prop_assert_eq!(report[2], r); }
        }

        /// The pad field is constant for every program.
        #[test]
        fn prop_pad_constant(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let report = program_solid(r, g, b);
            prop_assert_eq!(&report[59..62], &[0xFF, 0xFF, 0xFF]);
        }

        /// Keep-alive programs never claim a timeout above 15 s.
        #[test]
        fn prop_keepalive_timeout_bounded(secs in any::<u8>()) {
            let report = program_keepalive(secs);
            prop_assert_eq!(report[0] >> 4, OpCode::KeepAlive as u8);
            prop_assert!((report[0] & 0x0F) <= KEEPALIVE_MAX_SECS);
        }
    }
}
