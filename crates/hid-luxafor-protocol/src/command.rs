//! Luxafor Flag command encoding.

/// Command length in bytes.
pub const REPORT_LEN: usize = 8;

/// Number of individually addressable LEDs on the Flag.
pub const LED_COUNT: u8 = 6;

/// Command selector byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Color = 1,
    Fade = 2,
    Strobe = 3,
    Wave = 4,
    Pattern = 6,
}

/// LED selector byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedTarget {
    /// Every LED on the device.
    All,
    /// The three back-bar LEDs.
    Back,
    /// The three flag-face LEDs.
    Front,
    /// One LED, 1-based, 1..=6.
    Single(u8),
}

impl LedTarget {
    /// Wire value of the selector.
    pub fn bits(self) -> u8 {
        match self {
            LedTarget::All => 0xFF,
            LedTarget::Back => 0x41,
            LedTarget::Front => 0x42,
            LedTarget::Single(n) => n.clamp(1, LED_COUNT),
        }
    }
}

fn command(cmd: Command, led: LedTarget, r: u8, g: u8, b: u8, trailer: [u8; 3]) -> [u8; REPORT_LEN] {
    [
        cmd as u8,
        led.bits(),
        r,
        g,
        b,
        trailer[0],
        trailer[1],
        trailer[2],
    ]
}

/// Encode an immediate colour change.
pub fn encode_color(led: LedTarget, r: u8, g: u8, b: u8) -> [u8; REPORT_LEN] {
    command(Command::Color, led, r, g, b, [0, 0, 0])
}

/// Encode a fade to the colour over `fade_time` firmware units.
pub fn encode_fade(led: LedTarget, r: u8, g: u8, b: u8, fade_time: u8) -> [u8; REPORT_LEN] {
    command(Command::Fade, led, r, g, b, [fade_time, 0, 0])
}

/// Encode a hardware strobe between the colour and dark.
///
/// `speed` is the firmware's period unit (larger is slower); `repeat`
/// of 0 strobes until the next command.
pub fn encode_strobe(led: LedTarget, r: u8, g: u8, b: u8, speed: u8, repeat: u8) -> [u8; REPORT_LEN] {
    command(Command::Strobe, led, r, g, b, [speed, 0, repeat])
}

/// Encode "dark" for the targeted LEDs.
pub fn encode_off(led: LedTarget) -> [u8; REPORT_LEN] {
    encode_color(led, 0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_all_leds() {
        assert_eq!(
            encode_color(LedTarget::All, 255, 0, 128),
            [0x01, 0xFF, 0xFF, 0x00, 0x80, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn single_led_selector_is_index() {
        let report = encode_color(LedTarget::Single(3), 1, 2, 3);
        assert_eq!(report[1], 3);
    }

    #[test]
    fn single_led_selector_clamps_to_device_range() {
        assert_eq!(encode_color(LedTarget::Single(0), 0, 0, 0)[1], 1);
        assert_eq!(encode_color(LedTarget::Single(9), 0, 0, 0)[1], LED_COUNT);
    }

    #[test]
    fn group_selectors() {
        assert_eq!(encode_color(LedTarget::Back, 0, 0, 0)[1], 0x41);
        assert_eq!(encode_color(LedTarget::Front, 0, 0, 0)[1], 0x42);
    }

    #[test]
    fn strobe_carries_speed_and_repeat() {
        let report = encode_strobe(LedTarget::All, 0, 0, 255, 25, 4);
        assert_eq!(report[0], Command::Strobe as u8);
        assert_eq!(report[5], 25);
        assert_eq!(report[7], 4);
    }

    #[test]
    fn fade_carries_time() {
        let report = encode_fade(LedTarget::All, 10, 20, 30, 40);
        assert_eq!(report[0], Command::Fade as u8);
        assert_eq!(report[5], 40);
    }

    #[test]
    fn off_is_black_color_command() {
        let report = encode_off(LedTarget::All);
        assert_eq!(report[0], Command::Color as u8);
        assert_eq!(&report[2..5], &[0, 0, 0]);
    }
}
