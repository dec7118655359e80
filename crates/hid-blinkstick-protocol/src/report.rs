//! BlinkStick report encoding.

/// Report IDs and their LED capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Single = 1,
    Indexed = 5,
    Leds8 = 6,
    Leds16 = 7,
    Leds32 = 8,
    Leds64 = 9,
}

impl Report {
    /// Smallest dataframe report that fits `led_count` LEDs.
    pub fn for_led_count(led_count: u8) -> Report {
        match led_count {
            0..=1 => Report::Single,
            2..=8 => Report::Leds8,
            9..=16 => Report::Leds16,
            17..=32 => Report::Leds32,
            _ => Report::Leds64,
        }
    }

    /// LED slots carried by a dataframe report.
    pub fn capacity(self) -> usize {
        match self {
            Report::Single | Report::Indexed => 1,
            Report::Leds8 => 8,
            Report::Leds16 => 16,
            Report::Leds32 => 32,
            Report::Leds64 => 64,
        }
    }
}

/// Encode the single-LED report: `[1, G, R, B]`.
pub fn encode_single(r: u8, g: u8, b: u8) -> [u8; 4] {
    [Report::Single as u8, g, r, b]
}

/// Encode one LED by index: `[5, channel, index, R, G, B]`.
///
/// Unlike every other report, the indexed report carries R, G, B.
pub fn encode_indexed(channel: u8, index: u8, r: u8, g: u8, b: u8) -> [u8; 6] {
    [Report::Indexed as u8, channel, index, r, g, b]
}

/// Encode a full dataframe for `colors`, padding unused slots dark.
///
/// The report is the smallest dataframe that fits the slice (never the
/// single-LED report, which has a different shape); each slot is
/// written G, R, B.
pub fn encode_frame(channel: u8, colors: &[(u8, u8, u8)]) -> Vec<u8> {
    let report = match colors.len() {
        0..=8 => Report::Leds8,
        9..=16 => Report::Leds16,
        17..=32 => Report::Leds32,
        _ => Report::Leds64,
    };
    let capacity = report.capacity();
    let mut buf = Vec::with_capacity(2 + capacity * 3);
    buf.push(report as u8);
    buf.push(channel);
    for slot in 0..capacity {
        let (r, g, b) = colors.get(slot).copied().unwrap_or((0, 0, 0));
        buf.extend_from_slice(&[g, r, b]);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_report_is_grb() {
        assert_eq!(encode_single(1, 2, 3), [1, 2, 1, 3]);
    }

    #[test]
    fn indexed_report_is_rgb() {
        assert_eq!(encode_indexed(0, 4, 10, 20, 30), [5, 0, 4, 10, 20, 30]);
    }

    #[test]
    fn eight_led_frame_shape() {
        let colors = vec![(255, 0, 0); 8];
        let frame = encode_frame(0, &colors);
        assert_eq!(frame.len(), 2 + 8 * 3);
        assert_eq!(frame[0], Report::Leds8 as u8);
        // Slot 0 is G, R, B.
        assert_eq!(&frame[2..5], &[0, 255, 0]);
    }

    #[test]
    fn short_slices_pad_dark() {
        let frame = encode_frame(0, &[(9, 9, 9), (1, 2, 3)]);
        assert_eq!(frame.len(), 2 + 8 * 3);
        assert_eq!(&frame[5..8], &[2, 1, 3]);
        assert_eq!(&frame[8..11], &[0, 0, 0]);
    }

    #[test]
    fn report_selection_by_led_count() {
        assert_eq!(Report::for_led_count(1), Report::Single);
        assert_eq!(Report::for_led_count(2), Report::Leds8);
        assert_eq!(Report::for_led_count(8), Report::Leds8);
        assert_eq!(Report::for_led_count(9), Report::Leds16);
        assert_eq!(Report::for_led_count(32), Report::Leds32);
        assert_eq!(Report::for_led_count(64), Report::Leds64);
        assert_eq!(Report::for_led_count(192), Report::Leds64);
    }
}
