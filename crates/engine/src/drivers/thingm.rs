//! ThingM Blink(1) driver (feature-report HID family, two LEDs).
//!
//! The only family whose writes go down the feature-report path, and
//! the only one whose hardware blink is a stored pattern: blink writes
//! two pattern lines, persists them, and starts the loop.

use statuslight_hid_thingm_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

/// Fade applied to plain colour changes, in milliseconds.
const SOLID_FADE_MS: u16 = 10;

pub struct ThingMDriver {
    identity: DriverIdentity,
}

impl ThingMDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        let name = proto::product_name(product_id).unwrap_or("Blink(1)");
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: name.to_string(),
                led_count: 2,
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Feature,
            },
        }
    }

    fn led(led: LedIndex) -> proto::Led {
        match led.0 {
            1 => proto::Led::Top,
            2 => proto::Led::Bottom,
            _ => proto::Led::All,
        }
    }

    /// Dark dwell of the blink pattern, per speed.
    fn decay_ms(speed: Speed) -> u16 {
        match speed {
            Speed::Slow => 50,
            Speed::Medium => 33,
            Speed::Fast => 25,
        }
    }
}

impl DeviceDriver for ThingMDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, led: LedIndex) -> Vec<Frame> {
        vec![proto::fade_to_color(color.r, color.g, color.b, SOLID_FADE_MS, Self::led(led)).to_vec()]
    }

    fn encode_off(&self, led: LedIndex) -> Vec<Frame> {
        self.encode_solid(Rgb::BLACK, led)
    }

    fn encode_keepalive(&self) -> Option<Frame> {
        None
    }

    fn encode_blink_native(&self, on: Rgb, off: Rgb, speed: Speed) -> Option<Vec<Frame>> {
        if !off.is_dark() {
            return None;
        }
        Some(vec![
            proto::write_pattern_line(on.r, on.g, on.b, SOLID_FADE_MS, 0).to_vec(),
            proto::write_pattern_line(0, 0, 0, Self::decay_ms(speed), 1).to_vec(),
            proto::save_patterns().to_vec(),
            proto::play_loop(1, 0, 1, 0).to_vec(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_uses_feature_reports() {
        let driver = ThingMDriver::new(0x27B8, 0x01ED);
        assert_eq!(driver.identity().report_mode, ReportMode::Feature);
        assert_eq!(driver.identity().led_count, 2);
    }

    #[test]
    fn solid_is_a_fade_command() {
        let driver = ThingMDriver::new(0x27B8, 0x01ED);
        let frames = driver.encode_solid(Rgb::new(1, 2, 3), LedIndex::ALL);
        assert_eq!(frames[0], vec![0x01, b'c', 1, 2, 3, 0, 10, 0]);
    }

    #[test]
    fn top_and_bottom_leds_are_addressable() {
        let driver = ThingMDriver::new(0x27B8, 0x01ED);
        assert_eq!(driver.encode_solid(Rgb::new(9, 9, 9), LedIndex(1))[0][7], 1);
        assert_eq!(driver.encode_solid(Rgb::new(9, 9, 9), LedIndex(2))[0][7], 2);
    }

    #[test]
    fn native_blink_is_a_four_command_pattern() {
        let driver = ThingMDriver::new(0x27B8, 0x01ED);
        let frames = driver
            .encode_blink_native(Rgb::new(255, 0, 0), Rgb::BLACK, Speed::Slow)
            .expect("supported");
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0][1], b'P');
        assert_eq!(frames[1][1], b'P');
        assert_eq!(frames[1][6], 50); // dark dwell, slow
        assert_eq!(frames[2][1], b'W');
        assert_eq!(frames[3][1], b'p');
    }
}
