//! Embrava Blynclight driver (9-byte HID family).

use statuslight_hid_embrava_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct EmbravaDriver {
    identity: DriverIdentity,
}

impl EmbravaDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        let name = proto::product_name(vendor_id, product_id).unwrap_or("Blynclight");
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: name.to_string(),
                led_count: 1,
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }

    fn flash_speed(speed: Speed) -> proto::FlashSpeed {
        match speed {
            Speed::Slow => proto::FlashSpeed::Slow,
            Speed::Medium => proto::FlashSpeed::Medium,
            Speed::Fast => proto::FlashSpeed::Fast,
        }
    }
}

impl DeviceDriver for EmbravaDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, _led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_solid(color.r, color.g, color.b).to_vec()]
    }

    fn encode_off(&self, _led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_off().to_vec()]
    }

    fn encode_keepalive(&self) -> Option<Frame> {
        None
    }

    fn encode_blink_native(&self, on: Rgb, off: Rgb, speed: Speed) -> Option<Vec<Frame>> {
        // The firmware only flashes against dark.
        if !off.is_dark() {
            return None;
        }
        Some(vec![
            proto::encode_blink(on.r, on.g, on.b, Self::flash_speed(speed)).to_vec(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_red_is_the_wire_report() {
        let driver = EmbravaDriver::new(0x2C0D, 0x0001);
        let frames = driver.encode_solid(Rgb::new(255, 0, 0), LedIndex::ALL);
        assert_eq!(frames, vec![vec![0x00, 0xFF, 0, 0, 0, 0, 0, 0xFF, 0x22]]);
    }

    #[test]
    fn led_index_is_ignored_on_a_single_led_device() {
        let driver = EmbravaDriver::new(0x2C0D, 0x0001);
        let all = driver.encode_solid(Rgb::new(1, 2, 3), LedIndex::ALL);
        let one = driver.encode_solid(Rgb::new(1, 2, 3), LedIndex(1));
        assert_eq!(all, one);
    }

    #[test]
    fn native_blink_only_against_dark() {
        let driver = EmbravaDriver::new(0x2C0D, 0x0001);
        assert!(driver
            .encode_blink_native(Rgb::new(255, 0, 0), Rgb::BLACK, Speed::Slow)
            .is_some());
        assert!(driver
            .encode_blink_native(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255), Speed::Slow)
            .is_none());
    }

    #[test]
    fn identity_is_stateless_truecolor() {
        let driver = EmbravaDriver::new(0x047F, 0xD005);
        assert_eq!(driver.identity().logical_name, "Status Indicator");
        assert!(!driver.identity().keepalive.is_stateful());
        assert_eq!(driver.identity().led_count, 1);
    }
}
