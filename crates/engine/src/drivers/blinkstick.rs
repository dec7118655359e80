//! BlinkStick driver (variable-length report HID family).
//!
//! The LED count depends on the hardware variant, recovered from USB
//! descriptors at open time. The firmware has no blink; everything is
//! engine-synthesised.

use statuslight_hid_blinkstick_protocol as proto;
use statuslight_hid_common::HidDeviceInfo;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

/// Dataframe reports cap out at 64 slots; larger variants are driven
/// through the first 64 LEDs when addressed as a whole.
const MAX_FRAME_LEDS: usize = 64;

pub struct BlinkStickDriver {
    identity: DriverIdentity,
    variant: proto::BlinkStickVariant,
}

impl BlinkStickDriver {
    /// Identify the variant from USB descriptors; `None` when the
    /// device cannot be recognised.
    pub fn identify(info: &HidDeviceInfo) -> Option<Self> {
        let variant = proto::BlinkStickVariant::identify(
            info.serial_number.as_deref(),
            info.release_number,
        )?;
        Some(Self {
            identity: DriverIdentity {
                vendor_id: info.vendor_id,
                product_id: info.product_id,
                logical_name: variant.name().to_string(),
                led_count: variant.led_count(),
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
            variant,
        })
    }

    fn frame_for_all(&self, color: Rgb) -> Frame {
        let slots = (self.variant.led_count() as usize).min(MAX_FRAME_LEDS);
        let colors = vec![(color.r, color.g, color.b); slots];
        proto::encode_frame(0, &colors)
    }
}

impl DeviceDriver for BlinkStickDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, led: LedIndex) -> Vec<Frame> {
        if led.is_all() {
            if self.variant.led_count() == 1 {
                return vec![proto::encode_single(color.r, color.g, color.b).to_vec()];
            }
            return vec![self.frame_for_all(color)];
        }
        vec![proto::encode_indexed(0, led.0 - 1, color.r, color.g, color.b).to_vec()]
    }

    fn encode_off(&self, led: LedIndex) -> Vec<Frame> {
        self.encode_solid(Rgb::BLACK, led)
    }

    fn encode_keepalive(&self) -> Option<Frame> {
        None
    }

    fn encode_blink_native(&self, _on: Rgb, _off: Rgb, _speed: Speed) -> Option<Vec<Frame>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_info() -> HidDeviceInfo {
        let mut info = HidDeviceInfo::new(0x20A0, 0x41E5, "hid:bs");
        info.serial_number = Some("BS000001-3.0".into());
        info.release_number = 0x0200;
        info
    }

    #[test]
    fn square_is_eight_leds() {
        let driver = BlinkStickDriver::identify(&square_info()).expect("variant");
        assert_eq!(driver.identity().led_count, 8);
        assert_eq!(driver.identity().logical_name, "BlinkStick Square");
    }

    #[test]
    fn all_leds_is_one_dataframe() {
        let driver = BlinkStickDriver::identify(&square_info()).expect("variant");
        let frames = driver.encode_solid(Rgb::new(255, 0, 0), LedIndex::ALL);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 2 + 8 * 3);
        // Slot order is G, R, B.
        assert_eq!(&frames[0][2..5], &[0, 255, 0]);
    }

    #[test]
    fn indexed_led_is_zero_based_on_the_wire() {
        let driver = BlinkStickDriver::identify(&square_info()).expect("variant");
        let frames = driver.encode_solid(Rgb::new(1, 2, 3), LedIndex(1));
        assert_eq!(frames[0], vec![5, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn single_led_variant_uses_the_single_report() {
        let mut info = HidDeviceInfo::new(0x20A0, 0x41E5, "hid:bs1");
        info.serial_number = Some("BS000002-1.1".into());
        let driver = BlinkStickDriver::identify(&info).expect("variant");
        let frames = driver.encode_solid(Rgb::new(7, 8, 9), LedIndex::ALL);
        assert_eq!(frames[0], vec![1, 8, 7, 9]);
    }

    #[test]
    fn no_native_blink_ever() {
        let driver = BlinkStickDriver::identify(&square_info()).expect("variant");
        assert!(driver
            .encode_blink_native(Rgb::new(255, 0, 0), Rgb::BLACK, Speed::Slow)
            .is_none());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let info = HidDeviceInfo::new(0x20A0, 0x41E5, "hid:bs2");
        assert!(BlinkStickDriver::identify(&info).is_none());
    }
}
