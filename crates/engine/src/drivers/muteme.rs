//! MuteMe driver (2-byte HID family, 3-bit colour).
//!
//! The identity declares `ColorDepth::ThreeBit`, which tells the
//! engine to quantise colours before they reach the encoder here.

use statuslight_hid_muteme_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct MuteMeDriver {
    identity: DriverIdentity,
}

impl MuteMeDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        let name = proto::product_name(vendor_id, product_id).unwrap_or("MuteMe");
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: name.to_string(),
                led_count: 1,
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::ThreeBit,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for MuteMeDriver {
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
        if !off.is_dark() {
            return None;
        }
        let rate = match speed {
            Speed::Slow | Speed::Medium => proto::BlinkRate::Slow,
            Speed::Fast => proto::BlinkRate::Fast,
        };
        Some(vec![proto::encode_blink(on.r, on.g, on.b, rate).to_vec()])
    }
}
