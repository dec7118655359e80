//! EPOS Busylight driver (10-byte HID family).

use statuslight_hid_epos_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct EposDriver {
    identity: DriverIdentity,
}

impl EposDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: "EPOS Busylight".to_string(),
                led_count: 1,
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for EposDriver {
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

    fn encode_blink_native(&self, _on: Rgb, _off: Rgb, _speed: Speed) -> Option<Vec<Frame>> {
        None
    }
}
