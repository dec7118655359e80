//! CompuLab fit-statUSB driver (text-over-serial family).

use statuslight_serial_compulab_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct CompulabDriver {
    identity: DriverIdentity,
}

impl CompulabDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: "fit-statUSB".to_string(),
                led_count: 1,
                transport_kind: TransportKind::Serial,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for CompulabDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, _led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_solid(color.r, color.g, color.b)]
    }

    fn encode_off(&self, _led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_off()]
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

    #[test]
    fn solid_is_an_ascii_line() {
        let driver = CompulabDriver::new(0x2047, 0x03DF);
        let frames = driver.encode_solid(Rgb::new(255, 0, 128), LedIndex::ALL);
        assert_eq!(frames[0], b"B#ff0080\n".to_vec());
    }

    #[test]
    fn serial_stateless_identity() {
        let driver = CompulabDriver::new(0x2047, 0x03DF);
        assert_eq!(driver.identity().transport_kind, TransportKind::Serial);
        assert!(!driver.identity().keepalive.is_stateful());
    }
}
