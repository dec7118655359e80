//! Busy Tag driver (AT-command serial family).

use statuslight_serial_busytag_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct BusyTagDriver {
    identity: DriverIdentity,
}

impl BusyTagDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: "Busy Tag".to_string(),
                led_count: 1,
                transport_kind: TransportKind::Serial,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for BusyTagDriver {
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
    fn solid_is_the_at_command() {
        let driver = BusyTagDriver::new(0x303A, 0x81DF);
        let frames = driver.encode_solid(Rgb::new(0, 0, 255), LedIndex::ALL);
        assert_eq!(frames[0], b"AT+SC=127,0000ff".to_vec());
    }
}
