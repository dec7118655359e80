//! MuteSync button driver (framed-binary serial family).

use statuslight_serial_mutesync_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct MuteSyncDriver {
    identity: DriverIdentity,
}

impl MuteSyncDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: "MuteSync Button".to_string(),
                // Four corner LEDs, but the protocol only writes them
                // as one group; expose the device as a single light.
                led_count: 1,
                transport_kind: TransportKind::Serial,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for MuteSyncDriver {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_frame_shape() {
        let driver = MuteSyncDriver::new(0x10C4, 0xEA60);
        let frames = driver.encode_solid(Rgb::new(9, 8, 7), LedIndex::ALL);
        assert_eq!(frames[0].len(), proto::FRAME_LEN);
        assert_eq!(frames[0][0], proto::CMD_SET_COLOR);
        assert_eq!(&frames[0][1..4], &[9, 8, 7]);
    }
}
