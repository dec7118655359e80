//! Kuando Busylight driver (64-byte programmable HID family).
//!
//! The only stateful family: firmware reverts to dark unless the host
//! refreshes it, so the identity declares a 15-second keep-alive
//! interval and `encode_keepalive` yields the watchdog-extension
//! program.

use std::time::Duration;

use statuslight_hid_kuando_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

pub struct KuandoDriver {
    identity: DriverIdentity,
}

impl KuandoDriver {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        let name = proto::product_name(vendor_id, product_id).unwrap_or("Busylight");
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: name.to_string(),
                led_count: 1,
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateful {
                    interval: Duration::from_secs(proto::KEEPALIVE_MAX_SECS as u64),
                },
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }
}

impl DeviceDriver for KuandoDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, _led: LedIndex) -> Vec<Frame> {
        vec![proto::program_solid(color.r, color.g, color.b).to_vec()]
    }

    fn encode_off(&self, _led: LedIndex) -> Vec<Frame> {
        vec![proto::program_off().to_vec()]
    }

    fn encode_keepalive(&self) -> Option<Frame> {
        Some(proto::program_keepalive(proto::KEEPALIVE_MAX_SECS).to_vec())
    }

    fn encode_blink_native(&self, on: Rgb, off: Rgb, speed: Speed) -> Option<Vec<Frame>> {
        if !off.is_dark() {
            return None;
        }
        let tenths = speed.tenths();
        Some(vec![
            proto::program_blink(on.r, on.g, on.b, tenths, tenths).to_vec(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stateful_with_15s_interval() {
        let driver = KuandoDriver::new(0x27BB, 0x3BCA);
        match driver.identity().keepalive {
            KeepAlive::Stateful { interval } => assert_eq!(interval, Duration::from_secs(15)),
            KeepAlive::Stateless => panic!("kuando must be stateful"),
        }
    }

    #[test]
    fn solid_program_carries_clamped_pwm() {
        let driver = KuandoDriver::new(0x27BB, 0x3BCA);
        let frames = driver.encode_solid(Rgb::new(10, 20, 30), LedIndex::ALL);
        assert_eq!(frames.len(), 1);
        let program = &frames[0];
        assert_eq!(program.len(), proto::REPORT_LEN);
        assert_eq!(&program[2..5], &[10, 20, 30]);
    }

    #[test]
    fn keepalive_is_the_watchdog_program() {
        let driver = KuandoDriver::new(0x27BB, 0x3BCD);
        let frame = driver.encode_keepalive().expect("stateful");
        assert_eq!(frame[0], 0x8F);
    }

    #[test]
    fn native_blink_uses_duty_cycles() {
        let driver = KuandoDriver::new(0x27BB, 0x3BCA);
        let frames = driver
            .encode_blink_native(Rgb::new(0, 0, 255), Rgb::BLACK, Speed::Medium)
            .expect("supported");
        assert_eq!(frames[0][5], 2); // on, tenths
        assert_eq!(frames[0][6], 2); // off, tenths
    }
}
