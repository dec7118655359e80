//! Per-family drivers and the static device registration table.
//!
//! Driver dispatch is declarative: `SUPPORTED_DEVICES` maps
//! `(vendor_id, product_id)` pairs to a family; the first matching row
//! wins, and row order is stable (and pinned by a test below). There
//! is no runtime driver discovery.

pub mod blinkstick;
pub mod busytag;
pub mod compulab;
pub mod embrava;
pub mod epos;
pub mod kuando;
pub mod luxafor;
pub mod muteme;
pub mod mutesync;
pub mod thingm;

use std::sync::Arc;

use tracing::warn;

use crate::driver::{DeviceDriver, TransportKind};
use statuslight_hid_common::HidDeviceInfo;
use statuslight_serial_common::SerialDeviceInfo;

pub use blinkstick::BlinkStickDriver;
pub use busytag::BusyTagDriver;
pub use compulab::CompulabDriver;
pub use embrava::EmbravaDriver;
pub use epos::EposDriver;
pub use kuando::KuandoDriver;
pub use luxafor::LuxaforDriver;
pub use muteme::MuteMeDriver;
pub use mutesync::MuteSyncDriver;
pub use thingm::ThingMDriver;

/// Supported device families, one per wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFamily {
    Embrava,
    Kuando,
    Luxafor,
    BlinkStick,
    MuteMe,
    ThingM,
    Epos,
    Compulab,
    MuteSync,
    BusyTag,
}

impl DriverFamily {
    /// Which bus this family enumerates on.
    pub fn transport_kind(self) -> TransportKind {
        match self {
            DriverFamily::Compulab | DriverFamily::MuteSync | DriverFamily::BusyTag => {
                TransportKind::Serial
            }
            _ => TransportKind::Hid,
        }
    }

    /// Baud rate used when opening a serial family's port.
    pub fn baud(self) -> u32 {
        match self {
            DriverFamily::Compulab => statuslight_serial_compulab_protocol::BAUD_RATE,
            DriverFamily::MuteSync => statuslight_serial_mutesync_protocol::BAUD_RATE,
            DriverFamily::BusyTag => statuslight_serial_busytag_protocol::BAUD_RATE,
            _ => 0,
        }
    }
}

/// One row of the registration table.
#[derive(Debug, Clone, Copy)]
pub struct DriverDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    pub family: DriverFamily,
}

const fn row(vendor_id: u16, product_id: u16, family: DriverFamily) -> DriverDescriptor {
    DriverDescriptor {
        vendor_id,
        product_id,
        family,
    }
}

/// Every supported device, in registration order.
///
/// Ties on `(vid, pid)` resolve to the earliest row.
pub static SUPPORTED_DEVICES: &[DriverDescriptor] = &[
    // Embrava Blynclight family and OEM rebadges.
    row(0x2C0D, 0x0001, DriverFamily::Embrava),
    row(0x2C0D, 0x000A, DriverFamily::Embrava),
    row(0x2C0D, 0x000C, DriverFamily::Embrava),
    row(0x2C0D, 0x0010, DriverFamily::Embrava),
    row(0x0E53, 0x2516, DriverFamily::Embrava),
    row(0x0E53, 0x2517, DriverFamily::Embrava),
    row(0x047F, 0xD005, DriverFamily::Embrava),
    // Kuando Busylight.
    row(0x04D8, 0xF848, DriverFamily::Kuando),
    row(0x27BB, 0x3BCA, DriverFamily::Kuando),
    row(0x27BB, 0x3BCD, DriverFamily::Kuando),
    row(0x27BB, 0x3BCF, DriverFamily::Kuando),
    // Luxafor Flag.
    row(0x04D8, 0xF372, DriverFamily::Luxafor),
    // BlinkStick (one PID for the whole line).
    row(0x20A0, 0x41E5, DriverFamily::BlinkStick),
    // MuteMe.
    row(0x20A0, 0x42DA, DriverFamily::MuteMe),
    row(0x20A0, 0x42DB, DriverFamily::MuteMe),
    row(0x16C0, 0x27DB, DriverFamily::MuteMe),
    // ThingM Blink(1).
    row(0x27B8, 0x01ED, DriverFamily::ThingM),
    // EPOS Busylight.
    row(0x1395, 0x0074, DriverFamily::Epos),
    // CompuLab fit-statUSB (serial).
    row(0x2047, 0x03DF, DriverFamily::Compulab),
    // MuteSync button (serial, shared bridge VID/PID).
    row(0x10C4, 0xEA60, DriverFamily::MuteSync),
    // Busy Tag (serial).
    row(0x303A, 0x81DF, DriverFamily::BusyTag),
];

/// Find the driver row claiming a HID device, if any.
pub fn match_hid(info: &HidDeviceInfo) -> Option<&'static DriverDescriptor> {
    SUPPORTED_DEVICES.iter().find(|desc| {
        desc.family.transport_kind() == TransportKind::Hid
            && (desc.vendor_id, desc.product_id) == info.device_id()
    })
}

/// Find the driver row claiming a serial device, if any.
///
/// Serial families with promiscuous bridge chips additionally check
/// the product string before claiming.
pub fn match_serial(info: &SerialDeviceInfo) -> Option<&'static DriverDescriptor> {
    SUPPORTED_DEVICES.iter().find(|desc| {
        if desc.family.transport_kind() != TransportKind::Serial
            || (desc.vendor_id, desc.product_id) != info.device_id()
        {
            return false;
        }
        match desc.family {
            DriverFamily::MuteSync => statuslight_serial_mutesync_protocol::is_mutesync_device(
                info.vendor_id,
                info.product_id,
                info.product_string.as_deref(),
            ),
            _ => true,
        }
    })
}

/// Build a driver for a matched HID device.
///
/// Returns `None` (with a warning) when the device cannot be
/// identified precisely enough to drive, e.g. a BlinkStick with an
/// unparseable variant code.
pub fn lookup_hid_driver(info: &HidDeviceInfo) -> Option<Arc<dyn DeviceDriver>> {
    let desc = match_hid(info)?;
    match desc.family {
        DriverFamily::Embrava => Some(Arc::new(EmbravaDriver::new(
            info.vendor_id,
            info.product_id,
        ))),
        DriverFamily::Kuando => Some(Arc::new(KuandoDriver::new(
            info.vendor_id,
            info.product_id,
        ))),
        DriverFamily::Luxafor => Some(Arc::new(LuxaforDriver::new(
            info.vendor_id,
            info.product_id,
            info.product_string.as_deref(),
        ))),
        DriverFamily::MuteMe => Some(Arc::new(MuteMeDriver::new(
            info.vendor_id,
            info.product_id,
        ))),
        DriverFamily::ThingM => Some(Arc::new(ThingMDriver::new(
            info.vendor_id,
            info.product_id,
        ))),
        DriverFamily::Epos => Some(Arc::new(EposDriver::new(
            info.vendor_id,
            info.product_id,
        ))),
        DriverFamily::BlinkStick => match BlinkStickDriver::identify(info) {
            Some(driver) => Some(Arc::new(driver)),
            None => {
                warn!(path = %info.path, serial = ?info.serial_number,
                      "unrecognised BlinkStick variant, skipping");
                None
            }
        },
        DriverFamily::Compulab | DriverFamily::MuteSync | DriverFamily::BusyTag => None,
    }
}

/// Build a driver for a matched serial device.
pub fn lookup_serial_driver(info: &SerialDeviceInfo) -> Option<(Arc<dyn DeviceDriver>, u32)> {
    let desc = match_serial(info)?;
    let driver: Arc<dyn DeviceDriver> = match desc.family {
        DriverFamily::Compulab => Arc::new(CompulabDriver::new(info.vendor_id, info.product_id)),
        DriverFamily::MuteSync => Arc::new(MuteSyncDriver::new(info.vendor_id, info.product_id)),
        DriverFamily::BusyTag => Arc::new(BusyTagDriver::new(info.vendor_id, info.product_id)),
        _ => return None,
    };
    Some((driver, desc.family.baud()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_is_stable() {
        // The first four rows are the Embrava 0x2C0D block; a reorder
        // would silently change tie-breaking for duplicate ids.
        assert_eq!(SUPPORTED_DEVICES[0].vendor_id, 0x2C0D);
        assert_eq!(SUPPORTED_DEVICES[0].product_id, 0x0001);
        assert!(matches!(SUPPORTED_DEVICES[0].family, DriverFamily::Embrava));

        let kuando_pos = SUPPORTED_DEVICES
            .iter()
            .position(|d| matches!(d.family, DriverFamily::Kuando))
            .expect("kuando registered");
        let luxafor_pos = SUPPORTED_DEVICES
            .iter()
            .position(|d| matches!(d.family, DriverFamily::Luxafor))
            .expect("luxafor registered");
        assert!(kuando_pos < luxafor_pos);
    }

    #[test]
    fn hid_lookup_matches_first_row() {
        let info = HidDeviceInfo::new(0x2C0D, 0x0001, "hid:0");
        let driver = lookup_hid_driver(&info).expect("driver");
        assert_eq!(driver.identity().logical_name, "Blynclight");
    }

    #[test]
    fn unknown_device_matches_nothing() {
        let info = HidDeviceInfo::new(0xDEAD, 0xBEEF, "hid:0");
        assert!(match_hid(&info).is_none());
        assert!(lookup_hid_driver(&info).is_none());
    }

    #[test]
    fn mutesync_requires_product_string() {
        let mut info = SerialDeviceInfo::new(0x10C4, 0xEA60, "tty:0");
        assert!(match_serial(&info).is_none());

        info.product_string = Some("MuteSync Button".into());
        let desc = match_serial(&info).expect("claimed");
        assert!(matches!(desc.family, DriverFamily::MuteSync));
    }

    #[test]
    fn serial_lookup_reports_baud() {
        let info = SerialDeviceInfo::new(0x2047, 0x03DF, "tty:1");
        let (driver, baud) = lookup_serial_driver(&info).expect("driver");
        assert_eq!(driver.identity().logical_name, "fit-statUSB");
        assert_eq!(baud, statuslight_serial_compulab_protocol::BAUD_RATE);
    }

    #[test]
    fn thingm_lookup_is_feature_mode() {
        let info = HidDeviceInfo::new(0x27B8, 0x01ED, "hid:blink1");
        let driver = lookup_hid_driver(&info).expect("driver");
        assert_eq!(
            driver.identity().report_mode,
            crate::driver::ReportMode::Feature
        );
    }

    #[test]
    fn busytag_lookup_needs_no_product_string() {
        let info = SerialDeviceInfo::new(0x303A, 0x81DF, "tty:2");
        let (driver, _) = lookup_serial_driver(&info).expect("driver");
        assert_eq!(driver.identity().logical_name, "Busy Tag");
    }

    #[test]
    fn luxafor_variant_comes_from_the_product_string() {
        let mut info = HidDeviceInfo::new(0x04D8, 0xF372, "hid:lux");
        info.product_string = Some("Luxafor Mute".into());
        let driver = lookup_hid_driver(&info).expect("driver");
        assert_eq!(driver.identity().logical_name, "Luxafor Mute");
        assert_eq!(driver.identity().led_count, 1);
    }
}
