//! HID device identity as reported by enumeration.

/// Identity of one enumerated HID device.
///
/// `path` is the OS-specific locator (`/dev/hidraw*`, IOKit registry
/// path, …) and is the stable key for reopening the same physical unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HidDeviceInfo {
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// OS path used to open the device.
    pub path: String,
    /// USB serial number string, when the firmware reports one.
    pub serial_number: Option<String>,
    /// USB product string.
    pub product_string: Option<String>,
    /// USB manufacturer string.
    pub manufacturer_string: Option<String>,
    /// BCD device release number.
    pub release_number: u16,
}

impl HidDeviceInfo {
    /// Construct a minimal info record, mostly useful in tests.
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            path: path.into(),
            serial_number: None,
            product_string: None,
            manufacturer_string: None,
            release_number: 0,
        }
    }

    /// `(vendor_id, product_id)` pair used for driver-table lookups.
    pub fn device_id(&self) -> (u16, u16) {
        (self.vendor_id, self.product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_pairs_vid_pid() {
        let info = HidDeviceInfo::new(0x2C0D, 0x0001, "/dev/hidraw0");
        assert_eq!(info.device_id(), (0x2C0D, 0x0001));
    }
}
