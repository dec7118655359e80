//! Serial device identity as reported by port enumeration.

/// Identity of one enumerated USB-serial device.
///
/// Only USB-backed ports carry vendor/product identity; pure UART
/// ports are invisible to the driver table and never enumerated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialDeviceInfo {
    /// USB vendor ID of the bridge chip or device.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// OS port path (`/dev/ttyUSB0`, `COM3`, …).
    pub path: String,
    /// USB serial number string.
    pub serial_number: Option<String>,
    /// USB product string.
    pub product_string: Option<String>,
    /// USB manufacturer string.
    pub manufacturer_string: Option<String>,
}

impl SerialDeviceInfo {
    /// Construct a minimal info record, mostly useful in tests.
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            path: path.into(),
            serial_number: None,
            product_string: None,
            manufacturer_string: None,
        }
    }

    /// `(vendor_id, product_id)` pair used for driver-table lookups.
    pub fn device_id(&self) -> (u16, u16) {
        (self.vendor_id, self.product_id)
    }
}
