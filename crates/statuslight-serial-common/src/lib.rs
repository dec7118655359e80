//! Common serial plumbing for statuslight device families.
//!
//! The serial twin of `statuslight-hid-common`: enumeration surfaces
//! USB vendor/product identity for USB-serial bridges, open produces a
//! write-oriented transport, and a mock mirrors the HID mock for tests.
//! Serial presence lights are fire-and-forget writers; the read side of
//! the port is not modelled.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod mock;
pub mod serialport_bus;
pub mod transport;

pub use device_info::SerialDeviceInfo;
pub use mock::{MockSerialBus, MockSerialTransport};
pub use serialport_bus::SerialportBus;
pub use transport::{SerialBus, SerialTransport};

pub use statuslight_errors::{TransportError, TransportResult};
