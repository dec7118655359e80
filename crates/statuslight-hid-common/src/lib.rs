//! Common HID plumbing for statuslight device families.
//!
//! This crate owns everything that touches a HID handle: enumeration,
//! open, report writes/reads, and the platform report-id prefix rule.
//! Protocol crates never see any of this; they produce logical report
//! bytes and the adapter here makes them land on the wire unchanged.
//!
//! A transport is strictly single-threaded per handle. Serialization of
//! concurrent writers is the responsibility of the layer above (the
//! engine's per-light runner); calling `write_report` from two tasks at
//! once is a contract violation, not a supported mode.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hidapi_bus;
pub mod mock;
pub mod transport;

pub use device_info::HidDeviceInfo;
pub use hidapi_bus::HidapiBus;
pub use mock::{MockHidBus, MockHidTransport};
pub use transport::{HidBus, HidTransport};

pub use statuslight_errors::{TransportError, TransportResult};
