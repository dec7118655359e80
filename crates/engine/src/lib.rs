//! statuslight engine: device plane and effect engine.
//!
//! This crate owns everything between the wire and the user-facing
//! controller: the per-family drivers that translate semantic commands
//! into exact report bytes, the registry that discovers and exclusively
//! owns devices, and the cooperative effect engine that multiplexes
//! time-varying colour sequences and keep-alives over many lights.
//!
//! Concurrency model: one per-light actor task owns each light's
//! transport (writes are additionally serialized by a per-light mutex),
//! the registry publishes immutable snapshots, and every suspension
//! point — frame dwell, transport write, command receive — doubles as a
//! cancellation point.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod driver;
pub mod drivers;
pub mod effect;
pub mod events;
pub mod light;
pub mod registry;
pub mod runner;
pub mod speed;

pub use color::{LedIndex, Rgb};
pub use driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
pub use drivers::{
    lookup_hid_driver, lookup_serial_driver, DriverDescriptor, DriverFamily, SUPPORTED_DEVICES,
};
pub use effect::{Effect, EffectFrame, Priority};
pub use events::{LightDescriptor, LightEvent};
pub use light::{CommandedState, Light, LightId, LightTransport};
pub use registry::{EngineConfig, EventSubscription, Registry, Snapshot};
pub use runner::{ApplyOutcome, CompletionHandle, LightRunner};
pub use speed::Speed;

pub use statuslight_errors::{LightError, LightResult, TransportError, TransportResult};
