//! statuslight service: the user-facing controller facade.
//!
//! Front-ends (CLI, HTTP) consume this crate and nothing below it.
//! It owns configuration (including the environment-variable
//! contract), logging initialisation, and the selection/operation
//! model over the engine's registry.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod controller;
pub mod observability;
pub mod selection;

pub use config::{AuthConfig, ControllerConfig, LogLevel};
pub use controller::{Controller, LightState};
pub use observability::init_tracing;
pub use selection::{BlinkOptions, OnOptions, Selection};

pub use statuslight_engine::{Effect, LedIndex, LightDescriptor, Priority, Rgb, Speed};
pub use statuslight_errors::{LightError, LightResult};
