//! Plug/unplug events published by the registry.

use crate::light::LightId;

/// Identity record delivered with plug events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightDescriptor {
    pub id: LightId,
    pub logical_name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub path: String,
}

/// A change in the set of live lights.
#[derive(Debug, Clone)]
pub enum LightEvent {
    Plugged(LightDescriptor),
    Unplugged(LightDescriptor),
}

impl LightEvent {
    pub fn descriptor(&self) -> &LightDescriptor {
        match self {
            LightEvent::Plugged(desc) | LightEvent::Unplugged(desc) => desc,
        }
    }
}
