//! The process-wide controller facade.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use regex::RegexBuilder;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use statuslight_engine::{
    LightDescriptor, LightEvent, LightId, Registry, Snapshot,
};
use statuslight_errors::{LightError, LightResult};
use statuslight_hid_common::{HidBus, HidapiBus};
use statuslight_serial_common::{SerialBus, SerialportBus};

use crate::config::ControllerConfig;
use crate::selection::{SelectedLight, Selection};

/// One row of `list()`.
#[derive(Debug, Clone, Serialize)]
pub struct LightState {
    pub index: usize,
    pub logical_name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub is_acquired: bool,
    pub last_color: Option<(u8, u8, u8)>,
}

/// User-facing facade over the registry and effect engine.
///
/// One controller per process. Selections borrow the controller, so
/// the usual shape is a long-lived controller owned by the facade and
/// short-lived selections per operation.
pub struct Controller {
    registry: Registry,
    config: ControllerConfig,
    background: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Construct against the real HID and serial buses.
    pub fn new(config: ControllerConfig) -> anyhow::Result<Self> {
        let hid_bus = HidapiBus::new().context("initialising hidapi")?;
        Ok(Self::with_buses(
            config,
            Arc::new(hid_bus),
            Arc::new(SerialportBus::new()),
        ))
    }

    /// Construct against caller-provided buses (tests, simulators).
    pub fn with_buses(
        config: ControllerConfig,
        hid_bus: Arc<dyn HidBus>,
        serial_bus: Arc<dyn SerialBus>,
    ) -> Self {
        let registry = Registry::new(hid_bus, serial_bus, config.engine_config());
        info!(
            poll_interval_ms = config.poll_interval_ms,
            write_timeout_ms = config.write_timeout_ms,
            "controller ready"
        );
        Self {
            registry,
            config,
            background: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    async fn select<F>(&self, filter: F) -> Selection<'_>
    where
        F: FnOnce(&Snapshot) -> Vec<Arc<statuslight_engine::Light>>,
    {
        self.registry.refresh().await;
        let snapshot = self.registry.snapshot();
        let lights = filter(&snapshot)
            .into_iter()
            .map(|light| SelectedLight {
                id: light.id(),
                name: light.name().to_string(),
            })
            .collect();
        Selection::new(self, lights)
    }

    /// Every live light.
    pub async fn all(&self) -> Selection<'_> {
        self.select(|snapshot| snapshot.iter().cloned().collect()).await
    }

    /// The first light in snapshot order.
    pub async fn first(&self) -> Selection<'_> {
        self.select(|snapshot| snapshot.first().into_iter().collect())
            .await
    }

    /// Lights at the given 0-based indices; bad indices are skipped.
    pub async fn by_index(&self, indices: &[usize]) -> Selection<'_> {
        self.select(|snapshot| snapshot.by_index(indices)).await
    }

    /// Lights matching a logical name exactly; `count` picks the Nth
    /// duplicate (1-based).
    pub async fn by_name(&self, name: &str, count: Option<usize>) -> Selection<'_> {
        self.select(|snapshot| snapshot.by_name(name, count)).await
    }

    /// Lights whose name matches a case-insensitive regex.
    ///
    /// The only selection that can fail: a malformed pattern is an
    /// argument error, not an empty selection.
    pub async fn by_pattern(&self, pattern: &str) -> LightResult<Selection<'_>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|error| LightError::invalid(format!("bad pattern {pattern:?}: {error}")))?;
        Ok(self.select(|snapshot| snapshot.by_pattern(&regex)).await)
    }

    /// Introspection rows for every live light.
    pub async fn list(&self) -> Vec<LightState> {
        self.registry.refresh().await;
        let snapshot = self.registry.snapshot();
        snapshot
            .iter()
            .enumerate()
            .map(|(index, light)| {
                let identity = light.identity();
                let descriptor = light.descriptor();
                LightState {
                    index,
                    logical_name: identity.logical_name.clone(),
                    vendor_id: identity.vendor_id,
                    product_id: identity.product_id,
                    serial_number: descriptor.serial_number,
                    is_acquired: !light.is_failed(),
                    last_color: light.last_color().map(|c| (c.r, c.g, c.b)),
                }
            })
            .collect()
    }

    /// Invoke `callback` for every light that appears.
    ///
    /// Registering a callback keeps the registry poller alive.
    pub fn on_light_plugged<F>(&self, callback: F)
    where
        F: Fn(LightDescriptor) + Send + 'static,
    {
        self.watch_events(move |event| {
            if let LightEvent::Plugged(descriptor) = event {
                callback(descriptor);
            }
        });
    }

    /// Invoke `callback` for every light that vanishes.
    pub fn on_light_unplugged<F>(&self, callback: F)
    where
        F: Fn(LightDescriptor) + Send + 'static,
    {
        self.watch_events(move |event| {
            if let LightEvent::Unplugged(descriptor) = event {
                callback(descriptor);
            }
        });
    }

    fn watch_events<F>(&self, handler: F)
    where
        F: Fn(LightEvent) + Send + 'static,
    {
        let mut subscription = self.registry.subscribe();
        let handle = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                handler(event);
            }
        });
        self.background.lock().push(handle);
    }

    /// Schedule a follow-up stop for `ids` after `after`.
    pub(crate) fn schedule_stop(&self, ids: Vec<LightId>, after: Duration) {
        let registry = self.registry.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            debug!(lights = ids.len(), "timeout elapsed, stopping");
            for id in ids {
                registry.stop(id).await;
            }
        });
        self.background.lock().push(handle);
    }

    /// Deterministic teardown: cancels scheduled work and event
    /// listeners, then shuts the registry down (every task finaliser
    /// runs before this returns). Idempotent.
    pub async fn shutdown(&self) {
        for handle in self.background.lock().drain(..) {
            handle.abort();
        }
        self.registry.shutdown().await;
    }
}
