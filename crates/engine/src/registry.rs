//! Device discovery, exclusive ownership, and snapshot publication.
//!
//! The registry enumerates both buses, matches the static driver
//! table, opens every claimed device, and owns the resulting lights
//! for their whole lifetime. Readers get immutable snapshots that are
//! replaced atomically; a snapshot never observes a half-applied diff.
//! Plug/unplug events are produced by polling, which only runs while
//! somebody subscribes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::drivers::{lookup_hid_driver, lookup_serial_driver, match_hid};
use crate::effect::Effect;
use crate::events::LightEvent;
use crate::light::{Light, LightId, LightTransport};
use crate::runner::{ApplyOutcome, LightRunner};
use statuslight_errors::ErrorSeverity;
use statuslight_hid_common::HidBus;
use statuslight_serial_common::SerialBus;

/// Engine-level tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Re-enumeration period while events are being watched.
    pub poll_interval: Duration,
    /// Bound on any single transport write.
    pub write_timeout: Duration,
    /// Frame dwell used when neither the effect nor its kind sets one.
    pub default_dwell: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            write_timeout: Duration::from_millis(100),
            default_dwell: Duration::from_millis(500),
        }
    }
}

/// Immutable, atomically published view of the live lights.
///
/// Ordering is deterministic: lights sort by (name, path), so indices
/// are stable within a snapshot and across processes seeing the same
/// hardware.
pub struct Snapshot {
    lights: Vec<Arc<Light>>,
}

impl Snapshot {
    fn empty() -> Arc<Self> {
        Arc::new(Self { lights: Vec::new() })
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Light>> {
        self.lights.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Light>> {
        self.lights.get(index)
    }

    /// The first light, by snapshot order.
    pub fn first(&self) -> Option<Arc<Light>> {
        self.lights.first().cloned()
    }

    /// Lights at the given 0-based indices. Out-of-range indices are
    /// warned and skipped.
    pub fn by_index(&self, indices: &[usize]) -> Vec<Arc<Light>> {
        let mut selected = Vec::new();
        for &index in indices {
            match self.lights.get(index) {
                Some(light) => selected.push(Arc::clone(light)),
                None => warn!(index, "light index not found"),
            }
        }
        selected
    }

    /// Lights whose logical name matches exactly. `count` selects the
    /// Nth duplicate, 1-based.
    pub fn by_name(&self, name: &str, count: Option<usize>) -> Vec<Arc<Light>> {
        let matching: Vec<Arc<Light>> = self
            .lights
            .iter()
            .filter(|light| light.name() == name)
            .cloned()
            .collect();
        match count {
            None => matching,
            Some(n) => match n.checked_sub(1).and_then(|i| matching.get(i)) {
                Some(light) => vec![Arc::clone(light)],
                None => {
                    debug!(name, count = n, "no such duplicate");
                    Vec::new()
                }
            },
        }
    }

    /// Lights whose logical name matches the pattern (search, not full
    /// match).
    pub fn by_pattern(&self, pattern: &Regex) -> Vec<Arc<Light>> {
        self.lights
            .iter()
            .filter(|light| pattern.is_match(light.name()))
            .cloned()
            .collect()
    }
}

struct ManagedLight {
    light: Arc<Light>,
    runner: Arc<LightRunner>,
}

struct RegistryInner {
    hid_bus: Arc<dyn HidBus>,
    serial_bus: Arc<dyn SerialBus>,
    config: EngineConfig,
    lights: parking_lot::Mutex<Vec<ManagedLight>>,
    snapshot: parking_lot::RwLock<Arc<Snapshot>>,
    events: broadcast::Sender<LightEvent>,
    failures_tx: mpsc::UnboundedSender<LightId>,
    next_id: AtomicU64,
    watchers: AtomicUsize,
    poller: parking_lot::Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

/// The one owner of every open light.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    pub fn new(
        hid_bus: Arc<dyn HidBus>,
        serial_bus: Arc<dyn SerialBus>,
        config: EngineConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();
        let registry = Self {
            inner: Arc::new(RegistryInner {
                hid_bus,
                serial_bus,
                config,
                lights: parking_lot::Mutex::new(Vec::new()),
                snapshot: parking_lot::RwLock::new(Snapshot::empty()),
                events,
                failures_tx,
                next_id: AtomicU64::new(1),
                watchers: AtomicUsize::new(0),
                poller: parking_lot::Mutex::new(None),
                shut_down: AtomicBool::new(false),
            }),
        };
        registry.spawn_failure_consumer(failures_rx);
        registry
    }

    /// The current snapshot. Cheap; safe from any context.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.snapshot.read())
    }

    /// Subscribe to plug/unplug events. The poller runs while at
    /// least one subscription is alive.
    pub fn subscribe(&self) -> EventSubscription {
        self.inner.watchers.fetch_add(1, Ordering::SeqCst);
        self.ensure_poller();
        EventSubscription {
            rx: self.inner.events.subscribe(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Submit an effect to one light. `None` when the light is gone.
    pub async fn apply(&self, id: LightId, effect: Effect) -> Option<ApplyOutcome> {
        let runner = self.runner_for(id)?;
        Some(runner.apply(effect).await)
    }

    /// Stop everything on one light and drive it dark. `false` when
    /// the light is gone.
    pub async fn stop(&self, id: LightId) -> bool {
        match self.runner_for(id) {
            Some(runner) => {
                runner.stop().await;
                true
            }
            None => false,
        }
    }

    fn runner_for(&self, id: LightId) -> Option<Arc<LightRunner>> {
        self.inner
            .lights
            .lock()
            .iter()
            .find(|entry| entry.light.id() == id)
            .map(|entry| Arc::clone(&entry.runner))
    }

    /// Enumerate both buses, adopt new devices, drop vanished ones,
    /// and publish a fresh snapshot.
    pub async fn refresh(&self) {
        if self.inner.shut_down.load(Ordering::SeqCst) {
            return;
        }

        let hid_infos = match self.inner.hid_bus.enumerate().await {
            Ok(infos) => infos,
            Err(error) => {
                warn!(%error, "hid enumeration failed");
                Vec::new()
            }
        };
        let serial_infos = match self.inner.serial_bus.enumerate().await {
            Ok(infos) => infos,
            Err(error) => {
                warn!(%error, "serial enumeration failed");
                Vec::new()
            }
        };

        let existing: HashSet<String> = self
            .inner
            .lights
            .lock()
            .iter()
            .map(|entry| entry.light.path().to_string())
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut plugged = Vec::new();

        for info in hid_infos {
            if match_hid(&info).is_none() {
                continue;
            }
            seen.insert(info.path.clone());
            if existing.contains(&info.path) {
                continue;
            }
            let Some(driver) = lookup_hid_driver(&info) else {
                continue;
            };
            match self.inner.hid_bus.open(&info).await {
                Ok(transport) => {
                    plugged.push(self.adopt(driver, LightTransport::Hid(transport)));
                }
                Err(error) => log_open_failure(&info.path, &error),
            }
        }

        for info in serial_infos {
            let Some((driver, baud)) = lookup_serial_driver(&info) else {
                continue;
            };
            seen.insert(info.path.clone());
            if existing.contains(&info.path) {
                continue;
            }
            match self.inner.serial_bus.open(&info, baud).await {
                Ok(transport) => {
                    plugged.push(self.adopt(driver, LightTransport::Serial(transport)));
                }
                Err(error) => log_open_failure(&info.path, &error),
            }
        }

        // Devices that disappeared since the last cycle.
        let removed: Vec<ManagedLight> = {
            let mut lights = self.inner.lights.lock();
            let mut kept = Vec::with_capacity(lights.len());
            let mut gone = Vec::new();
            for entry in lights.drain(..) {
                if seen.contains(entry.light.path()) {
                    kept.push(entry);
                } else {
                    gone.push(entry);
                }
            }
            *lights = kept;
            gone
        };

        let mut unplugged = Vec::new();
        for entry in removed {
            info!(light = %entry.light.id(), name = entry.light.name(), "light unplugged");
            // Device is gone: cancel tasks without a dark write.
            entry.runner.shutdown(false).await;
            entry.light.close().await;
            unplugged.push(entry.light.descriptor());
        }

        self.publish_snapshot();

        for descriptor in plugged {
            info!(light = %descriptor.id, name = %descriptor.logical_name, "light plugged");
            let _ = self.inner.events.send(LightEvent::Plugged(descriptor));
        }
        for descriptor in unplugged {
            let _ = self.inner.events.send(LightEvent::Unplugged(descriptor));
        }
    }

    fn adopt(
        &self,
        driver: Arc<dyn crate::driver::DeviceDriver>,
        transport: LightTransport,
    ) -> crate::events::LightDescriptor {
        let id = LightId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let light = Arc::new(Light::new(
            id,
            driver,
            transport,
            self.inner.config.write_timeout,
        ));
        let runner = LightRunner::spawn(
            Arc::clone(&light),
            self.inner.config.default_dwell,
            self.inner.failures_tx.clone(),
        );
        let descriptor = light.descriptor();
        self.inner.lights.lock().push(ManagedLight { light, runner });
        descriptor
    }

    fn publish_snapshot(&self) {
        let mut lights: Vec<Arc<Light>> = self
            .inner
            .lights
            .lock()
            .iter()
            .map(|entry| Arc::clone(&entry.light))
            .collect();
        lights.sort_by(|a, b| {
            (a.name().to_ascii_lowercase(), a.path())
                .cmp(&(b.name().to_ascii_lowercase(), b.path()))
        });
        *self.inner.snapshot.write() = Arc::new(Snapshot { lights });
    }

    fn spawn_failure_consumer(&self, mut failures_rx: mpsc::UnboundedReceiver<LightId>) {
        let registry = self.clone();
        tokio::spawn(async move {
            while let Some(id) = failures_rx.recv().await {
                registry.remove_failed(id).await;
            }
        });
    }

    /// Drop a light whose writes exhausted recovery. Emits an
    /// unplugged event; no dark write is attempted.
    async fn remove_failed(&self, id: LightId) {
        let entry = {
            let mut lights = self.inner.lights.lock();
            lights
                .iter()
                .position(|entry| entry.light.id() == id)
                .map(|pos| lights.remove(pos))
        };
        let Some(entry) = entry else { return };
        warn!(light = %id, name = entry.light.name(), "dropping failed light");
        entry.runner.shutdown(false).await;
        entry.light.close().await;
        self.publish_snapshot();
        let _ = self
            .inner
            .events
            .send(LightEvent::Unplugged(entry.light.descriptor()));
    }

    fn ensure_poller(&self) {
        let mut poller = self.inner.poller.lock();
        if poller.is_some() || self.inner.shut_down.load(Ordering::SeqCst) {
            return;
        }
        let registry = self.clone();
        let interval = self.inner.config.poll_interval;
        *poller = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if registry.inner.watchers.load(Ordering::SeqCst) == 0
                    || registry.inner.shut_down.load(Ordering::SeqCst)
                {
                    return;
                }
                registry.refresh().await;
            }
        }));
    }

    fn stop_poller(&self) {
        if let Some(poller) = self.inner.poller.lock().take() {
            poller.abort();
        }
    }

    /// Stop polling, run every light's finaliser, close every handle.
    /// Idempotent; returns only after everything has quiesced.
    pub async fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop_poller();

        let entries: Vec<ManagedLight> = {
            let mut lights = self.inner.lights.lock();
            lights.drain(..).collect()
        };
        for entry in entries {
            entry.runner.shutdown(true).await;
            entry.light.close().await;
        }
        *self.inner.snapshot.write() = Snapshot::empty();
        info!("registry shut down");
    }
}

fn log_open_failure(path: &str, error: &statuslight_errors::TransportError) {
    match error.severity() {
        ErrorSeverity::Info => debug!(path, %error, "skipping device"),
        _ => warn!(path, %error, "failed to open device, skipping this cycle"),
    }
}

/// A live event subscription; keeps the poller running while held.
pub struct EventSubscription {
    rx: broadcast::Receiver<LightEvent>,
    inner: Arc<RegistryInner>,
}

impl EventSubscription {
    /// Next plug/unplug event. `None` once the registry is gone.
    pub async fn recv(&mut self) -> Option<LightEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        // Last subscriber out stops the poller; it restarts on the
        // next subscribe.
        if self.inner.watchers.fetch_sub(1, Ordering::SeqCst) == 1 {
            if let Some(poller) = self.inner.poller.lock().take() {
                poller.abort();
            }
        }
    }
}
