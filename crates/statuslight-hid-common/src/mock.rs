//! Mock HID bus and transport for engine and service tests.
//!
//! The mock records every write so tests can assert exact frame bytes
//! and ordering, and supports scripted failures to exercise the
//! close-reopen-retry recovery path without hardware.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::device_info::HidDeviceInfo;
use crate::transport::{HidBus, HidTransport};
use statuslight_errors::{TransportError, TransportResult};

/// In-memory HID transport.
pub struct MockHidTransport {
    info: HidDeviceInfo,
    writes: Mutex<Vec<Vec<u8>>>,
    reads: Mutex<VecDeque<Vec<u8>>>,
    write_faults: Mutex<VecDeque<TransportError>>,
    connected: AtomicBool,
    open: AtomicBool,
    reopen_count: Mutex<u32>,
    feature_writes: Mutex<u32>,
}

impl MockHidTransport {
    pub fn new(info: HidDeviceInfo) -> Arc<Self> {
        Arc::new(Self {
            info,
            writes: Mutex::new(Vec::new()),
            reads: Mutex::new(VecDeque::new()),
            write_faults: Mutex::new(VecDeque::new()),
            connected: AtomicBool::new(true),
            open: AtomicBool::new(true),
            reopen_count: Mutex::new(0),
            feature_writes: Mutex::new(0),
        })
    }

    /// Every report written so far, oldest first.
    pub fn write_history(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of reports written so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Bytes of the most recent write, if any.
    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Queue an input report for `read_report`.
    pub fn queue_read(&self, data: Vec<u8>) {
        self.reads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(data);
    }

    /// Fail the next write with `err`, once per queued error.
    pub fn fail_next_write(&self, err: TransportError) {
        self.write_faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(err);
    }

    /// Simulate the cable being yanked: every subsequent operation
    /// reports `Disconnected` until `reconnect` is called.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// How many times `reopen` succeeded.
    pub fn reopen_count(&self) -> u32 {
        *self.reopen_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// How many of the recorded writes went down the feature-report
    /// path.
    pub fn feature_write_count(&self) -> u32 {
        *self.feature_writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HidTransport for MockHidTransport {
    async fn write_report(&self, data: &[u8]) -> TransportResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected(self.info.path.clone()));
        }
        if let Some(err) = self
            .write_faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Err(err);
        }
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(data.to_vec());
        Ok(())
    }

    async fn write_feature_report(&self, data: &[u8]) -> TransportResult<()> {
        self.write_report(data).await?;
        *self.feature_writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    async fn read_report(&self, _max_len: usize, timeout: Duration) -> TransportResult<Vec<u8>> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected(self.info.path.clone()));
        }
        self.reads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| TransportError::timeout(self.info.path.clone(), timeout.as_millis() as u64))
    }

    async fn reopen(&self) -> TransportResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected(self.info.path.clone()));
        }
        self.open.store(true, Ordering::SeqCst);
        *self.reopen_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}

/// In-memory HID bus holding a mutable set of mock devices.
#[derive(Default)]
pub struct MockHidBus {
    devices: Mutex<Vec<(HidDeviceInfo, Arc<MockHidTransport>)>>,
}

impl MockHidBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a device into the bus and return its transport so the test
    /// can inspect writes later.
    pub fn plug(&self, info: HidDeviceInfo) -> Arc<MockHidTransport> {
        let transport = MockHidTransport::new(info.clone());
        self.devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((info, Arc::clone(&transport)));
        transport
    }

    /// Remove the device at `path` from enumeration.
    pub fn unplug(&self, path: &str) {
        let mut devices = self.devices.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = devices.iter().position(|(info, _)| info.path == path) {
            let (_, transport) = devices.remove(pos);
            transport.disconnect();
        }
    }
}

#[async_trait]
impl HidBus for MockHidBus {
    async fn enumerate(&self) -> TransportResult<Vec<HidDeviceInfo>> {
        Ok(self
            .devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(info, _)| info.clone())
            .collect())
    }

    async fn open(&self, info: &HidDeviceInfo) -> TransportResult<Arc<dyn HidTransport>> {
        let devices = self.devices.lock().unwrap_or_else(|e| e.into_inner());
        devices
            .iter()
            .find(|(i, _)| i.path == info.path)
            .map(|(_, t)| Arc::clone(t) as Arc<dyn HidTransport>)
            .ok_or_else(|| TransportError::NotFound(info.path.clone()))
    }
}
