//! Mock serial bus and transport for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::device_info::SerialDeviceInfo;
use crate::transport::{SerialBus, SerialTransport};
use statuslight_errors::{TransportError, TransportResult};

/// In-memory serial transport recording every frame.
pub struct MockSerialTransport {
    info: SerialDeviceInfo,
    writes: Mutex<Vec<Vec<u8>>>,
    write_faults: Mutex<VecDeque<TransportError>>,
    connected: AtomicBool,
}

impl MockSerialTransport {
    pub fn new(info: SerialDeviceInfo) -> Arc<Self> {
        Arc::new(Self {
            info,
            writes: Mutex::new(Vec::new()),
            write_faults: Mutex::new(VecDeque::new()),
            connected: AtomicBool::new(true),
        })
    }

    pub fn write_history(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn fail_next_write(&self, err: TransportError) {
        self.write_faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(err);
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl SerialTransport for MockSerialTransport {
    async fn write_frame(&self, data: &[u8]) -> TransportResult<()> {
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

    async fn reopen(&self) -> TransportResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected(self.info.path.clone()));
        }
        Ok(())
    }

    async fn close(&self) {}

    fn info(&self) -> &SerialDeviceInfo {
        &self.info
    }
}

/// In-memory serial bus.
#[derive(Default)]
pub struct MockSerialBus {
    devices: Mutex<Vec<(SerialDeviceInfo, Arc<MockSerialTransport>)>>,
}

impl MockSerialBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plug(&self, info: SerialDeviceInfo) -> Arc<MockSerialTransport> {
        let transport = MockSerialTransport::new(info.clone());
        self.devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((info, Arc::clone(&transport)));
        transport
    }

    pub fn unplug(&self, path: &str) {
        let mut devices = self.devices.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = devices.iter().position(|(info, _)| info.path == path) {
            let (_, transport) = devices.remove(pos);
            transport.disconnect();
        }
    }
}

#[async_trait]
impl SerialBus for MockSerialBus {
    async fn enumerate(&self) -> TransportResult<Vec<SerialDeviceInfo>> {
        Ok(self
            .devices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(info, _)| info.clone())
            .collect())
    }

    async fn open(
        &self,
        info: &SerialDeviceInfo,
        _baud: u32,
    ) -> TransportResult<Arc<dyn SerialTransport>> {
        let devices = self.devices.lock().unwrap_or_else(|e| e.into_inner());
        devices
            .iter()
            .find(|(i, _)| i.path == info.path)
            .map(|(_, t)| Arc::clone(t) as Arc<dyn SerialTransport>)
            .ok_or_else(|| TransportError::NotFound(info.path.clone()))
    }
}
