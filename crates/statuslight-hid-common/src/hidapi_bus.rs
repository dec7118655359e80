//! `hidapi`-backed implementation of [`HidBus`] / [`HidTransport`].
//!
//! hidapi is blocking and not safe for concurrent access from multiple
//! threads, so every call funnels through `spawn_blocking` and a mutex
//! around the shared `HidApi` context. Writes to an individual handle
//! are already serialized above this layer.

use std::ffi::CString;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hidapi::{HidApi, HidDevice};
use tracing::{debug, warn};

use crate::device_info::HidDeviceInfo;
use crate::transport::{HidBus, HidTransport};
use statuslight_errors::{TransportError, TransportResult};

/// Map a hidapi error message onto the transport taxonomy.
///
/// hidapi reports failures as strings; this is a best-effort
/// classification that errs toward `Io` (transient) when unsure.
fn classify(msg: &str, path: &str) -> TransportError {
    let lower = msg.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("access") {
        TransportError::PermissionDenied(path.to_string())
    } else if lower.contains("busy") || lower.contains("exclusive") || lower.contains("in use") {
        TransportError::Busy(path.to_string())
    } else if lower.contains("not found") || lower.contains("no such") {
        TransportError::NotFound(path.to_string())
    } else if lower.contains("disconnect") || lower.contains("no device") {
        TransportError::Disconnected(path.to_string())
    } else {
        TransportError::Io(format!("{path}: {msg}"))
    }
}

/// Shared hidapi context.
pub struct HidapiBus {
    api: Arc<Mutex<HidApi>>,
    prefix_report_id: bool,
}

impl HidapiBus {
    /// Initialise the hidapi context.
    pub fn new() -> TransportResult<Self> {
        let api = HidApi::new().map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(Self {
            api: Arc::new(Mutex::new(api)),
            // Windows requires an explicit leading report-id byte even
            // for devices that use unnumbered reports.
            prefix_report_id: cfg!(windows),
        })
    }

    /// Override the platform report-id prefix rule.
    pub fn with_report_id_prefix(mut self, prefix: bool) -> Self {
        self.prefix_report_id = prefix;
        self
    }
}

#[async_trait]
impl HidBus for HidapiBus {
    async fn enumerate(&self) -> TransportResult<Vec<HidDeviceInfo>> {
        let api = Arc::clone(&self.api);
        tokio::task::spawn_blocking(move || {
            let mut api = api.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(error) = api.refresh_devices() {
                warn!(%error, "hid device refresh failed");
            }
            let devices = api
                .device_list()
                .map(|dev| HidDeviceInfo {
                    vendor_id: dev.vendor_id(),
                    product_id: dev.product_id(),
                    path: dev.path().to_string_lossy().into_owned(),
                    serial_number: dev.serial_number().map(str::to_owned),
                    product_string: dev.product_string().map(str::to_owned),
                    manufacturer_string: dev.manufacturer_string().map(str::to_owned),
                    release_number: dev.release_number(),
                })
                .collect();
            Ok(devices)
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn open(&self, info: &HidDeviceInfo) -> TransportResult<Arc<dyn HidTransport>> {
        let api = Arc::clone(&self.api);
        let info = info.clone();
        let prefix = self.prefix_report_id;
        let handle = {
            let path = info.path.clone();
            tokio::task::spawn_blocking(move || open_path(&api, &path))
                .await
                .map_err(|e| TransportError::Io(e.to_string()))??
        };
        debug!(path = %info.path, vid = info.vendor_id, pid = info.product_id, "opened hid device");
        Ok(Arc::new(HidapiTransport {
            info,
            api: Arc::clone(&self.api),
            handle: Arc::new(Mutex::new(Some(handle))),
            prefix_report_id: prefix,
        }))
    }
}

fn open_path(api: &Arc<Mutex<HidApi>>, path: &str) -> TransportResult<HidDevice> {
    let api = api.lock().unwrap_or_else(|e| e.into_inner());
    let cpath =
        CString::new(path).map_err(|_| TransportError::NotFound(path.to_string()))?;
    api.open_path(&cpath).map_err(|e| classify(&e.to_string(), path))
}

/// One open hidapi handle.
pub struct HidapiTransport {
    info: HidDeviceInfo,
    api: Arc<Mutex<HidApi>>,
    handle: Arc<Mutex<Option<HidDevice>>>,
    prefix_report_id: bool,
}

#[async_trait]
impl HidTransport for HidapiTransport {
    async fn write_report(&self, data: &[u8]) -> TransportResult<()> {
        let handle = Arc::clone(&self.handle);
        let path = self.info.path.clone();
        let mut buf = Vec::with_capacity(data.len() + 1);
        if self.prefix_report_id {
            buf.push(0x00);
        }
        buf.extend_from_slice(data);

        tokio::task::spawn_blocking(move || {
            let guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            let dev = guard
                .as_ref()
                .ok_or_else(|| TransportError::Disconnected(path.clone()))?;
            dev.write(&buf).map_err(|e| classify(&e.to_string(), &path))?;
            Ok(())
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn write_feature_report(&self, data: &[u8]) -> TransportResult<()> {
        let handle = Arc::clone(&self.handle);
        let path = self.info.path.clone();
        let buf = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            let dev = guard
                .as_ref()
                .ok_or_else(|| TransportError::Disconnected(path.clone()))?;
            dev.send_feature_report(&buf)
                .map_err(|e| classify(&e.to_string(), &path))?;
            Ok(())
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn read_report(&self, max_len: usize, timeout: Duration) -> TransportResult<Vec<u8>> {
        let handle = Arc::clone(&self.handle);
        let path = self.info.path.clone();
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;

        tokio::task::spawn_blocking(move || {
            let guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            let dev = guard
                .as_ref()
                .ok_or_else(|| TransportError::Disconnected(path.clone()))?;
            let mut buf = vec![0u8; max_len];
            let n = dev
                .read_timeout(&mut buf, timeout_ms)
                .map_err(|e| classify(&e.to_string(), &path))?;
            if n == 0 {
                return Err(TransportError::timeout(path.clone(), timeout_ms as u64));
            }
            buf.truncate(n);
            Ok(buf)
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn reopen(&self) -> TransportResult<()> {
        let api = Arc::clone(&self.api);
        let handle = Arc::clone(&self.handle);
        let path = self.info.path.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            // Drop the old handle first so the OS releases the claim.
            *guard = None;
            let fresh = open_path(&api, &path)?;
            *guard = Some(fresh);
            Ok(())
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn close(&self) {
        let handle = Arc::clone(&self.handle);
        let _ = tokio::task::spawn_blocking(move || {
            let mut guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            *guard = None;
        })
        .await;
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}
