//! `serialport`-backed implementation of [`SerialBus`] / [`SerialTransport`].

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serialport::{SerialPort, SerialPortType};
use tracing::debug;

use crate::device_info::SerialDeviceInfo;
use crate::transport::{SerialBus, SerialTransport};
use statuslight_errors::{TransportError, TransportResult};

/// Default per-write timeout applied to the OS port.
const PORT_TIMEOUT: Duration = Duration::from_millis(250);

fn classify(err: &serialport::Error, path: &str) -> TransportError {
    use serialport::ErrorKind;
    match err.kind() {
        ErrorKind::NoDevice => TransportError::Disconnected(path.to_string()),
        ErrorKind::Io(kind) => {
            TransportError::from(std::io::Error::new(kind, err.to_string()))
        }
        _ => TransportError::Io(format!("{path}: {err}")),
    }
}

/// Serial bus over the `serialport` crate.
#[derive(Default)]
pub struct SerialportBus;

impl SerialportBus {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SerialBus for SerialportBus {
    async fn enumerate(&self) -> TransportResult<Vec<SerialDeviceInfo>> {
        tokio::task::spawn_blocking(|| {
            let ports = serialport::available_ports()
                .map_err(|e| TransportError::Io(e.to_string()))?;
            let devices = ports
                .into_iter()
                .filter_map(|port| match port.port_type {
                    SerialPortType::UsbPort(usb) => Some(SerialDeviceInfo {
                        vendor_id: usb.vid,
                        product_id: usb.pid,
                        path: port.port_name,
                        serial_number: usb.serial_number,
                        product_string: usb.product,
                        manufacturer_string: usb.manufacturer,
                    }),
                    _ => None,
                })
                .collect();
            Ok(devices)
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn open(
        &self,
        info: &SerialDeviceInfo,
        baud: u32,
    ) -> TransportResult<Arc<dyn SerialTransport>> {
        let info = info.clone();
        let port = {
            let path = info.path.clone();
            tokio::task::spawn_blocking(move || open_port(&path, baud))
                .await
                .map_err(|e| TransportError::Io(e.to_string()))??
        };
        debug!(path = %info.path, baud, "opened serial port");
        Ok(Arc::new(SerialportTransport {
            info,
            baud,
            port: Arc::new(Mutex::new(Some(port))),
        }))
    }
}

fn open_port(path: &str, baud: u32) -> TransportResult<Box<dyn SerialPort>> {
    serialport::new(path, baud)
        .timeout(PORT_TIMEOUT)
        .open()
        .map_err(|e| classify(&e, path))
}

/// One open serial port handle.
pub struct SerialportTransport {
    info: SerialDeviceInfo,
    baud: u32,
    port: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
}

#[async_trait]
impl SerialTransport for SerialportTransport {
    async fn write_frame(&self, data: &[u8]) -> TransportResult<()> {
        let port = Arc::clone(&self.port);
        let path = self.info.path.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut guard = port.lock().unwrap_or_else(|e| e.into_inner());
            let port = guard
                .as_mut()
                .ok_or_else(|| TransportError::Disconnected(path.clone()))?;
            port.write_all(&data).map_err(TransportError::from)?;
            port.flush().map_err(TransportError::from)?;
            Ok(())
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn reopen(&self) -> TransportResult<()> {
        let port = Arc::clone(&self.port);
        let path = self.info.path.clone();
        let baud = self.baud;

        tokio::task::spawn_blocking(move || {
            let mut guard = port.lock().unwrap_or_else(|e| e.into_inner());
            *guard = None;
            *guard = Some(open_port(&path, baud)?);
            Ok(())
        })
        .await
        .map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn close(&self) {
        let port = Arc::clone(&self.port);
        let _ = tokio::task::spawn_blocking(move || {
            let mut guard = port.lock().unwrap_or_else(|e| e.into_inner());
            *guard = None;
        })
        .await;
    }

    fn info(&self) -> &SerialDeviceInfo {
        &self.info
    }
}
