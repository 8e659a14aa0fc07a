//! Printer devices: open, stream ESC/POS bytes, close.

use std::path::PathBuf;
use std::time::Duration;

use kebab_pos_core::{PrinterTransport, TerminalSettings};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::PrinterError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where receipts go, as chosen by the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterDevice {
    /// No device attached; receipts are only logged.
    Simulated,
    /// Character device such as `/dev/usb/lp0`.
    Usb(PathBuf),
    /// Raw TCP printer.
    Network { host: String, port: u16 },
}

impl PrinterDevice {
    #[must_use]
    pub fn from_settings(settings: &TerminalSettings) -> Self {
        match settings.printer_transport {
            PrinterTransport::None => Self::Simulated,
            PrinterTransport::Usb => Self::Usb(PathBuf::from(&settings.usb_device)),
            PrinterTransport::Network => Self::Network {
                host: settings.network_host.clone(),
                port: settings.network_port,
            },
        }
    }

    /// Human-readable device name for logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Simulated => "simulated printer".to_string(),
            Self::Usb(path) => path.display().to_string(),
            Self::Network { host, port } => format!("{host}:{port}"),
        }
    }

    /// Open a handle to the device.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or connected to.
    pub async fn open(&self) -> Result<OpenDevice, PrinterError> {
        match self {
            Self::Simulated => Ok(OpenDevice::Simulated),
            Self::Usb(path) => {
                let file = tokio::fs::OpenOptions::new()
                    .write(true)
                    .open(path)
                    .await
                    .map_err(|source| PrinterError::Open {
                        device: self.describe(),
                        source,
                    })?;
                Ok(OpenDevice::Usb(file))
            }
            Self::Network { host, port } => {
                let stream = tokio::time::timeout(
                    CONNECT_TIMEOUT,
                    TcpStream::connect((host.as_str(), *port)),
                )
                .await
                .map_err(|_| PrinterError::Timeout {
                    device: self.describe(),
                })?
                .map_err(|source| PrinterError::Open {
                    device: self.describe(),
                    source,
                })?;
                Ok(OpenDevice::Network(stream))
            }
        }
    }
}

/// An open device handle.
#[derive(Debug)]
pub enum OpenDevice {
    Simulated,
    Usb(tokio::fs::File),
    Network(TcpStream),
}

impl OpenDevice {
    /// Stream `bytes` to the device.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the device.
    pub async fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Simulated => Ok(()),
            Self::Usb(file) => file.write_all(bytes).await,
            Self::Network(stream) => stream.write_all(bytes).await,
        }
    }

    /// Flush and release the device.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the device.
    pub async fn close(self) -> std::io::Result<()> {
        match self {
            Self::Simulated => Ok(()),
            Self::Usb(mut file) => {
                file.flush().await?;
                file.sync_all().await
            }
            Self::Network(mut stream) => {
                stream.flush().await?;
                stream.shutdown().await
            }
        }
    }
}
