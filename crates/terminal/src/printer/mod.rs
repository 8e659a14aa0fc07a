//! Receipt printing.
//!
//! Printing never blocks order completion: with printing disabled the call
//! succeeds without touching a device, and every failure comes back as a
//! [`PrintOutcome`] rather than an error.

mod escpos;
mod layout;
mod transport;

pub use escpos::{Align, EscPos, LINE_WIDTH, TextSize};
pub use layout::{order_type_label, payment_label, render};
pub use transport::{OpenDevice, PrinterDevice};

use chrono::Local;
use kebab_pos_core::{ReceiptOrder, TerminalSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReceiptBranding;

/// Errors talking to a printer device.
#[derive(Debug, Error)]
pub enum PrinterError {
    #[error("Failed to open printer {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out connecting to printer {device}")]
    Timeout { device: String },

    #[error("Failed to write to printer {device}: {source}")]
    Write {
        device: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reply of the bridge's print operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintOutcome {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Lays out receipts and sends them to the configured device.
#[derive(Debug, Clone)]
pub struct ReceiptPrinter {
    branding: ReceiptBranding,
}

impl ReceiptPrinter {
    #[must_use]
    pub const fn new(branding: ReceiptBranding) -> Self {
        Self { branding }
    }

    /// Print `order` according to the current settings.
    pub async fn print(&self, settings: &TerminalSettings, order: &ReceiptOrder) -> PrintOutcome {
        if !settings.printer_enabled {
            tracing::info!(order_number = order.order_number, "Printer disabled in settings");
            return PrintOutcome::ok();
        }

        let printed_at = order
            .created_at
            .map_or_else(Local::now, |at| at.with_timezone(&Local))
            .naive_local();
        let doc = render(order, &self.branding, &settings.currency_symbol, printed_at);
        let device = PrinterDevice::from_settings(settings);

        match send(&device, &doc).await {
            Ok(()) => {
                tracing::info!(
                    order_number = order.order_number,
                    kitchen = order.is_kitchen_docket(),
                    printer = %settings.printer_name,
                    device = %device.describe(),
                    bytes = doc.bytes().len(),
                    "Receipt printed"
                );
                PrintOutcome::ok()
            }
            Err(e) => {
                tracing::error!(order_number = order.order_number, error = %e, "Print failed");
                PrintOutcome::failed(e.to_string())
            }
        }
    }
}

async fn send(device: &PrinterDevice, doc: &EscPos) -> Result<(), PrinterError> {
    if *device == PrinterDevice::Simulated {
        tracing::info!(
            receipt = %doc.transcript().join("\n"),
            "No printer attached, receipt not sent"
        );
    }

    let write_err = |source: std::io::Error| PrinterError::Write {
        device: device.describe(),
        source,
    };
    let mut handle = device.open().await?;
    handle.write(doc.bytes()).await.map_err(write_err)?;
    handle.close().await.map_err(write_err)
}
