//! Host-owned terminal settings and app information.
//!
//! The host shell persists these; the UI only ever sees them through the
//! native bridge.

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://kebab-posbackend-production.up.railway.app";

/// How the receipt printer is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrinterTransport {
    /// No device; receipts are logged instead of printed.
    #[default]
    None,
    /// Character device such as `/dev/usb/lp0`.
    Usb,
    /// Raw TCP printer (JetDirect style).
    Network,
}

/// Settings record returned by the bridge's "get settings" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminalSettings {
    pub api_url: String,
    pub kiosk_mode: bool,
    pub printer_enabled: bool,
    pub printer_name: String,
    pub printer_transport: PrinterTransport,
    pub usb_device: String,
    pub network_host: String,
    pub network_port: u16,
    pub currency_symbol: String,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            kiosk_mode: false,
            printer_enabled: true,
            printer_name: "Element_RW973_Mk".to_owned(),
            printer_transport: PrinterTransport::None,
            usb_device: "/dev/usb/lp0".to_owned(),
            network_host: "192.168.1.100".to_owned(),
            network_port: 9100,
            currency_symbol: "$".to_owned(),
        }
    }
}

/// Partial settings update accepted by the bridge's "set settings" operation.
///
/// Absent keys are left untouched. Unknown keys are rejected at
/// deserialization so typos never silently vanish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kiosk_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_transport: Option<PrinterTransport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb_device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
}

impl SettingsPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TerminalSettings {
    /// Merge a partial update, key by key.
    pub fn apply(&mut self, patch: SettingsPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.api_url, patch.api_url);
        set(&mut self.kiosk_mode, patch.kiosk_mode);
        set(&mut self.printer_enabled, patch.printer_enabled);
        set(&mut self.printer_name, patch.printer_name);
        set(&mut self.printer_transport, patch.printer_transport);
        set(&mut self.usb_device, patch.usb_device);
        set(&mut self.network_host, patch.network_host);
        set(&mut self.network_port, patch.network_port);
        set(&mut self.currency_symbol, patch.currency_symbol);
    }
}

/// Build information reported by the bridge's "get app info" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub version: String,
    pub platform: String,
    pub arch: String,
}
