//! Host side of the bridge: the code that actually owns settings, the window
//! state and the printer.

use std::future::Future;

use kebab_pos_core::{AppInfo, ReceiptOrder, SettingsPatch, TerminalSettings};

use crate::printer::{PrintOutcome, ReceiptPrinter};
use crate::settings::SettingsStore;

/// The capabilities the bridge can reach.
///
/// Implementations are driven by a single task, one request at a time, so
/// they may hold mutable state without locking.
pub trait BridgeHost: Send + 'static {
    fn settings(&self) -> TerminalSettings;

    /// Merge and persist a partial update; `false` if it could not be saved.
    fn update_settings(&mut self, patch: SettingsPatch) -> impl Future<Output = bool> + Send;

    /// Flip fullscreen/kiosk and return the new state.
    fn toggle_fullscreen(&mut self) -> bool;

    fn app_info(&self) -> AppInfo;

    fn print_receipt(&mut self, order: ReceiptOrder) -> impl Future<Output = PrintOutcome> + Send;
}

/// Host for the desktop till.
#[derive(Debug)]
pub struct DesktopHost {
    store: SettingsStore,
    printer: ReceiptPrinter,
    fullscreen: bool,
}

impl DesktopHost {
    /// The window starts fullscreen when kiosk mode is on.
    #[must_use]
    pub fn new(store: SettingsStore, printer: ReceiptPrinter) -> Self {
        let fullscreen = store.get().kiosk_mode;
        Self {
            store,
            printer,
            fullscreen,
        }
    }

    #[must_use]
    pub const fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl BridgeHost for DesktopHost {
    fn settings(&self) -> TerminalSettings {
        self.store.get().clone()
    }

    async fn update_settings(&mut self, patch: SettingsPatch) -> bool {
        let api_url_changed = patch
            .api_url
            .as_ref()
            .is_some_and(|url| *url != self.store.get().api_url);

        match self.store.update(patch).await {
            Ok(()) => {
                if api_url_changed {
                    tracing::info!(
                        api_url = %self.store.get().api_url,
                        "Backend URL changed, takes effect after restart"
                    );
                }
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save settings");
                false
            }
        }
    }

    fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        tracing::info!(fullscreen = self.fullscreen, "Window fullscreen toggled");
        self.fullscreen
    }

    fn app_info(&self) -> AppInfo {
        AppInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: platform_name(std::env::consts::OS).to_string(),
            arch: arch_name(std::env::consts::ARCH).to_string(),
        }
    }

    async fn print_receipt(&mut self, order: ReceiptOrder) -> PrintOutcome {
        self.printer.print(self.store.get(), &order).await
    }
}

/// Platform names as the UI expects them (`darwin`, `win32`, `linux`).
fn platform_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// Architecture names as the UI expects them (`x64`, `arm64`, `ia32`).
fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_and_arch_names() {
        assert_eq!(platform_name("macos"), "darwin");
        assert_eq!(platform_name("linux"), "linux");
        assert_eq!(arch_name("x86_64"), "x64");
        assert_eq!(arch_name("riscv64"), "riscv64");
    }
}
