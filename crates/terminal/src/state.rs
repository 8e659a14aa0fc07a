//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{GoTrueClient, SessionGate};
use crate::bridge::Bridge;
use crate::catalog::CatalogClient;
use crate::config::TerminalConfig;
use crate::shell::ShellState;

/// Session gate as wired up in the terminal.
pub type StaffGate = SessionGate<GoTrueClient>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Host capabilities are only reachable through
/// the [`Bridge`] handle; the state never holds the host itself.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TerminalConfig,
    gate: StaffGate,
    bridge: Bridge,
    catalog: CatalogClient,
    shell: ShellState,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: TerminalConfig,
        gate: StaffGate,
        bridge: Bridge,
        catalog: CatalogClient,
        shell: ShellState,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gate,
                bridge,
                catalog,
                shell,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TerminalConfig {
        &self.inner.config
    }

    /// The staff session gate.
    #[must_use]
    pub fn gate(&self) -> &StaffGate {
        &self.inner.gate
    }

    /// Handle to the host's five bridge operations.
    #[must_use]
    pub fn bridge(&self) -> &Bridge {
        &self.inner.bridge
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn shell(&self) -> &ShellState {
        &self.inner.shell
    }
}
