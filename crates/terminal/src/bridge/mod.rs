//! Native bridge.
//!
//! The UI reaches the host through exactly five operations and nothing else:
//!
//! | Operation         | Request                        | Reply                 |
//! |-------------------|--------------------------------|-----------------------|
//! | get settings      | `BridgeRequest::GetSettings`   | `TerminalSettings`    |
//! | set settings      | `BridgeRequest::SetSettings`   | `bool`                |
//! | toggle fullscreen | `BridgeRequest::ToggleFullscreen` | `bool` (new state) |
//! | get app info      | `BridgeRequest::GetAppInfo`    | `AppInfo`             |
//! | print receipt     | `BridgeRequest::PrintReceipt`  | `PrintOutcome`        |
//!
//! A [`Bridge`] handle sends requests over a channel to the task that owns
//! the [`BridgeHost`]; each request carries its own oneshot reply channel.
//! The host task serves requests in arrival order, one at a time.

mod host;

pub use host::{BridgeHost, DesktopHost};

use kebab_pos_core::{AppInfo, ReceiptOrder, SettingsPatch, TerminalSettings};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::printer::PrintOutcome;

/// Requests queued ahead of the host before senders wait.
const REQUEST_QUEUE: usize = 32;

/// A request to the host.
#[derive(Debug)]
pub enum BridgeRequest {
    GetSettings {
        reply: oneshot::Sender<TerminalSettings>,
    },
    SetSettings {
        patch: SettingsPatch,
        reply: oneshot::Sender<bool>,
    },
    ToggleFullscreen {
        reply: oneshot::Sender<bool>,
    },
    GetAppInfo {
        reply: oneshot::Sender<AppInfo>,
    },
    PrintReceipt {
        order: Box<ReceiptOrder>,
        reply: oneshot::Sender<PrintOutcome>,
    },
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host task has stopped.
    #[error("Terminal host is not running")]
    HostUnavailable,
}

/// UI-side handle to the host.
#[derive(Debug, Clone)]
pub struct Bridge {
    tx: mpsc::Sender<BridgeRequest>,
}

impl Bridge {
    /// Start a task serving `host` and return a handle to it.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn<H: BridgeHost>(host: H) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let task = tokio::spawn(serve(host, rx));
        (Self { tx }, task)
    }

    async fn call<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<T>) -> BridgeRequest,
    ) -> Result<T, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(request(reply))
            .await
            .map_err(|_| BridgeError::HostUnavailable)?;
        response.await.map_err(|_| BridgeError::HostUnavailable)
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::HostUnavailable`] if the host has stopped.
    pub async fn get_settings(&self) -> Result<TerminalSettings, BridgeError> {
        self.call(|reply| BridgeRequest::GetSettings { reply }).await
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::HostUnavailable`] if the host has stopped.
    pub async fn set_settings(&self, patch: SettingsPatch) -> Result<bool, BridgeError> {
        self.call(|reply| BridgeRequest::SetSettings { patch, reply })
            .await
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::HostUnavailable`] if the host has stopped.
    pub async fn toggle_fullscreen(&self) -> Result<bool, BridgeError> {
        self.call(|reply| BridgeRequest::ToggleFullscreen { reply })
            .await
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::HostUnavailable`] if the host has stopped.
    pub async fn get_app_info(&self) -> Result<AppInfo, BridgeError> {
        self.call(|reply| BridgeRequest::GetAppInfo { reply }).await
    }

    /// Print a receipt. A stopped host is reported as a failed print.
    pub async fn print_receipt(&self, order: ReceiptOrder) -> PrintOutcome {
        self.call(|reply| BridgeRequest::PrintReceipt {
            order: Box::new(order),
            reply,
        })
        .await
        .unwrap_or_else(|e| PrintOutcome::failed(e.to_string()))
    }
}

/// Serve requests until every [`Bridge`] handle is gone.
pub async fn serve<H: BridgeHost>(mut host: H, mut requests: mpsc::Receiver<BridgeRequest>) {
    tracing::debug!("Bridge host started");
    while let Some(request) = requests.recv().await {
        // A caller that gave up waiting drops its receiver; the reply is moot.
        match request {
            BridgeRequest::GetSettings { reply } => {
                let _ = reply.send(host.settings());
            }
            BridgeRequest::SetSettings { patch, reply } => {
                let _ = reply.send(host.update_settings(patch).await);
            }
            BridgeRequest::ToggleFullscreen { reply } => {
                let _ = reply.send(host.toggle_fullscreen());
            }
            BridgeRequest::GetAppInfo { reply } => {
                let _ = reply.send(host.app_info());
            }
            BridgeRequest::PrintReceipt { order, reply } => {
                let _ = reply.send(host.print_receipt(*order).await);
            }
        }
    }
    tracing::debug!("Bridge host stopped");
}
