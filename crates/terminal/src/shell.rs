//! Host shell start-up.
//!
//! The window chrome belongs to the host, not the UI. Start-up hides the
//! splash, styles the status bar and installs the back-button policy; the
//! resulting [`ShellState`] is what the page templates read.

/// Status bar background, primary-700.
pub const STATUS_BAR_COLOR: &str = "#c2410c";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarStyle {
    Dark,
    Light,
}

/// What a hardware back press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    NavigateBack,
    /// Nothing to go back to. The till never exits on back.
    Ignore,
}

impl BackAction {
    #[must_use]
    pub const fn for_press(can_go_back: bool) -> Self {
        if can_go_back {
            Self::NavigateBack
        } else {
            Self::Ignore
        }
    }
}

/// Window chrome after start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    pub splash_hidden: bool,
    pub status_bar_style: StatusBarStyle,
    pub status_bar_color: &'static str,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            splash_hidden: false,
            status_bar_style: StatusBarStyle::Light,
            status_bar_color: STATUS_BAR_COLOR,
        }
    }
}

impl ShellState {
    /// Handle a back press.
    #[must_use]
    pub fn back_pressed(&self, can_go_back: bool) -> BackAction {
        let action = BackAction::for_press(can_go_back);
        tracing::debug!(?action, "Back button pressed");
        action
    }
}

/// Shell initialisation.
#[derive(Debug, Clone, Copy)]
pub struct ShellInit {
    native: bool,
}

impl ShellInit {
    /// `native` is false when the UI runs in a plain browser with no shell
    /// around it.
    #[must_use]
    pub const fn new(native: bool) -> Self {
        Self { native }
    }

    #[must_use]
    pub fn initialize(self) -> ShellState {
        if !self.native {
            tracing::info!("Running in web mode, shell integration not available");
            return ShellState::default();
        }

        let state = ShellState {
            splash_hidden: true,
            status_bar_style: StatusBarStyle::Dark,
            status_bar_color: STATUS_BAR_COLOR,
        };
        tracing::info!(
            status_bar = ?state.status_bar_style,
            color = state.status_bar_color,
            "Shell initialized"
        );
        state
    }
}
