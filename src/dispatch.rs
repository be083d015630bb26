use crate::command::CommandRunner;
use crate::config::Config;
use crate::popup::{Popup, PopupChoice};
use crate::radio_state::{RadioState, SharedRadioState};
use crate::toggle::Toggler;
use anyhow::{anyhow, Error};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

pub const DISABLE_LABEL: &str = "Disable Bluetooth";
pub const ENABLE_LABEL: &str = "Enable Bluetooth";

/// Mouse buttons as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    /// X11 button numbering
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::Right),
            4 => Some(MouseButton::WheelUp),
            5 => Some(MouseButton::WheelDown),
            _ => None,
        }
    }
}

impl FromStr for MouseButton {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| anyhow!("Unknown button code {}", code));
        }
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            "wheel-up" | "wheel_up" => Ok(MouseButton::WheelUp),
            "wheel-down" | "wheel_down" => Ok(MouseButton::WheelDown),
            other => Err(anyhow!("Unknown button {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub button: MouseButton,
}

impl InputEvent {
    pub fn new(button: MouseButton) -> Self {
        Self { button }
    }
}

/// What a right click is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightClickAction {
    Popup,
    Toggle,
}

/// Which action a dispatched event ended up taking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    ManagerLaunched,
    Toggled,
    PopupConfirmed,
    PopupDismissed,
    /// State was unknown, so no menu was shown
    PopupSkipped,
    Ignored,
}

/// Menu items offered for the given state; empty when there is nothing
/// sensible to toggle.
pub fn popup_items(state: RadioState) -> Vec<String> {
    match state {
        RadioState::On => vec![DISABLE_LABEL.to_string()],
        RadioState::Off => vec![ENABLE_LABEL.to_string()],
        RadioState::Unknown => Vec::new(),
    }
}

/// Routes clicks to the manager launcher, the popup or the toggler
#[derive(Clone)]
pub struct ActionDispatcher {
    config: Arc<Config>,
    state: SharedRadioState,
    runner: Arc<dyn CommandRunner>,
    toggler: Toggler,
    popup: Arc<dyn Popup>,
    right_click: RightClickAction,
}

impl ActionDispatcher {
    pub fn new(
        config: Arc<Config>,
        state: SharedRadioState,
        runner: Arc<dyn CommandRunner>,
        popup: Arc<dyn Popup>,
    ) -> Self {
        let right_click = if config.right_click_popup {
            RightClickAction::Popup
        } else {
            RightClickAction::Toggle
        };
        debug!("Right click bound to {:?}", right_click);

        Self {
            config,
            state,
            toggler: Toggler::new(runner.clone()),
            runner,
            popup,
            right_click,
        }
    }

    pub fn right_click_action(&self) -> RightClickAction {
        self.right_click
    }

    pub async fn handle(&self, event: InputEvent) -> DispatchOutcome {
        match event.button {
            MouseButton::Left => {
                self.launch_manager();
                DispatchOutcome::ManagerLaunched
            }
            MouseButton::Right => match self.right_click {
                RightClickAction::Popup => self.show_popup().await,
                RightClickAction::Toggle => {
                    self.toggle();
                    DispatchOutcome::Toggled
                }
            },
            other => {
                debug!("Ignoring {:?} click", other);
                DispatchOutcome::Ignored
            }
        }
    }

    pub fn launch_manager(&self) {
        info!("Launching {}", self.config.manager);
        self.runner.execute(&self.config.manager);
    }

    pub fn toggle(&self) {
        self.toggler.toggle(self.state.get(), &self.config);
    }

    /// Offers the single enable/disable item and toggles when it is chosen.
    ///
    /// The toggle direction follows the state the menu was built from.
    pub async fn show_popup(&self) -> DispatchOutcome {
        let state = self.state.get();
        if !state.is_known() {
            debug!("Radio state unknown, not showing popup");
            return DispatchOutcome::PopupSkipped;
        }
        let items = popup_items(state);

        match self.popup.show(&items).await {
            PopupChoice::Selected(0) => {
                self.toggler.toggle(state, &self.config);
                DispatchOutcome::PopupConfirmed
            }
            choice => {
                debug!("Popup closed with {:?}", choice);
                DispatchOutcome::PopupDismissed
            }
        }
    }
}
