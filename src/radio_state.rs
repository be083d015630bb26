use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// On/off state of the Bluetooth radio as last observed by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadioState {
    On,
    Off,
    #[default]
    Unknown, // Base path missing or the state file could not be read
}

impl RadioState {
    /// Text shown in the bar
    pub fn label(self) -> &'static str {
        match self {
            RadioState::On => "On",
            RadioState::Off => "Off",
            RadioState::Unknown => "?",
        }
    }

    /// Theme classes for the host renderer
    pub fn state_classes(self) -> &'static [&'static str] {
        match self {
            RadioState::On => &["ON"],
            RadioState::Off => &["OFF"],
            RadioState::Unknown => &["unknown"],
        }
    }

    /// Power value a toggle should request. Unknown optimistically enables.
    pub fn desired_power(self) -> bool {
        !matches!(self, RadioState::On)
    }

    /// Returns true if the state is definitively known
    pub fn is_known(self) -> bool {
        matches!(self, RadioState::On | RadioState::Off)
    }
}

/// Cell holding the current radio state.
///
/// Written only by the poll path and read by rendering and dispatch. Clones
/// share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct SharedRadioState {
    state: Arc<RwLock<RadioState>>,
}

impl SharedRadioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> RadioState {
        match self.state.read() {
            Ok(state) => *state,
            Err(e) => {
                warn!("Failed to read radio state: {}", e);
                RadioState::Unknown
            }
        }
    }

    pub fn set(&self, new_state: RadioState) {
        match self.state.write() {
            Ok(mut state) => {
                if *state != new_state {
                    debug!("Radio state {:?} -> {:?}", *state, new_state);
                }
                *state = new_state;
            }
            Err(e) => {
                warn!("Failed to set radio state: {}", e);
            }
        }
    }
}
