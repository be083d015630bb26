use crate::command::{CommandRunner, RfkillCall};
use crate::config::Config;
use crate::radio_state::RadioState;
use std::sync::Arc;
use tracing::debug;

/// Issues the bus call that flips the radio.
///
/// Does not touch the stored state; the next probe observes the result.
#[derive(Clone)]
pub struct Toggler {
    runner: Arc<dyn CommandRunner>,
}

impl Toggler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// The call a toggle from `current` would issue
    pub fn rfkill_call(current: RadioState, config: &Config) -> RfkillCall {
        RfkillCall {
            destination: config.dbus_destination.clone(),
            path: config.dbus_destination_path.clone(),
            enabled: current.desired_power(),
        }
    }

    pub fn toggle(&self, current: RadioState, config: &Config) {
        let call = Self::rfkill_call(current, config);
        debug!(
            current = ?current,
            enabled = call.enabled,
            destination = %call.destination,
            "bt: toggling bluetooth"
        );
        self.runner.execute(&call.command_line());
    }
}
