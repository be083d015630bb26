use crate::command::CommandRunner;
use crate::config::Config;
use crate::dispatch::{ActionDispatcher, DispatchOutcome, InputEvent};
use crate::popup::Popup;
use crate::probe::StatusProbe;
use crate::radio_state::{RadioState, SharedRadioState};
use std::sync::Arc;

/// Bluetooth indicator: one probe, one dispatcher, one shared state cell.
///
/// The host calls [`update`](Self::update) once per tick, reads
/// [`full_text`](Self::full_text) to render, and routes clicks to
/// [`handle`](Self::handle).
#[derive(Clone)]
pub struct BluetoothWidget {
    state: SharedRadioState,
    probe: StatusProbe,
    dispatcher: ActionDispatcher,
}

impl BluetoothWidget {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>, popup: Arc<dyn Popup>) -> Self {
        let config = Arc::new(config);
        let state = SharedRadioState::new();
        let probe = StatusProbe::new(&config.sysfs_root, &config.device, state.clone());
        let dispatcher = ActionDispatcher::new(config, state.clone(), runner, popup);

        Self {
            state,
            probe,
            dispatcher,
        }
    }

    pub async fn update(&self) -> RadioState {
        self.probe.probe().await
    }

    pub fn state(&self) -> RadioState {
        self.state.get()
    }

    pub fn full_text(&self) -> &'static str {
        self.state.get().label()
    }

    pub fn state_classes(&self) -> &'static [&'static str] {
        self.state.get().state_classes()
    }

    pub async fn handle(&self, event: InputEvent) -> DispatchOutcome {
        self.dispatcher.handle(event).await
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }
}
