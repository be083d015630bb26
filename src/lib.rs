pub mod command;
pub mod config;
pub mod dispatch;
pub mod popup;
pub mod probe;
pub mod radio_state;
pub mod toggle;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandRunner, RfkillCall, ShellRunner};
pub use config::{Config, EnvParameters, ParameterLookup, as_bool, load_config, resolve_config};
pub use dispatch::{ActionDispatcher, DispatchOutcome, InputEvent, MouseButton, RightClickAction, popup_items};
pub use popup::{MenuCommandPopup, Popup, PopupChoice};
pub use probe::{ProbeOutcome, StatusProbe, inspect_device};
pub use radio_state::{RadioState, SharedRadioState};
pub use toggle::Toggler;
pub use widget::BluetoothWidget;
