use crate::radio_state::{RadioState, SharedRadioState};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Where the kernel exposes Bluetooth controllers
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/bluetooth";

/// What a single inspection of the device directory found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The device base path does not exist
    Unreachable,
    /// No `rfkill<N>` subdirectory was found this cycle
    Inconclusive,
    /// The rfkill `state` file could not be read or parsed
    ReadFailed,
    /// The rfkill switch reported a definite value
    Observed(RadioState),
}

impl ProbeOutcome {
    /// Folds this outcome into the previously held state.
    ///
    /// Only an inconclusive cycle keeps the previous value; every failure
    /// resolves to `Unknown`.
    pub fn resolve(self, previous: RadioState) -> RadioState {
        match self {
            ProbeOutcome::Unreachable | ProbeOutcome::ReadFailed => RadioState::Unknown,
            ProbeOutcome::Inconclusive => previous,
            ProbeOutcome::Observed(state) => state,
        }
    }
}

/// Polls the rfkill switch of one Bluetooth controller and records the
/// result in the shared state cell.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    base_path: PathBuf,
    state: SharedRadioState,
}

impl StatusProbe {
    pub fn new(sysfs_root: impl AsRef<Path>, device: &str, state: SharedRadioState) -> Self {
        Self {
            base_path: sysfs_root.as_ref().join(device),
            state,
        }
    }

    /// Runs one poll cycle and returns the state now held by the cell
    pub async fn probe(&self) -> RadioState {
        let outcome = inspect_device(&self.base_path).await;
        let new_state = outcome.resolve(self.state.get());
        debug!("Probe of {} gave {:?}, state {:?}", self.base_path.display(), outcome, new_state);
        self.state.set(new_state);
        new_state
    }
}

/// Inspects `<base>/rfkill<N>/state` without touching any stored state.
///
/// The `tokio::fs` calls run on tokio's blocking pool, so each step may hop
/// to a pool thread even under a `current_thread` runtime.
pub async fn inspect_device(base_path: &Path) -> ProbeOutcome {
    match fs::try_exists(base_path).await {
        Ok(true) => {}
        Ok(false) => return ProbeOutcome::Unreachable,
        Err(e) => {
            debug!("Cannot check {}: {}", base_path.display(), e);
            return ProbeOutcome::Unreachable;
        }
    }

    let rfkill_dir = match find_rfkill_dir(base_path).await {
        Ok(Some(dir)) => dir,
        Ok(None) => {
            debug!("No rfkill directory under {}", base_path.display());
            return ProbeOutcome::Inconclusive;
        }
        Err(e) => {
            warn!("Failed to list {}: {}", base_path.display(), e);
            return ProbeOutcome::Inconclusive;
        }
    };

    let state_path = rfkill_dir.join("state");
    match read_state_value(&state_path).await {
        Ok(1) => ProbeOutcome::Observed(RadioState::On),
        Ok(_) => ProbeOutcome::Observed(RadioState::Off),
        Err(e) => {
            warn!("Failed to read {}: {}", state_path.display(), e);
            ProbeOutcome::ReadFailed
        }
    }
}

/// Returns the first `rfkill<N>` subdirectory in listing order
async fn find_rfkill_dir(base_path: &Path) -> io::Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(base_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_rfkill_name(name) {
            continue;
        }

        // Follow symlinks; an entry that cannot be stat'ed is not a directory
        let path = entry.path();
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => return Ok(Some(path)),
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        }
    }

    Ok(None)
}

/// `rfkill` followed by one or more ASCII digits
fn is_rfkill_name(name: &str) -> bool {
    name.strip_prefix("rfkill")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

async fn read_state_value(path: &Path) -> io::Result<i64> {
    let contents = fs::read_to_string(path).await?;
    contents
        .trim()
        .parse::<i64>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}: {}", contents, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn device_with_state(contents: &str) -> TempDir {
        let root = tempfile::tempdir().unwrap();
        let rfkill = root.path().join("hci0").join("rfkill0");
        std_fs::create_dir_all(&rfkill).unwrap();
        std_fs::write(rfkill.join("state"), contents).unwrap();
        root
    }

    #[test]
    fn test_is_rfkill_name() {
        assert!(is_rfkill_name("rfkill0"));
        assert!(is_rfkill_name("rfkill12"));
        assert!(!is_rfkill_name("rfkill"));
        assert!(!is_rfkill_name("rfkillx"));
        assert!(!is_rfkill_name("rfkill1a"));
        assert!(!is_rfkill_name("power"));
        assert!(!is_rfkill_name("xrfkill0"));
    }

    #[test]
    fn test_resolve_outcome() {
        assert_eq!(ProbeOutcome::Unreachable.resolve(RadioState::On), RadioState::Unknown);
        assert_eq!(ProbeOutcome::ReadFailed.resolve(RadioState::Off), RadioState::Unknown);
        assert_eq!(ProbeOutcome::Inconclusive.resolve(RadioState::On), RadioState::On);
        assert_eq!(ProbeOutcome::Inconclusive.resolve(RadioState::Unknown), RadioState::Unknown);
        assert_eq!(
            ProbeOutcome::Observed(RadioState::Off).resolve(RadioState::On),
            RadioState::Off
        );
    }

    #[tokio::test]
    async fn test_missing_base_path_is_unknown() {
        let root = tempfile::tempdir().unwrap();
        let state = SharedRadioState::new();
        state.set(RadioState::On);

        let probe = StatusProbe::new(root.path(), "hci0", state.clone());
        assert_eq!(probe.probe().await, RadioState::Unknown);
        assert_eq!(state.get(), RadioState::Unknown);
    }

    #[tokio::test]
    async fn test_state_one_is_on() {
        let root = device_with_state("1\n");
        let probe = StatusProbe::new(root.path(), "hci0", SharedRadioState::new());
        assert_eq!(probe.probe().await, RadioState::On);
    }

    #[tokio::test]
    async fn test_other_integers_are_off() {
        for contents in ["0", "0\n", "2", "-1", "  7  "] {
            let root = device_with_state(contents);
            let probe = StatusProbe::new(root.path(), "hci0", SharedRadioState::new());
            assert_eq!(probe.probe().await, RadioState::Off, "contents {:?}", contents);
        }
    }

    #[tokio::test]
    async fn test_non_numeric_state_is_unknown() {
        for contents in ["", "on", "1.0", "one\n"] {
            let root = device_with_state(contents);
            let state = SharedRadioState::new();
            state.set(RadioState::On);

            let probe = StatusProbe::new(root.path(), "hci0", state);
            assert_eq!(probe.probe().await, RadioState::Unknown, "contents {:?}", contents);
        }
    }

    #[tokio::test]
    async fn test_missing_state_file_is_unknown() {
        let root = tempfile::tempdir().unwrap();
        std_fs::create_dir_all(root.path().join("hci0").join("rfkill3")).unwrap();

        let state = SharedRadioState::new();
        state.set(RadioState::Off);

        let probe = StatusProbe::new(root.path(), "hci0", state);
        assert_eq!(probe.probe().await, RadioState::Unknown);
    }

    #[tokio::test]
    async fn test_no_rfkill_dir_keeps_previous_state() {
        let root = tempfile::tempdir().unwrap();
        let device = root.path().join("hci0");
        std_fs::create_dir_all(device.join("power")).unwrap();
        // A plain file with a matching name does not count
        std_fs::write(device.join("rfkill9"), "1").unwrap();

        let state = SharedRadioState::new();
        let probe = StatusProbe::new(root.path(), "hci0", state.clone());

        state.set(RadioState::On);
        assert_eq!(probe.probe().await, RadioState::On);

        state.set(RadioState::Off);
        assert_eq!(probe.probe().await, RadioState::Off);

        state.set(RadioState::Unknown);
        assert_eq!(probe.probe().await, RadioState::Unknown);
    }

    #[tokio::test]
    async fn test_ignores_non_matching_dirs() {
        let root = tempfile::tempdir().unwrap();
        let device = root.path().join("hci0");
        std_fs::create_dir_all(device.join("rfkill")).unwrap();
        std_fs::write(device.join("rfkill").join("state"), "0").unwrap();
        std_fs::create_dir_all(device.join("rfkill5")).unwrap();
        std_fs::write(device.join("rfkill5").join("state"), "1").unwrap();

        assert_eq!(inspect_device(&device).await, ProbeOutcome::Observed(RadioState::On));
    }

    #[tokio::test]
    async fn test_device_name_selects_directory() {
        let root = device_with_state("1");
        let probe = StatusProbe::new(root.path(), "hci1", SharedRadioState::new());
        assert_eq!(probe.probe().await, RadioState::Unknown);
    }
}
