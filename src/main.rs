use anyhow::Result;
use bluetooth_status::config::CONFIG_PATH_ENV;
use bluetooth_status::{BluetoothWidget, InputEvent, MenuCommandPopup, MouseButton, ShellRunner, resolve_config};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

// Single-threaded loop: polling, rendering and click handling share one thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the bar text, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Bluetooth status widget");

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
    let config = resolve_config(config_path.as_deref())?;

    info!("Watching device {} (manager: {})", config.device, config.manager);

    let interval = Duration::from_secs(config.interval_secs.max(1));
    let popup = Arc::new(MenuCommandPopup::new(config.popup_command.clone()));
    let widget = BluetoothWidget::new(config, Arc::new(ShellRunner), popup);
    info!("Right click bound to {:?}", widget.dispatcher().right_click_action());

    let mut ticker = tokio::time::interval(interval);
    let mut clicks = BufReader::new(tokio::io::stdin()).lines();
    let mut clicks_open = true;
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                widget.update().await;
                stdout.write_all(format!("{}\n", widget.full_text()).as_bytes()).await?;
                stdout.flush().await?;
            }
            line = clicks.next_line(), if clicks_open => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match line.parse::<MouseButton>() {
                        Ok(button) => {
                            // Popups wait for the user; keep the poll loop running meanwhile
                            let widget = widget.clone();
                            tokio::spawn(async move {
                                let outcome = widget.handle(InputEvent::new(button)).await;
                                debug!("{:?} click -> {:?}", button, outcome);
                            });
                        }
                        Err(e) => warn!("Ignoring input {:?}: {}", line, e),
                    },
                    Ok(None) => {
                        debug!("Click input closed");
                        clicks_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read click input: {}", e);
                        clicks_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
