use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Result of showing a popup menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupChoice {
    Selected(usize),
    Dismissed,
}

/// Modal list chooser anchored to the widget
#[async_trait]
pub trait Popup: Send + Sync {
    async fn show(&self, items: &[String]) -> PopupChoice;
}

/// Popup backed by a dmenu-style command: labels go to stdin one per line,
/// the chosen label comes back on stdout.
#[derive(Debug, Clone)]
pub struct MenuCommandPopup {
    command_line: String,
}

impl MenuCommandPopup {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
        }
    }

    async fn run(&self, items: &[String]) -> Result<String> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command_line)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn popup '{}'", self.command_line))?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = items.join("\n");
            input.push('\n');
            stdin
                .write_all(input.as_bytes())
                .await
                .context("Failed to write popup items")?;
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for popup")?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Popup for MenuCommandPopup {
    async fn show(&self, items: &[String]) -> PopupChoice {
        match self.run(items).await {
            Ok(output) => choice_from_output(items, &output),
            Err(e) => {
                warn!("{:#}", e);
                PopupChoice::Dismissed
            }
        }
    }
}

/// Maps the chooser's output line back to an item index
fn choice_from_output(items: &[String], output: &str) -> PopupChoice {
    let chosen = output.lines().next().unwrap_or("").trim();
    match items.iter().position(|item| item == chosen) {
        Some(index) => {
            debug!("Popup selected {:?} (index {})", chosen, index);
            PopupChoice::Selected(index)
        }
        None => PopupChoice::Dismissed,
    }
}
