//! In-memory doubles for the process and popup seams.

use crate::command::CommandRunner;
use crate::popup::{Popup, PopupChoice};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records command lines instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&self, command_line: &str) {
        self.commands.lock().unwrap().push(command_line.to_string());
    }
}

/// Answers every popup with a fixed choice and remembers what was shown
#[derive(Debug)]
pub struct ScriptedPopup {
    answer: PopupChoice,
    shown: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPopup {
    pub fn answering(answer: PopupChoice) -> Arc<Self> {
        Arc::new(Self {
            answer,
            shown: Mutex::new(Vec::new()),
        })
    }

    pub fn shown(&self) -> Vec<Vec<String>> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl Popup for ScriptedPopup {
    async fn show(&self, items: &[String]) -> PopupChoice {
        self.shown.lock().unwrap().push(items.to_vec());
        self.answer
    }
}
