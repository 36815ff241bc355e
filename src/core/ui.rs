//! UI sink capability for status output
//!
//! The core never talks to a terminal directly. Every component receives a
//! [`UiSink`] and emits textual status updates plus a "clear current line"
//! signal through it; what that means on screen is the sink's business.

use std::io::Write;
use std::sync::Mutex;

/// Abstract sink for human-facing status output
pub trait UiSink: Send + Sync {
    /// Emit one textual status update
    fn info(&self, message: &str);

    /// Clear the current output line (progress line cleanup)
    fn clear_line(&self);
}

/// Console sink writing to stdout
///
/// `clear_line` emits a carriage return plus an erase-line escape so a
/// following update overwrites the progress line in place.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl UiSink for ConsoleUi {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn clear_line(&self) {
        print!("\r\x1b[2K");
        let _ = std::io::stdout().flush();
    }
}

/// One recorded sink event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Info(String),
    ClearLine,
}

/// Recording sink for non-interactive use and tests
///
/// Keeps every event in order behind a mutex so it can be shared across the
/// upload call while the progress reporter writes to it.
#[derive(Debug, Default)]
pub struct MemoryUi {
    events: Mutex<Vec<UiEvent>>,
}

impl MemoryUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in emission order
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the textual updates, in emission order
    pub fn infos(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Info(message) => Some(message.clone()),
                UiEvent::ClearLine => None,
            })
            .collect()
    }
}

impl UiSink for MemoryUi {
    fn info(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Info(message.to_string()));
    }

    fn clear_line(&self) {
        self.events.lock().unwrap().push(UiEvent::ClearLine);
    }
}
