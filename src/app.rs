//! Application state and asset-selection logic for the TUI.

use std::time::Instant;

use crate::monitor::{MonitorFrame, MonitorHandle};
use crate::ui::Theme;

/// Main application state.
///
/// Holds the consumer side of the monitor loop plus everything the TUI
/// needs for rendering: the known-asset roster, the current selection,
/// the latest published frame, and transient status messages.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    /// Known assets, in display order. Fixed for the session.
    pub devices: Vec<String>,
    pub selected_index: usize,

    /// Latest frame consumed from the monitor loop.
    pub frame: MonitorFrame,

    pub source_description: String,
    pub theme: Theme,

    /// Temporary feedback shown in the status bar.
    pub status_message: Option<(String, Instant)>,

    monitor: MonitorHandle,
}

impl App {
    /// Create the app around a running monitor loop.
    pub fn new(
        monitor: MonitorHandle,
        devices: Vec<String>,
        initial_device: &str,
        source_description: String,
    ) -> Self {
        let selected_index = devices
            .iter()
            .position(|d| d == initial_device)
            .unwrap_or(0);
        Self {
            running: true,
            show_help: false,
            devices,
            selected_index,
            frame: MonitorFrame::default(),
            source_description,
            theme: Theme::auto_detect(),
            status_message: None,
            monitor,
        }
    }

    /// The asset currently selected in the sidebar.
    pub fn selected_device(&self) -> &str {
        &self.devices[self.selected_index]
    }

    /// Pull the latest published frame from the monitor loop.
    ///
    /// Called once per render pass; the loop keeps sampling at its own
    /// cadence regardless of how often this runs.
    pub fn refresh(&mut self) {
        self.frame = self.monitor.latest_frame();
    }

    /// Move the selection down and rescope the monitor to it.
    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.devices.len() {
            self.selected_index += 1;
            self.apply_selection();
        }
    }

    /// Move the selection up and rescope the monitor to it.
    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.apply_selection();
        }
    }

    /// Jump to the first asset.
    pub fn select_first(&mut self) {
        if self.selected_index != 0 {
            self.selected_index = 0;
            self.apply_selection();
        }
    }

    /// Jump to the last asset.
    pub fn select_last(&mut self) {
        let last = self.devices.len().saturating_sub(1);
        if self.selected_index != last {
            self.selected_index = last;
            self.apply_selection();
        }
    }

    fn apply_selection(&mut self) {
        let device = self.devices[self.selected_index].clone();
        self.monitor.switch_device(&device);
        self.set_status_message(format!("Monitoring {}", device));
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the monitor loop and wait for it to exit.
    pub fn shutdown(&mut self) {
        self.monitor.stop();
    }
}
