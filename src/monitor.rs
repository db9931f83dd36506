//! The live monitor loop: fetch, classify, trend, publish.
//!
//! All pipeline state lives in an explicit [`MonitorSession`] so cycles
//! are deterministic and multiple independent sessions can coexist. A
//! spawned [`MonitorLoop`] drives one session at the sampling tick and
//! publishes completed cycles over a watch channel, so the presentation
//! layer consumes at its own pace without blocking inference.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use crate::data::{AlertState, Model, RollingHistory};
use crate::source::{SourceError, TelemetrySource};

/// Sampling tick, synchronized with the engine's 10 Hz production rate.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// The engine's fixed asset roster, in the order it emits them.
pub const KNOWN_ASSETS: [&str; 5] = [
    "Main_Motor_A",
    "Cooling_Fan_01",
    "Hydraulic_Pump_02",
    "Main_Motor_B",
    "Cooling_Fan_03",
];

/// What the pipeline publishes to the presentation boundary each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub device: String,
    /// Current smoothed vibration magnitude in Gs.
    pub magnitude: f64,
    pub alert: AlertState,
    /// Trend window for the device, oldest first, at most 50 points.
    pub history: Vec<f64>,
}

/// Why a cycle published nothing.
#[derive(Debug, Clone)]
pub enum SkipReason {
    SourceUnavailable(String),
    MalformedBatch(String),
    /// The producer has not emitted data yet. Skipped silently.
    NoDataYet,
    /// The selected device was missing from this batch (not produced, or
    /// dropped during classification).
    DeviceAbsent,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::SourceUnavailable(e) => write!(f, "source unavailable: {}", e),
            SkipReason::MalformedBatch(e) => write!(f, "malformed batch: {}", e),
            SkipReason::NoDataYet => write!(f, "no data yet"),
            SkipReason::DeviceAbsent => write!(f, "selected device absent from batch"),
        }
    }
}

/// Result of one cycle.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Published(DisplayState),
    Skipped(SkipReason),
}

/// One cycle's outcome plus diagnostics for the observability boundary
/// (dropped records, classifier contract violations).
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub notes: Vec<String>,
}

/// All state for one monitoring session: the loaded model, the selected
/// device, its rolling history, and the last published display state.
///
/// Sessions are independent; nothing here is process-global.
#[derive(Debug)]
pub struct MonitorSession {
    model: Model,
    selected: String,
    history: RollingHistory,
    last_published: Option<DisplayState>,
}

impl MonitorSession {
    /// Create a session for an already-loaded model, monitoring `device`.
    pub fn new(model: Model, device: impl Into<String>) -> Self {
        let selected = device.into();
        Self {
            model,
            history: RollingHistory::new(selected.clone()),
            selected,
            last_published: None,
        }
    }

    /// The device the session is currently monitoring.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// The most recently published display state, held across skipped
    /// cycles so the dashboard freezes instead of blanking.
    pub fn last_published(&self) -> Option<&DisplayState> {
        self.last_published.as_ref()
    }

    /// Change which device subsequent cycles monitor.
    ///
    /// The trend window rescopes to the new device; previously published
    /// states are not retroactively altered.
    pub fn switch_device(&mut self, device: &str) {
        if device != self.selected {
            self.selected = device.to_string();
            self.history.switch_device(device);
        }
    }

    /// Run one monitor cycle: fetch, classify, update history for the
    /// selected device, derive the alert, publish.
    ///
    /// Transient source errors skip the cycle without touching any state;
    /// the loop never terminates because of them.
    pub fn run_cycle(&mut self, source: &mut dyn TelemetrySource) -> CycleReport {
        let mut notes = Vec::new();

        let batch = match source.fetch_latest() {
            Ok(batch) => batch,
            Err(SourceError::Unavailable(e)) => {
                return CycleReport {
                    outcome: CycleOutcome::Skipped(SkipReason::SourceUnavailable(e)),
                    notes,
                };
            }
            Err(SourceError::Malformed(e)) => {
                return CycleReport {
                    outcome: CycleOutcome::Skipped(SkipReason::MalformedBatch(e)),
                    notes,
                };
            }
        };

        if batch.is_empty() {
            return CycleReport {
                outcome: CycleOutcome::Skipped(SkipReason::NoDataYet),
                notes,
            };
        }

        let (scored, dropped) = self.model.classify(&batch);
        for error in &dropped {
            notes.push(error.to_string());
        }

        let Some(record) = scored.get(&self.selected) else {
            return CycleReport {
                outcome: CycleOutcome::Skipped(SkipReason::DeviceAbsent),
                notes,
            };
        };

        // classify fills prediction on every record it keeps
        let prediction = record.prediction.unwrap_or_default();
        if prediction > 1 {
            notes.push(format!(
                "classifier returned out-of-domain prediction {} for {}; treating as NOMINAL",
                prediction, record.device_name
            ));
        }

        self.history.push(&record.device_name, record.magnitude);
        let state = DisplayState {
            device: record.device_name.clone(),
            magnitude: record.magnitude,
            alert: AlertState::from_prediction(prediction),
            history: self.history.snapshot(),
        };
        self.last_published = Some(state.clone());

        CycleReport {
            outcome: CycleOutcome::Published(state),
            notes,
        }
    }
}

/// Commands accepted by a running monitor loop.
#[derive(Debug)]
pub enum MonitorCommand {
    SwitchDevice(String),
    Stop,
}

/// What the loop publishes after every cycle.
#[derive(Debug, Clone, Default)]
pub struct MonitorFrame {
    /// Last published display state, held across skipped cycles.
    pub state: Option<DisplayState>,
    /// Reason the most recent cycle skipped, if it was reportable.
    pub last_skip: Option<String>,
    /// Diagnostics from the most recent cycle.
    pub notes: Vec<String>,
    /// Completed cycle count since the loop started.
    pub cycles: u64,
    /// When the most recent cycle completed.
    pub updated: Option<Instant>,
}

/// A monitor loop running on its own thread.
///
/// The loop owns the session and the telemetry source; consumers interact
/// through the frame channel and the command channel.
pub struct MonitorLoop;

impl MonitorLoop {
    /// Spawn the loop. Fixed-delay ticking: the loop sleeps the full tick
    /// after each cycle; cycle work is far below the tick at this cadence.
    pub fn spawn(
        mut session: MonitorSession,
        mut source: Box<dyn TelemetrySource>,
        tick: Duration,
    ) -> MonitorHandle {
        let (frame_tx, frame_rx) = watch::channel(MonitorFrame::default());
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<MonitorCommand>();

        let thread = thread::spawn(move || {
            let mut cycles = 0u64;

            'running: loop {
                // Drain pending commands so a device switch applies to the
                // cycle about to run.
                loop {
                    match cmd_rx.try_recv() {
                        Ok(MonitorCommand::SwitchDevice(device)) => {
                            session.switch_device(&device);
                        }
                        Ok(MonitorCommand::Stop) => break 'running,
                        Err(mpsc::error::TryRecvError::Empty) => break,
                        Err(mpsc::error::TryRecvError::Disconnected) => break 'running,
                    }
                }

                let report = session.run_cycle(source.as_mut());
                cycles += 1;

                let last_skip = match &report.outcome {
                    CycleOutcome::Published(_) => None,
                    // "No data yet" is an expected quiet start, not a fault
                    CycleOutcome::Skipped(SkipReason::NoDataYet) => None,
                    CycleOutcome::Skipped(reason) => Some(reason.to_string()),
                };

                let frame = MonitorFrame {
                    state: session.last_published().cloned(),
                    last_skip,
                    notes: report.notes,
                    cycles,
                    updated: Some(Instant::now()),
                };
                if frame_tx.send(frame).is_err() {
                    // Every consumer is gone
                    break;
                }

                thread::sleep(tick);
            }
        });

        MonitorHandle {
            frames: frame_rx,
            commands: cmd_tx,
            thread: Some(thread),
        }
    }
}

/// Consumer-side handle to a spawned monitor loop.
#[derive(Debug)]
pub struct MonitorHandle {
    frames: watch::Receiver<MonitorFrame>,
    commands: mpsc::UnboundedSender<MonitorCommand>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// The most recently published frame. Non-blocking.
    pub fn latest_frame(&self) -> MonitorFrame {
        self.frames.borrow().clone()
    }

    /// Ask the loop to monitor a different device from its next cycle.
    pub fn switch_device(&self, device: &str) {
        let _ = self
            .commands
            .send(MonitorCommand::SwitchDevice(device.to_string()));
    }

    /// Stop the loop at its next cycle boundary and wait for it to exit.
    pub fn stop(&mut self) {
        let _ = self.commands.send(MonitorCommand::Stop);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
