//! # sentinel-v
//!
//! A real-time predictive-maintenance monitor for the Sentinel-V vibration
//! engine. It polls the engine's live telemetry feed, scores each snapshot
//! with a pretrained anomaly classifier, keeps a bounded rolling trend for
//! the monitored asset, and surfaces a NOMINAL/DANGER verdict per tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐   ┌─────────┐ │
//! │  │ monitor │───▶│   data   │───▶│   ui    │──▶│ Terminal│ │
//! │  │ (loop)  │    │(classify,│    │(render) │   │         │ │
//! │  └────┬────┘    │ history) │    └─────────┘   └─────────┘ │
//! │       │         └──────────┘                               │
//! │       ▼                                                    │
//! │  ┌─────────┐                                               │
//! │  │ source  │◀── FileSource | ChannelSource                 │
//! │  │ (input) │                                               │
//! │  └─────────┘                                               │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: telemetry acquisition behind the [`TelemetrySource`]
//!   trait: file polling of the engine's output, or an in-memory channel
//! - **[`data`]**: the classifier adapter ([`Model`]) and the bounded
//!   rolling history ([`RollingHistory`])
//! - **[`monitor`]**: the per-tick cycle ([`MonitorSession`]) and the
//!   background loop that publishes completed cycles to consumers
//! - **[`app`]** / **[`ui`]** / **[`events`]**: terminal presentation;
//!   holds no pipeline state
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the engine's telemetry file in the TUI
//! sentinel-v --file live_stream.csv --model model.json
//!
//! # Headless bridge mode: one status line per cycle
//! sentinel-v --bridge
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use sentinel_v::{FileSource, Model, MonitorSession};
//!
//! let model = Model::load("model.json")?;
//! let mut session = MonitorSession::new(model, "Main_Motor_A");
//! let mut source = FileSource::new("live_stream.csv");
//! let report = session.run_cycle(&mut source);
//! # Ok::<(), sentinel_v::ModelError>(())
//! ```
//!
//! ### Feeding telemetry from an embedded producer
//!
//! ```
//! use sentinel_v::source::{ChannelSource, DeviceSnapshot, SnapshotBatch};
//!
//! let (tx, source) = ChannelSource::create("embedded engine");
//! tx.send(SnapshotBatch::from_records(vec![
//!     DeviceSnapshot::new("Main_Motor_A", 0.42),
//! ])).unwrap();
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod monitor;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{AlertState, Model, ModelError, RollingHistory, HISTORY_CAPACITY};
pub use monitor::{
    CycleOutcome, CycleReport, DisplayState, MonitorFrame, MonitorHandle, MonitorLoop,
    MonitorSession, SkipReason, DEFAULT_TICK, KNOWN_ASSETS,
};
pub use source::{
    ChannelSource, DeviceSnapshot, FileSource, SnapshotBatch, SourceError, TelemetrySource,
};
