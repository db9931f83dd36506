//! Terminal rendering for the dashboard.
//!
//! Layout: a header line, the dashboard (asset sidebar, vibration readout,
//! alert panel, trend sparkline), and a status bar. All pipeline state is
//! consumed from the monitor loop's published frames; nothing here mutates
//! the pipeline.

pub mod common;
pub mod dashboard;
mod theme;

pub use theme::Theme;
