//! Data models and processing for the monitor pipeline.
//!
//! - [`classify`]: classifier artifact loading, batch scoring, and the
//!   [`AlertState`](classify::AlertState) verdict
//! - [`history`]: bounded rolling history of magnitude values for trend
//!   rendering

pub mod classify;
pub mod history;

pub use classify::{AlertState, Model, ModelError};
pub use history::{sparkline_bars, RollingHistory, HISTORY_CAPACITY};
