//! Rolling magnitude history for trend rendering.

use std::collections::VecDeque;

/// Maximum number of magnitude values kept per trend window.
pub const HISTORY_CAPACITY: usize = 50;

/// Bounded FIFO history of magnitude values for the selected device.
///
/// One rolling window, scoped to whichever device is currently selected:
/// switching devices resets the window rather than keeping parallel
/// per-device histories. That matches the single trend frame the
/// presentation layer renders.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    device: String,
    values: VecDeque<f64>,
}

impl RollingHistory {
    /// Create an empty history scoped to the given device.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            values: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// The device this history is currently scoped to.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Rescope the history to another device, discarding the window.
    ///
    /// Switching back and forth does not restore old values; the trend is
    /// rebuilt from scratch for the new selection.
    pub fn switch_device(&mut self, device: &str) {
        if device != self.device {
            self.device = device.to_string();
            self.values.clear();
        }
    }

    /// Append one magnitude for a device, evicting the oldest value once
    /// the window is full.
    ///
    /// A push for a device other than the current scope rescopes first, so
    /// the window never mixes readings from different assets.
    pub fn push(&mut self, device: &str, magnitude: f64) {
        self.switch_device(device);
        self.values.push_back(magnitude);
        if self.values.len() > HISTORY_CAPACITY {
            self.values.pop_front();
        }
    }

    /// Current window contents, oldest first.
    ///
    /// Returns a copy; callers cannot reach the internal buffer.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Scale a magnitude window into bar heights for a sparkline widget.
///
/// Values are normalized against the window's own min/max so small
/// fluctuations stay visible; heights are 1-based so a flat window still
/// draws a line.
pub fn sparkline_bars(values: &[f64]) -> Vec<u64> {
    if values.len() < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(f64::EPSILON);

    values
        .iter()
        .map(|&v| (((v - min) / range) * 63.0).round() as u64 + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_starts_empty() {
        let history = RollingHistory::new("Main_Motor_A");
        assert!(history.is_empty());
        assert_eq!(history.device(), "Main_Motor_A");
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut history = RollingHistory::new("Main_Motor_A");
        history.push("Main_Motor_A", 0.1);
        history.push("Main_Motor_A", 0.2);
        history.push("Main_Motor_A", 0.3);
        assert_eq!(history.snapshot(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut history = RollingHistory::new("Main_Motor_A");
        for i in 0..200 {
            history.push("Main_Motor_A", i as f64);
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_fifo_eviction_after_51_pushes() {
        let mut history = RollingHistory::new("Main_Motor_A");
        for i in 1..=51 {
            history.push("Main_Motor_A", i as f64);
        }
        let expected: Vec<f64> = (2..=51).map(f64::from).collect();
        assert_eq!(history.snapshot(), expected);
    }

    #[test]
    fn test_switch_device_resets_window() {
        let mut history = RollingHistory::new("Main_Motor_A");
        history.push("Main_Motor_A", 0.5);
        history.push("Main_Motor_A", 0.6);

        history.switch_device("Cooling_Fan_01");
        assert!(history.is_empty());
        assert_eq!(history.device(), "Cooling_Fan_01");

        history.push("Cooling_Fan_01", 2.0);
        assert_eq!(history.snapshot(), vec![2.0]);
    }

    #[test]
    fn test_switch_to_same_device_keeps_window() {
        let mut history = RollingHistory::new("Main_Motor_A");
        history.push("Main_Motor_A", 0.5);
        history.switch_device("Main_Motor_A");
        assert_eq!(history.snapshot(), vec![0.5]);
    }

    #[test]
    fn test_push_for_other_device_rescopes() {
        let mut history = RollingHistory::new("Main_Motor_A");
        history.push("Main_Motor_A", 0.5);
        history.push("Main_Motor_B", 1.5);
        assert_eq!(history.device(), "Main_Motor_B");
        assert_eq!(history.snapshot(), vec![1.5]);
    }

    #[test]
    fn test_sparkline_bars_normalizes_to_window() {
        let bars = sparkline_bars(&[1.0, 2.0, 3.0]);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0], 1);
        assert!(bars[2] > bars[1]);
        assert_eq!(bars[2], 64);
    }

    #[test]
    fn test_sparkline_bars_flat_window_still_draws() {
        let bars = sparkline_bars(&[2.0, 2.0, 2.0]);
        assert!(bars.iter().all(|&b| b >= 1));
    }

    #[test]
    fn test_sparkline_bars_needs_two_points() {
        assert!(sparkline_bars(&[]).is_empty());
        assert!(sparkline_bars(&[1.0]).is_empty());
    }
}
