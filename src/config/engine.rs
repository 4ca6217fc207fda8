use std::time::Duration;

/// Tuning knobs for the live engine and the comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quiet period after the last input change before a request is issued.
    pub debounce: Duration,
    /// Number of accepted results retained in the history buffer.
    pub history_capacity: usize,
    /// Currency difference below which two scenarios count as equal.
    pub negligible_threshold: f64,
    /// Training-set mean used for the "vs average" badge.
    pub dataset_average: f64,
    /// Smallest change from the previous result worth reporting as a delta.
    pub min_visible_delta: f64,
}

pub const ENGINE: EngineConfig = EngineConfig {
    debounce: Duration::from_millis(120),
    history_capacity: 20,
    negligible_threshold: 10.0,
    dataset_average: 2181.0,
    min_visible_delta: 1.0,
};

impl Default for EngineConfig {
    fn default() -> Self {
        ENGINE.clone()
    }
}

impl EngineConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
