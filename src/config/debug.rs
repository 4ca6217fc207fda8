//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Every scheduler transition (debounce restarts, dispatches, stale drops).
    pub log_scheduler: bool,

    /// Request/response traffic with the prediction service.
    pub log_client: bool,

    /// Diff reports as they are produced.
    pub log_comparator: bool,

    /// History evictions.
    pub log_history: bool,

    /// Activate trace_time macro (slow request reporting)
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_scheduler: true,
    log_client: false,
    log_comparator: false,
    log_history: false,
    log_performance: true,
};
