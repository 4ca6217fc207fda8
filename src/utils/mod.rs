mod format;
mod maths_utils;
mod perf;
mod time_utils;

pub use format::{format_currency, format_signed_pct};
pub use maths_utils::{percent_change, round_to, share_of};
pub use time_utils::{AppInstant, elapsed_ms};
