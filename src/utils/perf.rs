#[macro_export]
macro_rules! trace_time {
    // $threshold_ms: how slow a block must be before it is reported
    ($name:expr, $threshold_ms:expr, $block:block) => {{
        if $crate::config::DF.log_performance {
            let start = $crate::utils::AppInstant::now();
            let result = $block;
            let elapsed = $crate::utils::elapsed_ms(start);
            if elapsed > $threshold_ms {
                log::warn!(
                    "🐢 SLOW: '{}' took {}ms (Threshold: {}ms)",
                    $name,
                    elapsed,
                    $threshold_ms
                );
            }
            result
        } else {
            $block
        }
    }};
}
