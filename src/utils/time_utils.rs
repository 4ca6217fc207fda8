/// Monotonic clock that also works in the browser.
pub type AppInstant = web_time::Instant;

pub fn elapsed_ms(start: AppInstant) -> u128 {
    start.elapsed().as_millis()
}
