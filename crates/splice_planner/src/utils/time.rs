/// Runs `$block` and logs its duration at debug level under `$label`.
#[macro_export]
macro_rules! timed_debug {
    ($label:expr, $block:expr) => {{
        let started_at = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(started_at);

        tracing::debug!("{} took {:?}", $label, elapsed);

        result
    }};
}
