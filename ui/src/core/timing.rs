//! High-resolution timing utilities for the trial engine.
//!
//! Stamps are milliseconds as `f64`: `performance.now()` on the web, elapsed
//! time against a process-local origin on native. Only differences between
//! stamps are meaningful.

/// Millisecond timestamp used for reaction-time measurement and stimulus
/// identity. Monotonic within a process.
pub type InstantStamp = f64;

#[cfg(target_arch = "wasm32")]
pub fn now() -> InstantStamp {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> InstantStamp {
    use once_cell::sync::Lazy;
    use std::time::Instant;

    static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);
    ORIGIN.elapsed().as_secs_f64() * 1000.0
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_monotonic() {
        let a = now();
        let b = now();
        assert!(b >= a);
    }
}
