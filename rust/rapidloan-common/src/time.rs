//! A clock that works on native targets and in the browser.

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current system time.
///
/// Uses `std::time::SystemTime::now()` on native targets and the
/// `performance`/`Date`-backed clock from `web-time` on WASM, converted back
/// to a `std` [`SystemTime`] so callers never see the difference.
#[cfg(not(target_arch = "wasm32"))]
pub fn now() -> SystemTime {
    SystemTime::now()
}

/// Returns the current system time.
///
/// Uses `std::time::SystemTime::now()` on native targets and the
/// `performance`/`Date`-backed clock from `web-time` on WASM, converted back
/// to a `std` [`SystemTime`] so callers never see the difference.
#[cfg(target_arch = "wasm32")]
pub fn now() -> SystemTime {
    use web_time::web::SystemTimeExt;
    web_time::SystemTime::now().to_std()
}
