//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Blocking notices (alert on web, log natively)
//! - Canvas backing-store size for the display's pixel ratio

use crate::driver::{Clock, Notifier};

/// Wall clock backed by `Date.now()` on web and `SystemTime` natively
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Shows notices to the user
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    #[cfg(target_arch = "wasm32")]
    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
        if let Some(window) = web_sys::window() {
            // Blocks until dismissed
            let _ = window.alert_with_message(message);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

/// Backing-store size in device pixels for a canvas shown at `css_size`
/// CSS pixels
pub fn backing_size(css_size: (f32, f32), device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let scale = |v: f32| ((v as f64 * dpr).round() as u32).max(1);
    (scale(css_size.0), scale(css_size.1))
}
