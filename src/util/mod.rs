/// Monotonic milliseconds since page load (`performance.now()`).
///
/// Falls back to wall-clock time when the Performance API is unavailable.
pub(crate) fn monotonic_now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Rounded percentage for display; non-finite values are shown as-is.
pub(crate) fn format_percent(percent: f64) -> String {
    if percent.is_finite() {
        format!("{:.0}%", percent)
    } else {
        format!("{percent}")
    }
}

/// Width for a progress bar, clamped to 0..=100.
pub(crate) fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
