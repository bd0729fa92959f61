//! Formatting utilities used for CLI and export outputs.

/// Round to cents.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `part / whole`, or 0 when the whole is 0.
pub fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole }
}

pub fn hours(h: f64) -> String {
    format!("{:.2}", h)
}

pub fn money(v: f64, currency: &str) -> String {
    format!("{:.2} {}", v, currency)
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Seconds as `HH:MM:SS`.
pub fn secs2clock(secs: f64) -> String {
    let total = secs.max(0.0).round() as i64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
