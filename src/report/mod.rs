pub mod json;

/// Rounds half to even after scaling, so `0.10985` becomes `0.1098`.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (v * scale).round_ties_even() / scale;
    // Avoid writing "-0.0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Shortest round-trip form, always with a fractional part (`1.0`, `0.25`).
pub fn format_score(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') || !v.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

/// Missing values are written as empty cells.
pub fn format_opt(v: Option<f64>) -> String {
    v.map(format_score).unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
