//! Plain-text metrics parsing.
//!
//! Substations expose one metric per line (Prometheus text style). The load is
//! read from the first line whose metric name is the configured key; the value
//! is the last whitespace-delimited token on that line.

/// Parse the load from a metrics body, falling back to `0.0` when the key is
/// missing or its value is not a usable number.
pub fn parse_load(text: &str, key: &str) -> f64 {
    find_load(text, key).unwrap_or(0.0)
}

/// Like [`parse_load`] but distinguishes "not found / unparseable" as `None`.
pub fn find_load(text: &str, key: &str) -> Option<f64> {
    let line = text.lines().find(|line| is_metric_line(line, key))?;
    let value = line.split_whitespace().last()?;
    value
        .parse::<f64>()
        .ok()
        .filter(|load| load.is_finite() && *load >= 0.0)
}

/// `key` must be the whole metric name: followed by whitespace or a label set.
fn is_metric_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '{'))
}
