/// Sliding simple moving average. Yields `values.len() - window + 1` points,
/// or nothing when the series is shorter than the window.
pub fn sma_series(values: &[f64], window: usize) -> Vec<f64> {
    let w = window.max(1);
    if values.len() < w {
        return Vec::new();
    }

    let divisor = w as f64;
    values
        .windows(w)
        .map(|slice| slice.iter().sum::<f64>() / divisor)
        .collect()
}

/// Wilder's recursive smoothing: weight `1/period` on the new sample.
pub fn wilder_step(prev: f64, sample: f64, period: usize) -> f64 {
    let p = period.max(1) as f64;
    (prev * (p - 1.0) + sample) / p
}

/// Highest high and lowest low over the `len` bars ending at `end` (inclusive).
pub fn window_extremes(highs: &[f64], lows: &[f64], end: usize, len: usize) -> (f64, f64) {
    let start = end + 1 - len;
    let highest = highs[start..=end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows[start..=end]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    (highest, lowest)
}
