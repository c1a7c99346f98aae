use crate::error::{IndicatorError, Result};
use crate::math::average::{sma_series, window_extremes};
use crate::math::series::normalize;
use serde::{Deserialize, Serialize};

pub const DEFAULT_K_LENGTH: usize = 14;
pub const DEFAULT_K_SMOOTHING: usize = 1;
pub const DEFAULT_D_SMOOTHING: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticOutput {
    pub fn last_k(&self) -> Option<f64> {
        self.k.last().copied()
    }

    pub fn last_d(&self) -> Option<f64> {
        self.d.last().copied()
    }
}

/// Stochastic oscillator in three stages: raw %K over `k_length` bars,
/// %K as an SMA of raw %K over `k_smoothing`, %D as an SMA of %K over
/// `d_smoothing`. A window with no high/low range yields a raw %K of 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticCalculator {
    pub k_length: usize,
    pub k_smoothing: usize,
    pub d_smoothing: usize,
}

impl Default for StochasticCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_K_LENGTH, DEFAULT_K_SMOOTHING, DEFAULT_D_SMOOTHING)
    }
}

impl StochasticCalculator {
    pub fn new(k_length: usize, k_smoothing: usize, d_smoothing: usize) -> Self {
        Self {
            k_length,
            k_smoothing,
            d_smoothing,
        }
    }

    /// Bars needed for at least one %D value.
    pub fn min_data_points(&self) -> usize {
        self.k_length
            .saturating_add(self.k_smoothing)
            .saturating_add(self.d_smoothing)
            .saturating_sub(2)
    }

    pub fn calculate<T>(&self, highs: &[T], lows: &[T], closes: &[T]) -> Result<StochasticOutput>
    where
        T: Copy + Into<f64>,
    {
        let raw_k = self.raw_k(highs, lows, closes)?;
        let k = sma_series(&raw_k, self.k_smoothing);
        let d = sma_series(&k, self.d_smoothing);

        tracing::debug!(
            k_length = self.k_length,
            k_smoothing = self.k_smoothing,
            d_smoothing = self.d_smoothing,
            bars = closes.len(),
            k = k.len(),
            d = d.len(),
            "stochastic computed"
        );
        Ok(StochasticOutput { k, d })
    }

    /// Unsmoothed %K, one value per bar from index `k_length - 1` onward.
    pub fn raw_k<T>(&self, highs: &[T], lows: &[T], closes: &[T]) -> Result<Vec<f64>>
    where
        T: Copy + Into<f64>,
    {
        let (highs, lows, closes) = self.validate(highs, lows, closes).map_err(|err| {
            tracing::debug!(bars = closes.len(), error = %err, "stochastic input rejected");
            err
        })?;

        let len = self.k_length;
        let mut raw_k = Vec::with_capacity(closes.len() + 1 - len);
        for i in (len - 1)..closes.len() {
            let (highest, lowest) = window_extremes(&highs, &lows, i, len);
            let range = highest - lowest;
            raw_k.push(if range > 0.0 {
                100.0 * (closes[i] - lowest) / range
            } else {
                0.0
            });
        }
        Ok(raw_k)
    }

    #[allow(clippy::type_complexity)]
    fn validate<T>(
        &self,
        highs: &[T],
        lows: &[T],
        closes: &[T],
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)>
    where
        T: Copy + Into<f64>,
    {
        if self.k_length < 1 || self.k_smoothing < 1 || self.d_smoothing < 1 {
            return Err(IndicatorError::InvalidPeriods {
                k_length: self.k_length,
                k_smoothing: self.k_smoothing,
                d_smoothing: self.d_smoothing,
            });
        }

        let n = closes.len();
        let required = self.min_data_points();
        if n < required || highs.len() != n || lows.len() != n {
            return Err(IndicatorError::InconsistentData {
                required,
                highs: highs.len(),
                lows: lows.len(),
                closes: n,
            });
        }

        Ok((
            normalize("highs", highs)?,
            normalize("lows", lows)?,
            normalize("closes", closes)?,
        ))
    }
}

pub fn stochastic<T>(
    highs: &[T],
    lows: &[T],
    closes: &[T],
    k_length: usize,
    k_smoothing: usize,
    d_smoothing: usize,
) -> Result<StochasticOutput>
where
    T: Copy + Into<f64>,
{
    StochasticCalculator::new(k_length, k_smoothing, d_smoothing).calculate(highs, lows, closes)
}

#[cfg(test)]
mod tests {
    use super::{stochastic, StochasticCalculator, StochasticOutput};
    use crate::error::IndicatorError;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const HIGHS: [i32; 18] = [
        101, 103, 102, 106, 104, 108, 111, 109, 113, 116, 114, 119, 121, 123, 120, 126, 124, 125,
    ];
    const LOWS: [i32; 18] = [
        99, 101, 100, 104, 102, 106, 109, 107, 111, 114, 112, 117, 119, 121, 118, 124, 122, 123,
    ];
    const CLOSES: [i32; 18] = [
        100, 102, 101, 105, 103, 107, 110, 108, 112, 115, 113, 118, 120, 122, 119, 125, 123, 124,
    ];

    #[test]
    fn default_windows_over_17_bars() {
        let out = StochasticCalculator::default()
            .calculate(&HIGHS[..17], &LOWS[..17], &CLOSES[..17])
            .unwrap();
        assert_eq!(out.k.len(), 4);
        assert_eq!(out.d.len(), 2);
        assert_abs_diff_eq!(out.k[1], 82.61, epsilon = 0.01);
        assert_abs_diff_eq!(out.d[1], 88.75, epsilon = 0.01);
    }

    #[test]
    fn k_smoothing_three_over_18_bars() {
        let out = stochastic(&HIGHS, &LOWS, &CLOSES, 14, 3, 3).unwrap();
        assert_eq!(out.k.len(), 3);
        assert_eq!(out.d.len(), 1);
    }

    #[test]
    fn unit_k_smoothing_keeps_raw_k() {
        let calc = StochasticCalculator::default();
        let raw = calc.raw_k(&HIGHS, &LOWS, &CLOSES).unwrap();
        let out = calc.calculate(&HIGHS, &LOWS, &CLOSES).unwrap();
        assert_eq!(out.k, raw);
    }

    #[test]
    fn flat_window_reads_zero() {
        let bars = [100.0; 5];
        let out = stochastic(&bars, &bars, &bars, 3, 1, 1).unwrap();
        assert_eq!(out.k, vec![0.0, 0.0, 0.0]);
        assert_eq!(out.d, out.k);
    }

    #[test]
    fn single_bar_is_insufficient() {
        let err = StochasticCalculator::default()
            .calculate(&[100], &[99], &[100])
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Insufficient or inconsistent data"));
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn mismatched_lengths_are_inconsistent() {
        let err = stochastic(&[100, 101], &[99], &[100, 101], 1, 1, 1).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InconsistentData {
                required: 1,
                highs: 2,
                lows: 1,
                closes: 2
            }
        );
    }

    #[test]
    fn zero_smoothing_is_rejected_first() {
        let err = stochastic(&[100, 101], &[99, 100], &[100, 101], 14, 0, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "All periods (k_length, k_smoothing, d_smoothing) must be at least 1."
        );
    }

    #[test]
    fn slow_windows_need_more_bars() {
        let err = stochastic(&HIGHS[..17], &LOWS[..17], &CLOSES[..17], 14, 3, 3).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InconsistentData { required: 18, .. }
        ));
    }

    #[test]
    fn oversized_windows_are_insufficient() {
        let err = stochastic(&[2.0; 20], &[1.0; 20], &[1.5; 20], usize::MAX, usize::MAX, 1)
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InconsistentData { closes: 20, .. }));

        let half = usize::MAX / 2;
        let err = stochastic(&[2.0; 20], &[1.0; 20], &[1.5; 20], half, half, 2).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Insufficient or inconsistent data"));
    }

    #[test]
    fn non_finite_close_is_rejected() {
        let highs = [100.0; 16];
        let lows = [99.0; 16];
        let mut closes = [100.0; 16];
        closes[15] = f64::NAN;
        let err = StochasticCalculator::default()
            .calculate(&highs, &lows, &closes)
            .unwrap_err();
        assert_eq!(
            err,
            IndicatorError::NonNumeric {
                series: "closes",
                index: 15
            }
        );
        assert_eq!(err.to_string(), "Prices must be numeric.");
    }

    #[test]
    fn params_and_output_serialize() {
        let calc: StochasticCalculator = serde_json::from_str(r#"{"k_length": 5}"#).unwrap();
        assert_eq!(calc, StochasticCalculator::new(5, 1, 3));

        let out = StochasticOutput {
            k: vec![50.0, 75.0],
            d: vec![62.5],
        };
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"k":[50.0,75.0],"d":[62.5]}"#);
        assert_eq!(out.last_k(), Some(75.0));
        assert_eq!(out.last_d(), Some(62.5));
    }

    fn bars() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        prop::collection::vec((1.0f64..500.0, 0.0f64..20.0, 0.0f64..=1.0), 1..60).prop_map(
            |rows| {
                rows.into_iter()
                    .map(|(low, spread, pos)| (low + spread, low, low + spread * pos))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn lengths_and_bounds_hold(
            rows in bars(),
            k_length in 1usize..15,
            k_smoothing in 1usize..5,
            d_smoothing in 1usize..5,
        ) {
            let calc = StochasticCalculator::new(k_length, k_smoothing, d_smoothing);
            prop_assume!(rows.len() >= calc.min_data_points());

            let highs: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let lows: Vec<f64> = rows.iter().map(|r| r.1).collect();
            let closes: Vec<f64> = rows.iter().map(|r| r.2).collect();

            let raw = calc.raw_k(&highs, &lows, &closes).unwrap();
            let out = calc.calculate(&highs, &lows, &closes).unwrap();
            prop_assert_eq!(raw.len(), rows.len() - k_length + 1);
            prop_assert_eq!(out.k.len(), raw.len() - k_smoothing + 1);
            prop_assert_eq!(out.d.len(), out.k.len() - d_smoothing + 1);
            for v in out.k.iter().chain(out.d.iter()) {
                prop_assert!(*v >= -1e-9 && *v <= 100.0 + 1e-9);
            }
        }
    }
}
