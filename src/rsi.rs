use crate::error::{IndicatorError, Result};
use crate::math::average::wilder_step;
use crate::math::series::normalize;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Relative Strength Index with Wilder's smoothing.
///
/// The first value is seeded from the simple mean of the first `period`
/// gains and losses; each later value folds in one more price change.
/// A window without losses reads 100, including a flat series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiCalculator {
    pub period: usize,
}

impl Default for RsiCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl RsiCalculator {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Number of RSI values produced for `n` prices.
    pub fn output_len(&self, n: usize) -> usize {
        n.saturating_sub(self.period)
    }

    pub fn calculate<T>(&self, prices: &[T]) -> Result<Vec<f64>>
    where
        T: Copy + Into<f64>,
    {
        let closes = self.validate(prices).map_err(|err| {
            tracing::debug!(period = self.period, len = prices.len(), error = %err, "rsi input rejected");
            err
        })?;

        let period = self.period;
        let mut gains = Vec::with_capacity(closes.len() - 1);
        let mut losses = Vec::with_capacity(closes.len() - 1);
        for pair in closes.windows(2) {
            let change = pair[1] - pair[0];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
        let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

        let mut out = Vec::with_capacity(self.output_len(closes.len()));
        out.push(rsi_value(avg_gain, avg_loss));

        for i in period..gains.len() {
            avg_gain = wilder_step(avg_gain, gains[i], period);
            avg_loss = wilder_step(avg_loss, losses[i], period);
            out.push(rsi_value(avg_gain, avg_loss));
        }

        tracing::debug!(period, prices = closes.len(), values = out.len(), "rsi computed");
        Ok(out)
    }

    fn validate<T>(&self, prices: &[T]) -> Result<Vec<f64>>
    where
        T: Copy + Into<f64>,
    {
        if self.period < 1 {
            return Err(IndicatorError::InvalidPeriod {
                period: self.period,
            });
        }

        let required = self.period.saturating_add(1);
        if prices.len() < required {
            return Err(IndicatorError::NotEnoughData {
                required,
                actual: prices.len(),
            });
        }

        normalize("prices", prices)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss > 0.0 {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    } else {
        100.0
    }
}

pub fn rsi<T>(prices: &[T], period: usize) -> Result<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    RsiCalculator::new(period).calculate(prices)
}

pub fn rsi_default<T>(prices: &[T]) -> Result<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    RsiCalculator::default().calculate(prices)
}
