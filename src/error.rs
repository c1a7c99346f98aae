use thiserror::Error;

/// Rejected calculator input. Every variant is an invalid-argument failure:
/// it is raised before any numeric work and carries no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Period must be at least 1.")]
    InvalidPeriod { period: usize },

    #[error("All periods (k_length, k_smoothing, d_smoothing) must be at least 1.")]
    InvalidPeriods {
        k_length: usize,
        k_smoothing: usize,
        d_smoothing: usize,
    },

    #[error("Not enough data to calculate RSI.")]
    NotEnoughData { required: usize, actual: usize },

    #[error("Insufficient or inconsistent data for Stochastic. Need at least {required} data points.")]
    InconsistentData {
        required: usize,
        highs: usize,
        lows: usize,
        closes: usize,
    },

    #[error("Prices must be numeric.")]
    NonNumeric { series: &'static str, index: usize },
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
