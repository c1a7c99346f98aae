pub mod error;
pub mod math;
pub mod rsi;
pub mod stochastic;

#[cfg(feature = "python")]
mod python;

pub use error::{IndicatorError, Result};
pub use rsi::{rsi, rsi_default, RsiCalculator, DEFAULT_RSI_PERIOD};
pub use stochastic::{
    stochastic, StochasticCalculator, StochasticOutput, DEFAULT_D_SMOOTHING, DEFAULT_K_LENGTH,
    DEFAULT_K_SMOOTHING,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn oscillators(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyRsiCalculator>()?;
    m.add_class::<python::PyStochasticCalculator>()?;

    m.add_function(wrap_pyfunction!(python::rsi, m)?)?;
    m.add_function(wrap_pyfunction!(python::stochastic, m)?)?;

    m.add("DEFAULT_RSI_PERIOD", DEFAULT_RSI_PERIOD)?;
    Ok(())
}
