use crate::error::IndicatorError;
use crate::rsi::{RsiCalculator, DEFAULT_RSI_PERIOD};
use crate::stochastic::{
    StochasticCalculator, StochasticOutput, DEFAULT_D_SMOOTHING, DEFAULT_K_LENGTH,
    DEFAULT_K_SMOOTHING,
};
use ndarray::ArrayView1;
use numpy::{PyArray1, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyString};

fn to_py_err(err: IndicatorError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// Negative Python ints land on 0 so they fail the period check.
fn window_arg(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Reads a float64 ndarray directly, otherwise walks any iterable. Elements
/// that are not numbers become NaN so the calculators reject them after
/// their length checks.
fn extract_series(obj: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    if let Ok(array) = obj.downcast::<PyArray1<f64>>() {
        let readonly = array
            .try_readonly()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        let view: ArrayView1<'_, f64> = readonly.as_array();
        return Ok(view.iter().copied().collect());
    }

    let mut out = Vec::new();
    for item in obj.iter()? {
        out.push(extract_price(&item?));
    }
    Ok(out)
}

// numpy's `bool_` (named `bool` from numpy 2) is not a PyBool subclass.
fn is_bool_like(item: &Bound<'_, PyAny>) -> bool {
    item.is_instance_of::<PyBool>()
        || item
            .get_type()
            .name()
            .map(|name| name.to_string().starts_with("bool"))
            .unwrap_or(false)
}

fn extract_price(item: &Bound<'_, PyAny>) -> f64 {
    if is_bool_like(item) {
        return f64::NAN;
    }
    if let Ok(v) = item.extract::<f64>() {
        return v;
    }
    if let Ok(text) = item.downcast::<PyString>() {
        if let Ok(parsed) = text.to_cow().map(|s| s.trim().parse::<f64>()) {
            return parsed.unwrap_or(f64::NAN);
        }
    }
    f64::NAN
}

fn output_to_dict(py: Python<'_>, output: StochasticOutput) -> PyResult<Py<PyDict>> {
    let out = PyDict::new_bound(py);
    out.set_item("k", output.k)?;
    out.set_item("d", output.d)?;
    Ok(out.unbind())
}

#[pyclass(name = "RsiCalculator")]
#[derive(Clone, Debug)]
pub struct PyRsiCalculator {
    inner: RsiCalculator,
}

#[pymethods]
impl PyRsiCalculator {
    #[new]
    #[pyo3(signature = (period=DEFAULT_RSI_PERIOD as i64))]
    fn new(period: i64) -> Self {
        Self {
            inner: RsiCalculator::new(window_arg(period)),
        }
    }

    #[getter]
    fn period(&self) -> usize {
        self.inner.period
    }

    fn calculate(&self, prices: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
        let prices = extract_series(prices)?;
        self.inner.calculate(&prices).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!("RsiCalculator(period={})", self.inner.period)
    }
}

#[pyclass(name = "StochasticCalculator")]
#[derive(Clone, Debug)]
pub struct PyStochasticCalculator {
    inner: StochasticCalculator,
}

#[pymethods]
impl PyStochasticCalculator {
    #[new]
    #[pyo3(signature = (
        k_length=DEFAULT_K_LENGTH as i64,
        k_smoothing=DEFAULT_K_SMOOTHING as i64,
        d_smoothing=DEFAULT_D_SMOOTHING as i64,
    ))]
    fn new(k_length: i64, k_smoothing: i64, d_smoothing: i64) -> Self {
        Self {
            inner: StochasticCalculator::new(
                window_arg(k_length),
                window_arg(k_smoothing),
                window_arg(d_smoothing),
            ),
        }
    }

    #[getter]
    fn k_length(&self) -> usize {
        self.inner.k_length
    }

    #[getter]
    fn k_smoothing(&self) -> usize {
        self.inner.k_smoothing
    }

    #[getter]
    fn d_smoothing(&self) -> usize {
        self.inner.d_smoothing
    }

    fn calculate(
        &self,
        py: Python<'_>,
        highs: &Bound<'_, PyAny>,
        lows: &Bound<'_, PyAny>,
        closes: &Bound<'_, PyAny>,
    ) -> PyResult<Py<PyDict>> {
        let highs = extract_series(highs)?;
        let lows = extract_series(lows)?;
        let closes = extract_series(closes)?;
        let output = self
            .inner
            .calculate(&highs, &lows, &closes)
            .map_err(to_py_err)?;
        output_to_dict(py, output)
    }

    fn __repr__(&self) -> String {
        format!(
            "StochasticCalculator(k_length={}, k_smoothing={}, d_smoothing={})",
            self.inner.k_length, self.inner.k_smoothing, self.inner.d_smoothing
        )
    }
}

#[pyfunction]
#[pyo3(signature = (prices, period=DEFAULT_RSI_PERIOD as i64))]
pub fn rsi(prices: &Bound<'_, PyAny>, period: i64) -> PyResult<Vec<f64>> {
    PyRsiCalculator::new(period).calculate(prices)
}

#[pyfunction]
#[pyo3(signature = (
    highs,
    lows,
    closes,
    k_length=DEFAULT_K_LENGTH as i64,
    k_smoothing=DEFAULT_K_SMOOTHING as i64,
    d_smoothing=DEFAULT_D_SMOOTHING as i64,
))]
pub fn stochastic(
    py: Python<'_>,
    highs: &Bound<'_, PyAny>,
    lows: &Bound<'_, PyAny>,
    closes: &Bound<'_, PyAny>,
    k_length: i64,
    k_smoothing: i64,
    d_smoothing: i64,
) -> PyResult<Py<PyDict>> {
    PyStochasticCalculator::new(k_length, k_smoothing, d_smoothing).calculate(py, highs, lows, closes)
}
