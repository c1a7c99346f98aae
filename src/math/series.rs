use crate::error::{IndicatorError, Result};

/// Widens a price series to `f64`, rejecting the first non-finite element.
pub fn normalize<T>(series: &'static str, values: &[T]) -> Result<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let v: f64 = (*value).into();
        if !v.is_finite() {
            return Err(IndicatorError::NonNumeric { series, index });
        }
        out.push(v);
    }
    Ok(out)
}
