pub mod average;
pub mod series;
