//! Standard normal distribution

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF
///
/// Evaluated through the complementary error function so both tails keep full
/// relative precision.
pub fn norm_cdf(x: f64) -> f64 {
    (0.5 * erfc(-x / SQRT_2)).clamp(0.0, 1.0)
}
