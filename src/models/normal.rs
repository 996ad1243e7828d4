/// Standard normal CDF via the error function.
///
/// N(x) = 0.5 * (1 + erf(x / sqrt(2)))
///
/// erf uses Abramowitz and Stegun 7.1.26 (max abs error ~1.5e-7).
/// Pure functions, no allocations.

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Error function approximation. Odd: erf(-x) = -erf(x).
#[inline]
pub fn erf(x: f64) -> f64 {
    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let y = 1.0 - poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        -y
    } else {
        y
    }
}

#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}
