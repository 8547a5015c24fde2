//! Unit constants and small numeric helpers.

/// Milligrams per gram.
pub const MG_PER_G: f64 = 1_000.0;

/// Flow conversion from g/s to cc/min for the reference test fluid.
pub const CC_PER_MIN_PER_G_PER_S: f64 = 83.333;

/// Map any non-finite value (±Inf, NaN) to NaN so "undefined" has one representation.
#[inline]
pub fn finite_or_nan(x: f64) -> f64 {
    if x.is_finite() { x } else { f64::NAN }
}

/// Divide, yielding NaN when the divisor is zero or either side is non-finite.
#[inline]
pub fn checked_div(num: f64, den: f64) -> f64 {
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        return f64::NAN;
    }
    finite_or_nan(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_div_rejects_zero_and_non_finite() {
        assert!(checked_div(1.0, 0.0).is_nan());
        assert!(checked_div(1.0, -0.0).is_nan());
        assert!(checked_div(f64::NAN, 2.0).is_nan());
        assert!(checked_div(1.0, f64::INFINITY).is_nan());
        assert_eq!(checked_div(6.0, 3.0), 2.0);
    }

    #[test]
    fn finite_or_nan_collapses_infinities() {
        assert!(finite_or_nan(f64::NEG_INFINITY).is_nan());
        assert_eq!(finite_or_nan(-1.5), -1.5);
    }
}
