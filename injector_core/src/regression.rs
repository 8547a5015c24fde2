//! Closed-form ordinary least squares over `(pulse_width_ms, mass_per_pulse_mg)`.

/// A fitted line `mass_per_pulse_mg = slope * pulse_width_ms + intercept`.
///
/// Degenerate inputs (fewer than two points, zero x-variance, non-finite sums)
/// produce a fit whose slope and intercept are NaN; `predict` then yields NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Flow rate: mg/ms, numerically equal to g/s.
    pub slope: f64,
    /// Mass per pulse (mg) at zero pulse width.
    pub intercept: f64,
    /// Number of points the fit was computed from.
    pub points: usize,
    /// Root-mean-square residual in mg; NaN when degenerate.
    pub rms_residual_mg: f64,
}

impl FitResult {
    pub const fn degenerate(points: usize) -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
            points,
            rms_residual_mg: f64::NAN,
        }
    }

    /// Evaluate the line at `x`; extrapolation is allowed.
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.slope.is_finite() && self.intercept.is_finite())
    }
}

/// Fit a line through `pts` in order. Never panics.
pub fn fit(pts: &[(f64, f64)]) -> FitResult {
    let n_pts = pts.len();
    if n_pts < 2 {
        tracing::trace!(points = n_pts, "fit degenerate: too few points");
        return FitResult::degenerate(n_pts);
    }

    // Accumulate around the means in f64 for numerical stability
    let n = n_pts as f64;
    let mean_x = pts.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pts.iter().map(|p| p.1).sum::<f64>() / n;
    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    for (px, py) in pts {
        let x = px - mean_x;
        let y = py - mean_y;
        sxx += x * x;
        sxy += x * y;
    }
    if !sxx.is_finite() || sxx == 0.0 {
        tracing::trace!(points = n_pts, "fit degenerate: zero pulse-width variance");
        return FitResult::degenerate(n_pts);
    }

    let slope = sxy / sxx;
    if !slope.is_finite() {
        return FitResult::degenerate(n_pts);
    }
    let intercept = mean_y - slope * mean_x;

    let mut sumsq = 0.0f64;
    for (x, y) in pts {
        let r = y - (slope * x + intercept);
        sumsq += r * r;
    }
    let rms_residual_mg = (sumsq / n).sqrt();

    FitResult {
        slope,
        intercept,
        points: n_pts,
        rms_residual_mg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_has_zero_residual() {
        let f = fit(&[(1.0, 1.0), (3.0, 5.0), (5.0, 9.0)]);
        assert!((f.slope - 2.0).abs() < 1e-12);
        assert!((f.intercept + 1.0).abs() < 1e-12);
        assert!(f.rms_residual_mg.abs() < 1e-12);
        assert_eq!(f.points, 3);
    }

    #[test]
    fn least_squares_through_noisy_points() {
        // y = x + noise with symmetric residuals (+1, -2, +1)
        let f = fit(&[(0.0, 1.0), (1.0, -1.0), (2.0, 3.0)]);
        assert!((f.slope - 1.0).abs() < 1e-12);
        assert!(f.intercept.abs() < 1e-12);
        assert!((f.rms_residual_mg - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn non_finite_input_degenerates() {
        let f = fit(&[(1.0, 1.0), (f64::INFINITY, 2.0)]);
        assert!(f.is_degenerate());
        assert!(f.predict(1.0).is_nan());
    }
}
