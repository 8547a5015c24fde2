//! Per-row measurement metrics.

use crate::row::ValidRow;
use crate::util::MG_PER_G;

/// Dispensed mass per injection in milligrams.
///
/// `injections` is non-zero for any [`ValidRow`], so this never divides by zero.
#[inline]
pub fn mass_per_pulse_mg(row: &ValidRow) -> f64 {
    MG_PER_G * row.total_mass_g / row.injections
}

/// `(pulse_width_ms, mass_per_pulse_mg)` for a valid row; the regression input pair.
#[inline]
pub fn fit_point(row: &ValidRow) -> (f64, f64) {
    (row.pulse_width_ms, mass_per_pulse_mg(row))
}
