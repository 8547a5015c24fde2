//! Injector characterization: flow rate, deadtime and per-row model error.
//!
//! Everything here is a pure function of a row snapshot. Undefined quantities
//! are NaN and propagate; nothing in this module fails.

use crate::metrics::{fit_point, mass_per_pulse_mg};
use crate::regression::{FitResult, fit};
use crate::row::{MeasurementRow, ValidRow};
use crate::util::{CC_PER_MIN_PER_G_PER_S, checked_div, finite_or_nan};

/// Metrics for one valid row, whether or not it is included in the fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedRowMetrics {
    pub actual_mass_per_pulse_mg: f64,
    pub modeled_mass_per_pulse_mg: f64,
    pub percent_error: f64,
    /// Pulse width the linear model implies for the observed mass per pulse.
    pub modeled_pulse_width_ms: f64,
    /// `pulse_width_ms - deadtime_ms - modeled_pulse_width_ms`
    pub small_pulse_adder_ms: f64,
}

/// Aggregate injector figures derived from the fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub flow_rate_g_per_s: f64,
    pub flow_rate_cc_per_min: f64,
    pub deadtime_ms: f64,
    pub included_rows: usize,
    pub rms_residual_mg: f64,
}

impl Summary {
    pub fn from_fit(fit: &FitResult) -> Self {
        let flow_rate_g_per_s = finite_or_nan(fit.slope);
        Self {
            flow_rate_g_per_s,
            flow_rate_cc_per_min: finite_or_nan(CC_PER_MIN_PER_G_PER_S * flow_rate_g_per_s),
            deadtime_ms: deadtime_ms(fit),
            included_rows: fit.points,
            rms_residual_mg: finite_or_nan(fit.rms_residual_mg),
        }
    }
}

/// A point of either chart series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub pulse_width_ms: f64,
    pub mass_per_pulse_mg: f64,
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowReport {
    pub row: MeasurementRow,
    /// `None` for incomplete rows.
    pub metrics: Option<DerivedRowMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Start the fitted series at the deadtime (zero mass) when it is defined.
    pub extend_to_deadtime: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            extend_to_deadtime: true,
        }
    }
}

/// Full output of one recompute cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Characterization {
    pub rows: Vec<RowReport>,
    pub measured: Vec<ChartPoint>,
    pub fitted: Vec<ChartPoint>,
    pub fit: FitResult,
    pub summary: Summary,
}

/// x-intercept of the fitted line; NaN for zero or undefined slope.
pub fn deadtime_ms(fit: &FitResult) -> f64 {
    checked_div(-fit.intercept, fit.slope)
}

/// Per-row metrics against an existing fit.
pub fn row_metrics(row: &ValidRow, fit: &FitResult) -> DerivedRowMetrics {
    let actual = mass_per_pulse_mg(row);
    let modeled = finite_or_nan(fit.predict(row.pulse_width_ms));
    let percent_error = finite_or_nan(100.0 * checked_div(modeled - actual, actual));
    let modeled_pulse_width_ms = checked_div(actual, fit.slope);
    let small_pulse_adder_ms =
        finite_or_nan(row.pulse_width_ms - deadtime_ms(fit) - modeled_pulse_width_ms);
    DerivedRowMetrics {
        actual_mass_per_pulse_mg: actual,
        modeled_mass_per_pulse_mg: modeled,
        percent_error,
        modeled_pulse_width_ms,
        small_pulse_adder_ms,
    }
}

/// Fit over the valid, included rows of `rows`, in order.
pub fn fit_rows(rows: &[MeasurementRow]) -> FitResult {
    fit_valid(&validate(rows))
}

fn validate(rows: &[MeasurementRow]) -> Vec<Option<ValidRow>> {
    rows.iter().map(|r| ValidRow::try_from(r).ok()).collect()
}

fn fit_valid(valid: &[Option<ValidRow>]) -> FitResult {
    let pts: Vec<(f64, f64)> = valid
        .iter()
        .flatten()
        .filter(|v| v.include_in_fit)
        .map(fit_point)
        .collect();
    fit(&pts)
}

/// Run the whole pipeline: validate, derive, fit, characterize.
pub fn characterize(rows: &[MeasurementRow], opts: &ChartOptions) -> Characterization {
    let valid = validate(rows);

    let fit = fit_valid(&valid);
    let summary = Summary::from_fit(&fit);

    let reports = rows
        .iter()
        .zip(&valid)
        .map(|(row, v)| RowReport {
            row: row.clone(),
            metrics: v.as_ref().map(|v| row_metrics(v, &fit)),
        })
        .collect();

    let measured = valid
        .iter()
        .flatten()
        .map(|v| ChartPoint {
            pulse_width_ms: v.pulse_width_ms,
            mass_per_pulse_mg: mass_per_pulse_mg(v),
            included: v.include_in_fit,
        })
        .collect();

    let fitted = fitted_series(&valid, &fit, summary.deadtime_ms, opts);

    tracing::trace!(
        rows = rows.len(),
        included = fit.points,
        slope = fit.slope,
        intercept = fit.intercept,
        deadtime_ms = summary.deadtime_ms,
        "recomputed characterization"
    );

    Characterization {
        rows: reports,
        measured,
        fitted,
        fit,
        summary,
    }
}

fn fitted_series(
    valid: &[Option<ValidRow>],
    fit: &FitResult,
    deadtime: f64,
    opts: &ChartOptions,
) -> Vec<ChartPoint> {
    if fit.is_degenerate() {
        return Vec::new();
    }
    let mut xs: Vec<f64> = valid
        .iter()
        .flatten()
        .filter(|v| v.include_in_fit)
        .map(|v| v.pulse_width_ms)
        .collect();
    if opts.extend_to_deadtime && deadtime.is_finite() {
        xs.push(deadtime);
    }
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.into_iter()
        .map(|x| ChartPoint {
            pulse_width_ms: x,
            mass_per_pulse_mg: fit.predict(x),
            included: true,
        })
        .collect()
}
