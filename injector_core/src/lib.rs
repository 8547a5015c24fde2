#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Fuel-injector characterization engine.
//!
//! Users enter calibration runs (pulse count, pulse width, dispensed mass);
//! the engine fits mass-per-pulse against pulse width and derives the
//! injector's flow rate, deadtime and per-row model error.
//!
//! ## Architecture
//!
//! - **Rows**: `MeasurementRow`, `ValidRow` and the `is_valid` predicate (`row`)
//! - **Store**: owned row sequence with edge-triggered auto-append (`store`)
//! - **Metrics**: mass per pulse (`metrics`)
//! - **Regression**: closed-form least squares (`regression`)
//! - **Characterization**: flow, deadtime, per-row error, chart series (`characterize`)
//! - **Session**: `Calibrator`, the edit/report boundary (`session`)
//! - **Formatting**: blank-for-NaN display rules (`format`)
//!
//! ## Units
//!
//! Pulse width in ms, total mass in g, mass per pulse in mg. A slope in mg/ms
//! is numerically a flow rate in g/s.

pub mod characterize;
pub mod conversions;
pub mod error;
pub mod format;
pub mod metrics;
pub mod regression;
pub mod row;
pub mod session;
pub mod store;
pub mod util;

pub use characterize::{
    ChartOptions, ChartPoint, Characterization, DerivedRowMetrics, RowReport, Summary,
    characterize,
};
pub use error::EngineError;
pub use format::{DisplayPrecision, fmt_input, fmt_value};
pub use regression::{FitResult, fit};
pub use row::{Field, MeasurementRow, RowId, ValidRow, is_valid};
pub use session::Calibrator;
pub use store::RowStore;
