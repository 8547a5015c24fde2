//! `From` implementations bridging `injector_config` types to `injector_core` types.

use crate::characterize::ChartOptions;
use crate::format::DisplayPrecision;

// ── DisplayCfg ───────────────────────────────────────────────────────────────

impl From<&injector_config::DisplayCfg> for DisplayPrecision {
    fn from(c: &injector_config::DisplayCfg) -> Self {
        Self {
            decimals: c.decimals,
            small_pulse_decimals: c.small_pulse_decimals,
        }
    }
}

// ── ChartCfg ─────────────────────────────────────────────────────────────────

impl From<&injector_config::ChartCfg> for ChartOptions {
    fn from(c: &injector_config::ChartCfg) -> Self {
        Self {
            extend_to_deadtime: c.extend_to_deadtime,
        }
    }
}
