//! Editing session: the engine boundary the presentation layer talks to.

use injector_config::RawRow;

use crate::characterize::{ChartOptions, Characterization, characterize};
use crate::error::{self, EngineError};
use crate::row::{Field, MeasurementRow, RowId};
use crate::store::RowStore;

/// Owns the row store; every report is recomputed from a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    store: RowStore,
    chart: ChartOptions,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart_options(mut self, chart: ChartOptions) -> Self {
        self.chart = chart;
        self
    }

    /// Seed a session from loaded rows, feeding every cell through [`Self::update`].
    ///
    /// Rows that stay incomplete still get their own slot; the session always
    /// ends with one open row.
    pub fn from_raw_rows(rows: &[RawRow], chart: ChartOptions) -> error::Result<Self> {
        let mut cal = Self::new().with_chart_options(chart);
        for raw in rows {
            let id = cal.store.last_id();
            cal.update(id, Field::Injections, &raw.injections)?;
            cal.update(id, Field::PulseWidthMs, &raw.pulse_width_ms)?;
            cal.update(id, Field::TotalMassG, &raw.total_mass_g)?;
            if raw.include == Some(false) {
                cal.set_include(id, false)?;
            }
            if cal.store.last_id() == id {
                cal.append();
            }
        }
        tracing::debug!(rows = cal.store.len(), "session seeded from raw rows");
        Ok(cal)
    }

    pub fn append(&mut self) -> RowId {
        let id = self.store.append();
        tracing::debug!(row = %id, "append");
        id
    }

    pub fn update(&mut self, id: RowId, field: Field, raw: &str) -> Result<(), EngineError> {
        self.store.update(id, field, raw)?;
        tracing::debug!(row = %id, %field, raw, rows = self.store.len(), "update");
        Ok(())
    }

    pub fn set_include(&mut self, id: RowId, included: bool) -> Result<(), EngineError> {
        self.store.set_include(id, included)?;
        tracing::debug!(row = %id, included, "set include");
        Ok(())
    }

    pub fn remove(&mut self, id: RowId) -> Result<bool, EngineError> {
        let removed = self.store.remove(id)?;
        if removed {
            tracing::debug!(row = %id, "remove");
        } else {
            tracing::debug!(row = %id, "remove ignored: last remaining row");
        }
        Ok(removed)
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        self.store.rows()
    }

    pub const fn store(&self) -> &RowStore {
        &self.store
    }

    pub const fn chart_options(&self) -> ChartOptions {
        self.chart
    }

    /// Recompute all outputs from the current rows.
    pub fn report(&self) -> Characterization {
        characterize(&self.store.snapshot(), &self.chart)
    }
}
