//! Ordered, owned collection of measurement rows.
//!
//! The store is the single owner of row data. Readers get slices or clones;
//! nothing downstream keeps a reference across a recompute.

use crate::error::EngineError;
use crate::row::{Field, MeasurementRow, RowId, is_valid, parse_raw};

#[derive(Debug, Clone)]
pub struct RowStore {
    rows: Vec<MeasurementRow>,
    next_id: u64,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore {
    /// A store holding a single blank row.
    pub fn new() -> Self {
        let mut store = Self {
            rows: Vec::new(),
            next_id: 0,
        };
        store.append();
        store
    }

    /// Append a blank, included row and return its id.
    pub fn append(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.rows.push(MeasurementRow::blank(id));
        id
    }

    /// Parse `raw` into `field` of row `id`.
    ///
    /// When this edit takes the last row from incomplete to complete, one blank
    /// row is appended so there is always an open row at the end.
    pub fn update(&mut self, id: RowId, field: Field, raw: &str) -> Result<(), EngineError> {
        let idx = self.index_of(id)?;
        let is_last = idx + 1 == self.rows.len();
        let was_valid = is_valid(&self.rows[idx]);

        self.rows[idx].set_field(field, parse_raw(raw));

        if is_last && !was_valid && is_valid(&self.rows[idx]) {
            let opened = self.append();
            tracing::trace!(row = %id, opened = %opened, "last row completed; appended open row");
        }
        Ok(())
    }

    pub fn set_include(&mut self, id: RowId, included: bool) -> Result<(), EngineError> {
        let idx = self.index_of(id)?;
        self.rows[idx].include_in_fit = included;
        Ok(())
    }

    /// Remove row `id`. Returns `Ok(false)` without touching anything when it
    /// is the only row left.
    pub fn remove(&mut self, id: RowId) -> Result<bool, EngineError> {
        let idx = self.index_of(id)?;
        if self.rows.len() <= 1 {
            return Ok(false);
        }
        self.rows.remove(idx);
        Ok(true)
    }

    pub fn get(&self, id: RowId) -> Option<&MeasurementRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    /// Owned copy of the current rows for one computation cycle.
    pub fn snapshot(&self) -> Vec<MeasurementRow> {
        self.rows.clone()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Id of the row at `position` (0-based), if any.
    pub fn id_at(&self, position: usize) -> Option<RowId> {
        self.rows.get(position).map(|r| r.id)
    }

    pub fn last_id(&self) -> RowId {
        // The store is never empty; fall back to the next id only to stay total.
        self.rows.last().map_or(RowId(self.next_id), |r| r.id)
    }

    fn index_of(&self, id: RowId) -> Result<usize, EngineError> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::UnknownRow(id))
    }
}
