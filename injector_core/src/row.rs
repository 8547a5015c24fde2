//! Measurement rows and the validity predicate.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Stable row identifier. Assigned once by the store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub(crate) u64);

impl RowId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Parses the decimal form printed by `Display`, for front ends that echo ids back.
impl FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable numeric fields of a measurement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Injections,
    PulseWidthMs,
    TotalMassG,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Injections, Self::PulseWidthMs, Self::TotalMassG];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Injections => "injections",
            Self::PulseWidthMs => "pulse_width_ms",
            Self::TotalMassG => "total_mass_g",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = EngineError;

    /// Accepts both the snake_case names and the camelCase form-field names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "injections" => Ok(Self::Injections),
            "pulse_width_ms" | "pulseWidthMs" => Ok(Self::PulseWidthMs),
            "total_mass_g" | "totalMassG" => Ok(Self::TotalMassG),
            other => Err(EngineError::UnknownField(other.to_string())),
        }
    }
}

/// One calibration data point as entered by the user.
///
/// `None` means the field was never entered (or was cleared). `Some(NaN)` means
/// the entered text did not parse; both count as missing for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub id: RowId,
    pub injections: Option<f64>,
    pub pulse_width_ms: Option<f64>,
    pub total_mass_g: Option<f64>,
    pub include_in_fit: bool,
}

impl MeasurementRow {
    pub(crate) const fn blank(id: RowId) -> Self {
        Self {
            id,
            injections: None,
            pulse_width_ms: None,
            total_mass_g: None,
            include_in_fit: true,
        }
    }

    pub const fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::Injections => self.injections,
            Field::PulseWidthMs => self.pulse_width_ms,
            Field::TotalMassG => self.total_mass_g,
        }
    }

    pub(crate) fn set_field(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::Injections => self.injections = value,
            Field::PulseWidthMs => self.pulse_width_ms = value,
            Field::TotalMassG => self.total_mass_g = value,
        }
    }
}

/// Parse raw user text into a stored field value.
///
/// Blank text clears the field. Anything else that is not a float is kept as NaN.
pub fn parse_raw(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
}

#[inline]
fn usable(v: Option<f64>) -> bool {
    matches!(v, Some(x) if x.is_finite() && x != 0.0)
}

/// True iff all three numeric fields are present, finite and non-zero.
pub fn is_valid(row: &MeasurementRow) -> bool {
    usable(row.injections) && usable(row.pulse_width_ms) && usable(row.total_mass_g)
}

/// A row that passed [`is_valid`], with plain numeric fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRow {
    pub id: RowId,
    pub injections: f64,
    pub pulse_width_ms: f64,
    pub total_mass_g: f64,
    pub include_in_fit: bool,
}

impl TryFrom<&MeasurementRow> for ValidRow {
    type Error = EngineError;

    fn try_from(row: &MeasurementRow) -> Result<Self, Self::Error> {
        if !is_valid(row) {
            return Err(EngineError::IncompleteRow(row.id));
        }
        match (row.injections, row.pulse_width_ms, row.total_mass_g) {
            (Some(injections), Some(pulse_width_ms), Some(total_mass_g)) => Ok(Self {
                id: row.id,
                injections,
                pulse_width_ms,
                total_mass_g,
                include_in_fit: row.include_in_fit,
            }),
            _ => Err(EngineError::IncompleteRow(row.id)),
        }
    }
}
