#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and measurement-row loading for the injector tools.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - The row CSV loader enforces headers and keeps every cell as raw text,
//!   so bad cells reach the engine exactly like bad keystrokes would.
use serde::Deserialize;

/// One measurement row as loaded, before any numeric parsing.
///
/// Expected headers:
/// injections,pulse_width_ms,total_mass_g[,include]
///
/// Example:
/// injections,pulse_width_ms,total_mass_g,include
/// 1000,2.0,0.02,true
/// 1000,4.0,0.06,
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub injections: String,
    pub pulse_width_ms: String,
    pub total_mass_g: String,
    /// `None` when the column is absent or blank (treated as included).
    pub include: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    injections: String,
    pulse_width_ms: String,
    total_mass_g: String,
    #[serde(default)]
    include: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayCfg {
    /// Decimal places for the summary and main metric columns
    pub decimals: usize,
    /// Decimal places for modeled pulse width and small-pulse adder
    pub small_pulse_decimals: usize,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            decimals: 1,
            small_pulse_decimals: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChartCfg {
    /// Extend the fitted-line series down to the deadtime (zero mass) point
    pub extend_to_deadtime: bool,
}

impl Default for ChartCfg {
    fn default() -> Self {
        Self {
            extend_to_deadtime: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayCfg,
    pub chart: ChartCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

const MAX_DECIMALS: usize = 9;
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const ROTATIONS: [&str; 3] = ["never", "daily", "hourly"];

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Display
        if self.display.decimals > MAX_DECIMALS {
            eyre::bail!("display.decimals must be <= {MAX_DECIMALS}");
        }
        if self.display.small_pulse_decimals > MAX_DECIMALS {
            eyre::bail!("display.small_pulse_decimals must be <= {MAX_DECIMALS}");
        }

        // Logging
        if let Some(level) = &self.logging.level {
            if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                eyre::bail!("logging.level must be one of {}", LEVELS.join("|"));
            }
        }
        if let Some(rotation) = &self.logging.rotation {
            if !ROTATIONS.contains(&rotation.to_ascii_lowercase().as_str()) {
                eyre::bail!("logging.rotation must be one of {}", ROTATIONS.join("|"));
            }
        }
        if let Some(file) = &self.logging.file {
            if file.trim().is_empty() {
                eyre::bail!("logging.file must not be empty when set");
            }
        }

        Ok(())
    }
}

fn parse_include(cell: Option<&str>, line: usize) -> eyre::Result<Option<bool>> {
    let Some(cell) = cell else {
        return Ok(None);
    };
    match cell.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "yes" | "y" | "1" | "on" => Ok(Some(true)),
        "false" | "no" | "n" | "0" | "off" => Ok(Some(false)),
        other => eyre::bail!("invalid include value {other:?} on CSV line {line}"),
    }
}

/// Read measurement rows from a CSV file with strict headers.
pub fn load_rows_csv(path: &std::path::Path) -> eyre::Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open rows CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["injections", "pulse_width_ms", "total_mass_g"];
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    let ok = actual == expected
        || (actual.len() == 4 && actual[..3] == expected && actual[3] == "include");
    if !ok {
        eyre::bail!(
            "rows CSV must have headers 'injections,pulse_width_ms,total_mass_g[,include]', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<CsvRow>().enumerate() {
        let line = idx + 2;
        match rec {
            Ok(row) => rows.push(RawRow {
                include: parse_include(row.include.as_deref(), line)?,
                injections: row.injections,
                pulse_width_ms: row.pulse_width_ms,
                total_mass_g: row.total_mass_g,
            }),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", line, e);
            }
        }
    }

    Ok(rows)
}
