//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "injector",
    version,
    about = "Characterize fuel injectors from calibration runs"
)]
pub struct Cli {
    /// Path to config TOML (optional; defaults apply when absent)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit reports and errors as JSON instead of tables
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a CSV of calibration runs and print the characterization
    Characterize {
        /// Rows CSV (headers: injections,pulse_width_ms,total_mass_g[,include])
        #[arg(long, value_name = "FILE")]
        data: PathBuf,
        /// Leave a row out of the fit (1-based CSV row number); repeatable
        #[arg(long, value_name = "ROW")]
        exclude: Vec<usize>,
    },
    /// Apply an edit script from stdin, one command per line
    #[command(long_about = "Apply an edit script read from stdin.\n\n\
        Commands:\n  append\n  set <id> <field> [value]\n  include <id> on|off\n  remove <id>\n  show\n\n\
        Fields: injections, pulse_width_ms, total_mass_g. An empty value clears the field.\n\
        Lines starting with '#' are comments. The final table is printed at end of input.\n\
        With --json, each `show` and the final report are printed as one JSON document per line.")]
    Session,
    /// Run the built-in reference calibration and report the result
    SelfCheck,
}
