mod cli;
mod error_fmt;
mod logging;
mod render;
mod script;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use injector_config::Config;
use injector_core::{Calibrator, ChartOptions, DisplayPrecision, Field};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    let cfg = injector_config::load_toml(&content)
        .map_err(|e| eyre::eyre!("invalid config {}: {e}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    logging::init(&level, cli.json, &cfg.logging)?;

    let precision: DisplayPrecision = (&cfg.display).into();
    let chart: ChartOptions = (&cfg.chart).into();

    match cli.cmd {
        Commands::Characterize { data, exclude } => {
            let rows = injector_config::load_rows_csv(&data)?;
            tracing::info!(rows = rows.len(), path = %data.display(), "loaded rows");
            let mut cal = Calibrator::from_raw_rows(&rows, chart)?;
            for n in exclude {
                // Seeded rows occupy positions 0..rows.len() in CSV order
                let id = n
                    .checked_sub(1)
                    .filter(|&p| p < rows.len())
                    .and_then(|p| cal.store().id_at(p))
                    .ok_or_else(|| {
                        eyre::eyre!("--exclude {n}: no such row (CSV has {} rows)", rows.len())
                    })?;
                cal.set_include(id, false)?;
            }
            let rep = cal.report();
            tracing::info!(
                included = rep.summary.included_rows,
                deadtime_ms = rep.summary.deadtime_ms,
                flow_g_per_s = rep.summary.flow_rate_g_per_s,
                "characterization complete"
            );
            if cli.json {
                println!("{}", render::report_json(&rep));
            } else {
                print!("{}", render::table(&rep, precision));
            }
        }
        Commands::Session => {
            let mut cal = Calibrator::new().with_chart_options(chart);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let rejected = script::run(stdin.lock(), &mut cal, precision, cli.json, &mut stdout)?;
            if rejected > 0 {
                tracing::warn!(rejected, "session finished with rejected lines");
            }
        }
        Commands::SelfCheck => self_check(chart, precision, cli.json)?,
    }
    Ok(())
}

/// Reference calibration: 2 mg and 6 mg per pulse at 2 ms and 4 ms.
fn self_check(chart: ChartOptions, precision: DisplayPrecision, json: bool) -> eyre::Result<()> {
    let mut cal = Calibrator::new().with_chart_options(chart);
    for (pw, mass) in [("2", "0.02"), ("4", "0.06")] {
        let id = cal.store().last_id();
        cal.update(id, Field::Injections, "10")?;
        cal.update(id, Field::PulseWidthMs, pw)?;
        cal.update(id, Field::TotalMassG, mass)?;
    }
    let s = cal.report().summary;
    let ok = (s.flow_rate_g_per_s - 2.0).abs() < 1e-9 && (s.deadtime_ms - 1.0).abs() < 1e-9;
    if !ok {
        eyre::bail!(
            "self-check failed: flow {} g/s, deadtime {} ms",
            s.flow_rate_g_per_s,
            s.deadtime_ms
        );
    }
    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "summary": render::summary_json(&s) })
        );
    } else {
        println!("self-check ok");
        print!("{}", render::summary(&s, precision));
    }
    Ok(())
}
