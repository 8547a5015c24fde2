//! Tracing setup: console layer plus optional JSON-lines file sink.

use std::path::Path;

use eyre::WrapErr;
use injector_config::Logging;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::FILE_GUARD;

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, json: bool, cfg: &Logging) -> eyre::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_pretty = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let file_layer = match &cfg.file {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {:?} has no file name", path))?;
            let appender = match cfg.rotation.as_deref().map(str::to_ascii_lowercase).as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}
