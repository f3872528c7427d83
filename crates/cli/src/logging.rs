use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logs to the console (`RUST_LOG`, default `info`) and appends a timestamped
/// copy, including request details, to `log_file`.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let console_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let console_layer = fmt::layer()
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_writer(Mutex::new(file))
        .with_filter(EnvFilter::try_new(
            "info,dirbatch_directory=debug,dirbatch_provisioning=debug",
        )?);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("logging to {}", log_file.display());
    Ok(())
}
