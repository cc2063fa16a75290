use std::{fs, fs::File, sync::Mutex};

use color_eyre::eyre::{Result, WrapErr};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::{log_file_path, LogConfig, LogDestination};

/// Installs the global tracing subscriber. The file destination is the
/// default so log lines do not fight the alternate screen; set
/// `log.destination` to `console` or `both` when running detached.
pub fn init(config: &LogConfig) -> Result<()> {
    if !config.enable {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = matches!(
        config.destination,
        LogDestination::Console | LogDestination::Both
    )
    .then(|| fmt::layer().with_writer(std::io::stderr));

    let file = matches!(
        config.destination,
        LogDestination::File | LogDestination::Both
    )
    .then(|| -> Result<_> {
        let path = log_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)
            .wrap_err_with(|| format!("could not open {}", path.display()))?;
        Ok(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    })
    .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(console)
        .with(file)
        .init();

    Ok(())
}
