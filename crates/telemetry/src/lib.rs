//! Tracing subscriber bootstrap shared by the seeder binaries.

use anyhow::Context;
use saboga_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, otherwise from the configured level.
fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => level_filter(&settings.log_level),
    }
}

fn level_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))
}

/// Install the global subscriber. Output goes to stderr so stdout stays free
/// for machine-readable command output.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        // already installed by the host process
        tracing::debug!(target: "saboga-telemetry", "global subscriber already set");
    }

    tracing::debug!(
        target: "saboga-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}
