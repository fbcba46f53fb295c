//! Tracing bootstrap shared by every Malaeb binary.

use anyhow::Context;
use malaeb_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the configured default filter.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.default_filter))
        .with_context(|| format!("invalid log filter '{}'", settings.default_filter))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.log_format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            )
            .try_init(),
    }
    .context("failed to install tracing subscriber")?;

    tracing::info!(
        target: "malaeb-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}
