//! Logging and tracing bootstrap.

use marquee_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Filtering honors `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; later calls are ignored.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        tracing::debug!(target: "marquee-telemetry", "tracing subscriber already installed");
    }
}
