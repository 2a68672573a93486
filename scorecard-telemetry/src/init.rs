//! Subscriber initialization

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console logging for an evaluation process
///
/// Reads the filter from `RUST_LOG` and falls back to `info`. Calling this more
/// than once is a no-op, so test binaries can call it from every test.
///
/// # Example
/// ```
/// use scorecard_telemetry::init_telemetry;
/// init_telemetry("agent-eval").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> InitResult {
    let mut outcome: InitResult = Ok(());
    INIT.call_once(|| {
        outcome = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(Into::into);

        if outcome.is_ok() {
            tracing::info!(service.name = service_name, "Telemetry initialized");
        }
    });
    outcome
}

/// Initialize JSON logging, one object per line
///
/// Intended for CI runs whose output is collected by a log pipeline.
pub fn init_json_telemetry(service_name: &str) -> InitResult {
    let mut outcome: InitResult = Ok(());
    INIT.call_once(|| {
        outcome = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
            .map_err(Into::into);

        if outcome.is_ok() {
            tracing::info!(service.name = service_name, "JSON telemetry initialized");
        }
    });
    outcome
}
