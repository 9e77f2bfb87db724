//! Structured logging with JSON or pretty output.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Initialize the logging subsystem.
///
/// Installs a JSON or pretty fmt layer filtered by `RUST_LOG` when set, by
/// the configured log level otherwise.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config, std::env::var("RUST_LOG").ok().as_deref())?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Filter from `env` (the `RUST_LOG` value) if non-empty, from the
/// configured level otherwise.
fn build_filter(config: &TelemetryConfig, env: Option<&str>) -> Result<EnvFilter, TelemetryError> {
    let directives = match env {
        Some(env) if !env.trim().is_empty() => env,
        _ => config.log_level.as_str(),
    };
    EnvFilter::try_new(directives).map_err(|e| {
        TelemetryError::LoggingInit(format!("invalid log filter {:?}: {}", directives, e))
    })
}

/// Standard log event names.
pub mod events {
    /// A design evaluation run started.
    pub const EVALUATION_STARTED: &str = "evaluation_started";

    /// A pipeline stage (build, prepare, validate) finished.
    pub const STAGE_COMPLETED: &str = "stage_completed";

    /// A builder call reported a structural error.
    pub const STRUCTURAL_ERROR: &str = "structural_error";

    /// Validation found a problem in the finished tree.
    pub const VALIDATION_FAILURE: &str = "validation_failure";

    /// The evaluation run was aborted.
    pub const EVALUATION_ABORTED: &str = "evaluation_aborted";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_evaluation_started {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::EVALUATION_STARTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_stage_completed {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STAGE_COMPLETED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_structural_error {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::STRUCTURAL_ERROR,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_failure {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::VALIDATION_FAILURE,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_evaluation_aborted {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::EVALUATION_ABORTED,
            $($field)*
        )
    };
}
