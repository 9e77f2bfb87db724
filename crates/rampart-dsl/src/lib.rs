//! Builder DSL for Rampart API designs.
//!
//! A design is a sequence of top-level declarations. Each one receives the
//! [`Eval`] of the run and nests builder calls from [`dsl`]; the [`Design`]
//! pipeline then prepares and validates the resulting tree, collecting every
//! diagnostic along the way.
//!
//! Stage events go through `tracing`; install a subscriber with
//! [`rampart_telemetry::Telemetry::init`] to see them.
//!
//! ```ignore
//! use rampart_dsl::{dsl::*, run, EvalOptions};
//! use rampart_telemetry::{LogFormat, Telemetry, TelemetryConfig};
//!
//! Telemetry::init(TelemetryConfig::new().with_log_format(LogFormat::Pretty))?;
//! let root = run(EvalOptions::default(), |e| {
//!     service(e, "users", |e| {
//!         path(e, "/users");
//!         method(e, "show", |e| get(e, "/{id}"));
//!     })
//! });
//! ```

pub mod dsl;
pub mod eval;
pub mod options;
pub mod pipeline;

pub use eval::{Dsl, Eval, Outcome, TOP_LEVEL};
pub use options::{ConfigError, EvalOptions, DEFAULT_MAX_DEPTH};
pub use pipeline::{run, Built, Design, Prepared, Validated};

pub use rampart_expr;
