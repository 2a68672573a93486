//! # scorecard-telemetry
//!
//! Structured logging for the scorecard evaluation engine.
//!
//! ## Usage
//!
//! ```rust
//! use scorecard_telemetry::{init_telemetry, case_run_span, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     init_telemetry("agent-eval")?;
//!
//!     let span = case_run_span("case_001");
//!     let _enter = span.enter();
//!     info!("scoring case");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use init::{init_json_telemetry, init_telemetry};
pub use spans::*;
