//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! parser and stream driver produce:
//!     → tracing events (state transitions, reads, errors)
//!     → per-stream spans carrying a stream_id
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
