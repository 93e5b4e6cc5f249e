//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Stream driver and buffer settings.
    pub parser: ParserConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// What to do when the byte source ends before the request is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EofPolicy {
    /// Any truncation is an error.
    #[default]
    Strict,
    /// Accept a request whose header section was cut short.
    Lenient,
}

/// Stream driver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Starting capacity of the accumulation buffer in bytes.
    pub initial_buffer_capacity: usize,

    /// Maximum bytes requested from the source per read.
    pub read_chunk_size: usize,

    /// Upper bound on read-but-unconsumed bytes (longest single line).
    pub max_buffered_bytes: usize,

    /// Handling of end-of-stream before `Done`.
    pub eof_policy: EofPolicy,

    /// Per-read timeout for the async driver, in milliseconds.
    pub read_timeout_ms: Option<u64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: 8,
            read_chunk_size: 8,
            max_buffered_bytes: 64 * 1024,
            eof_policy: EofPolicy::Strict,
            read_timeout_ms: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Multi-line human readable output instead of compact lines.
    pub pretty: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: false,
        }
    }
}
