//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sizes > 0, timeout > 0 when set)
//! - Check that the buffer limit can hold at least one read
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let parser = &config.parser;

    if parser.initial_buffer_capacity == 0 {
        errors.push(ValidationError::new(
            "parser.initial_buffer_capacity",
            "must be greater than 0",
        ));
    }
    if parser.read_chunk_size == 0 {
        errors.push(ValidationError::new(
            "parser.read_chunk_size",
            "must be greater than 0",
        ));
    }
    if parser.max_buffered_bytes < parser.read_chunk_size {
        errors.push(ValidationError::new(
            "parser.max_buffered_bytes",
            format!(
                "must be at least read_chunk_size ({})",
                parser.read_chunk_size
            ),
        ));
    }
    if parser.read_timeout_ms == Some(0) {
        errors.push(ValidationError::new(
            "parser.read_timeout_ms",
            "must be greater than 0 when set",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
