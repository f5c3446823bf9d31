//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0, error statuses are 4xx/5xx)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::GateConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("body.limit_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("{field} must be a 4xx or 5xx status, got {status}")]
    Status { field: &'static str, status: u16 },

    #[error("server.bind_address must not be empty")]
    EmptyBindAddress,
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.body.limit_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    check_status(&mut errors, "errors.status", config.errors.status);
    if let Some(status) = config.errors.validation_status {
        check_status(&mut errors, "errors.validation_status", status);
    }

    if config.server.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_status(errors: &mut Vec<ValidationError>, field: &'static str, status: u16) {
    if !(400..=599).contains(&status) {
        errors.push(ValidationError::Status { field, status });
    }
}
