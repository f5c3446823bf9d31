//! Failure records.
//!
//! Decode and validation failures travel through one channel, [`Rejection`],
//! which is what the error policy receives. [`FailureKind`] tells them apart
//! for policies that want different responses per origin.

use thiserror::Error;

use crate::decode::de::FieldError;
use crate::validation::Violations;

/// Malformed or type-incompatible input.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid url-encoded data: {0}")]
    UrlEncoded(String),

    #[error("expected content type `{expected}`, found `{found}`")]
    ContentType {
        expected: &'static str,
        found: String,
    },

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON: {0}")]
    JsonShape(&'static str),

    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("invalid path parameter: {0}")]
    PathParam(String),

    #[error("field `{0}` is both a value and a group of fields")]
    Conflict(String),

    #[error(transparent)]
    Field(#[from] serde_path_to_error::Error<FieldError>),
}

/// Origin of a [`Rejection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Decode,
    Validation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Decode => "decode_error",
            FailureKind::Validation => "validation_error",
        }
    }
}

/// Why a request did not reach its handler.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] Violations),
}

impl Rejection {
    pub fn kind(&self) -> FailureKind {
        match self {
            Rejection::Decode(_) => FailureKind::Decode,
            Rejection::Validation(_) => FailureKind::Validation,
        }
    }

    /// Human-readable description, as sent by the default policy.
    pub fn description(&self) -> String {
        self.to_string()
    }
}
