//! Request validation middleware for axum.
//!
//! A [`ValidateLayer`] decodes one part of an incoming request (path
//! parameters, query string, form body, JSON body or XML body) into a fresh
//! instance of a user-declared schema type, runs the schema's rules, and
//! either publishes the validated value for the handler or rejects the request
//! through a replaceable error policy.
//!
//! ```text
//!  request ──▶ decode (source) ──▶ validate (rule engine) ──▶ publish ──▶ handler
//!                  │                       │
//!                  └──── DecodeFailed ─────┴── ValidationFailed ──▶ error policy ──▶ response
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod normalize;
pub mod observability;
pub mod policy;
pub mod settings;
pub mod source;
pub mod validation;

pub use config::GateConfig;
pub use error::{DecodeError, FailureKind, Rejection};
pub use http::{try_validated, validate, validated, ValidateLayer, ValidateService, ValidatedExt};
pub use normalize::FieldMap;
pub use policy::{ErrorPolicy, JsonBody, PlainText};
pub use settings::{Settings, SettingsBuilder};
pub use source::{IntoSource, Source, UnknownSource};
pub use validation::{RuleEngine, Rules, Schema, Violation, Violations};
