//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → Settings::from_config / observability::logging::init
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal (even empty) configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Runtime changes go through `Settings`, not through reloading the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_toml_str, load_config, ConfigError};
pub use schema::GateConfig;
