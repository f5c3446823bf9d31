//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! matched route
//!     → middleware.rs (ValidateService)
//!         → decode::decode      (Decoding → Decoded | DecodeFailed)
//!         → Settings::check     (Validating → Validated | ValidationFailed)
//!         → extract::publish    (Published)
//!     → handler (reads the value back through extract.rs)
//!
//! DecodeFailed | ValidationFailed → error policy → response, handler skipped
//! ```

pub mod extract;
pub mod middleware;

pub use extract::{try_validated, validated, ValidatedExt};
pub use middleware::{validate, ValidateLayer, ValidateService};
