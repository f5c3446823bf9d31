//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Validation middleware produces:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (outcome counters, decode+validate latency)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for machines)
//!     → whatever `metrics` recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics recorder; without one every
//!   update is a no-op
//! - Subscriber installation is the binary's job, not the library's

pub mod logging;
pub mod metrics;
