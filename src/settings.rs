//! Shared, swappable settings for validation layers.
//!
//! # Responsibilities
//! - Hold the error policy and rule engine every layer built from it uses
//! - Allow replacing either one at runtime without locks
//!
//! # Design Decisions
//! - Settings are injected into layers, never read from process globals
//! - Policy and engine live in `ArcSwap` cells: a replacement is atomic and
//!   the last write wins for all later requests
//! - Cloning a `Settings` shares the same cells

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::StatusCode;
use axum::response::Response;
use serde::de::DeserializeOwned;

use crate::config::schema::{ErrorFormat, ErrorsConfig, GateConfig};
use crate::decode::DEFAULT_BODY_LIMIT;
use crate::error::Rejection;
use crate::http::ValidateLayer;
use crate::policy::{ErrorPolicy, JsonBody, PlainText};
use crate::source::IntoSource;
use crate::validation::{self, RuleEngine, Rules, Schema, Violations};

struct Inner {
    policy: ArcSwap<Box<dyn ErrorPolicy>>,
    engine: ArcSwap<Box<dyn RuleEngine>>,
    body_limit: usize,
}

/// Handle to the configuration shared by a set of validation layers.
#[derive(Clone)]
pub struct Settings {
    inner: Arc<Inner>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Build settings from a loaded configuration file.
    pub fn from_config(config: &GateConfig) -> Self {
        Self::builder()
            .body_limit(config.body.limit_bytes)
            .boxed_error_policy(policy_for(&config.errors))
            .build()
    }

    /// Replace the error policy for every layer sharing these settings.
    pub fn set_error_policy(&self, policy: impl ErrorPolicy) {
        let policy: Box<dyn ErrorPolicy> = Box::new(policy);
        self.inner.policy.store(Arc::new(policy));
        tracing::debug!("error policy replaced");
    }

    /// Replace the rule engine for every layer sharing these settings.
    pub fn set_rule_engine(&self, engine: impl RuleEngine) {
        let engine: Box<dyn RuleEngine> = Box::new(engine);
        self.inner.engine.store(Arc::new(engine));
        tracing::debug!("rule engine replaced");
    }

    pub fn body_limit(&self) -> usize {
        self.inner.body_limit
    }

    /// Middleware decoding and validating a `T` from `source`.
    ///
    /// # Panics
    ///
    /// When `source` is a textual tag naming no known source.
    pub fn layer<T>(&self, source: impl IntoSource) -> ValidateLayer<T>
    where
        T: DeserializeOwned + Schema,
    {
        ValidateLayer::new(self.clone(), source)
    }

    pub(crate) fn check<T: Schema>(&self, instance: &T) -> Result<(), Violations> {
        let engine = self.inner.engine.load();
        validation::check(&***engine, instance)
    }

    pub(crate) fn reject(&self, rejection: &Rejection) -> Response {
        let policy = self.inner.policy.load();
        (***policy).handle(rejection)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("body_limit", &self.inner.body_limit)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Settings`].
pub struct SettingsBuilder {
    policy: Option<Box<dyn ErrorPolicy>>,
    engine: Option<Box<dyn RuleEngine>>,
    body_limit: usize,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            policy: None,
            engine: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl SettingsBuilder {
    pub fn error_policy(self, policy: impl ErrorPolicy) -> Self {
        self.boxed_error_policy(Box::new(policy))
    }

    fn boxed_error_policy(mut self, policy: Box<dyn ErrorPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn rule_engine(mut self, engine: impl RuleEngine) -> Self {
        let engine: Box<dyn RuleEngine> = Box::new(engine);
        self.engine = Some(engine);
        self
    }

    /// Cap on buffered form, JSON and XML bodies, in bytes.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn build(self) -> Settings {
        let policy = self
            .policy
            .unwrap_or_else(|| Box::new(PlainText::new()) as Box<dyn ErrorPolicy>);
        let engine = self
            .engine
            .unwrap_or_else(|| Box::new(Rules::new()) as Box<dyn RuleEngine>);

        Settings {
            inner: Arc::new(Inner {
                policy: ArcSwap::from_pointee(policy),
                engine: ArcSwap::from_pointee(engine),
                body_limit: self.body_limit,
            }),
        }
    }
}

fn policy_for(errors: &ErrorsConfig) -> Box<dyn ErrorPolicy> {
    let status = StatusCode::from_u16(errors.status).unwrap_or(StatusCode::BAD_REQUEST);
    let validation_status = errors
        .validation_status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(status);

    match errors.format {
        ErrorFormat::Text => Box::new(
            PlainText::new()
                .with_status(status)
                .with_validation_status(validation_status),
        ),
        ErrorFormat::Json => Box::new(
            JsonBody::new()
                .with_status(status)
                .with_validation_status(validation_status),
        ),
    }
}
