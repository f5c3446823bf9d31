//! Validation middleware.
//!
//! A [`ValidateLayer`] wraps a route (or router) so that every request is
//! decoded into a fresh `T`, checked against the rule engine, and published
//! for the handler before the handler runs. Any failure short-circuits with
//! the error policy's response and the wrapped service is never called.

use std::any::type_name;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use tower::{Layer, Service};

use crate::decode;
use crate::error::Rejection;
use crate::http::extract;
use crate::observability::metrics::{self, Outcome};
use crate::settings::Settings;
use crate::source::{IntoSource, Source};
use crate::validation::Schema;

/// Decode and validate a `T` from `source` using default settings.
///
/// # Panics
///
/// When `source` is a textual tag naming no known source.
pub fn validate<T>(source: impl IntoSource) -> ValidateLayer<T>
where
    T: DeserializeOwned + Schema,
{
    ValidateLayer::new(Settings::default(), source)
}

/// [`Layer`] producing [`ValidateService`]s.
pub struct ValidateLayer<T> {
    settings: Settings,
    source: Source,
    _schema: PhantomData<fn() -> T>,
}

impl<T> ValidateLayer<T> {
    pub fn new(settings: Settings, source: impl IntoSource) -> Self {
        Self {
            settings,
            source: source.into_source(),
            _schema: PhantomData,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

impl<T> Clone for ValidateLayer<T> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            source: self.source,
            _schema: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ValidateLayer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateLayer")
            .field("source", &self.source)
            .field("schema", &type_name::<T>())
            .finish()
    }
}

impl<S, T> Layer<S> for ValidateLayer<T> {
    type Service = ValidateService<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidateService {
            inner,
            gate: self.clone(),
        }
    }
}

/// Service running the decode → validate → publish pipeline in front of `S`.
pub struct ValidateService<S, T> {
    inner: S,
    gate: ValidateLayer<T>,
}

impl<S: Clone, T> Clone for ValidateService<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<S, T> Service<Request> for ValidateService<S, T>
where
    S: Service<Request, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
    T: DeserializeOwned + Schema,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send + 'static>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The clone may not be ready; keep the one that was polled.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let gate = self.gate.clone();

        Box::pin(async move { Ok(run(gate, inner, req).await) })
    }
}

async fn run<S, T>(gate: ValidateLayer<T>, mut inner: S, req: Request) -> Response
where
    S: Service<Request, Error = Infallible>,
    S::Response: IntoResponse,
    T: DeserializeOwned + Schema,
{
    let started = Instant::now();
    let source = gate.source;

    match process::<T>(&gate.settings, source, req).await {
        Ok(req) => {
            metrics::record(source, Outcome::Published, started);
            tracing::trace!(%source, schema = type_name::<T>(), "request validated");
            match inner.call(req).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
        Err(rejection) => {
            let outcome = match rejection {
                Rejection::Decode(_) => Outcome::DecodeFailed,
                Rejection::Validation(_) => Outcome::ValidationFailed,
            };
            metrics::record(source, outcome, started);
            tracing::debug!(
                %source,
                schema = type_name::<T>(),
                kind = rejection.kind().as_str(),
                error = %rejection,
                "request rejected"
            );
            gate.settings.reject(&rejection)
        }
    }
}

async fn process<T>(settings: &Settings, source: Source, req: Request) -> Result<Request, Rejection>
where
    T: DeserializeOwned + Schema,
{
    let (value, mut req) = decode::decode::<T>(source, req, settings.body_limit()).await?;
    settings.check(&value)?;
    extract::publish(req.extensions_mut(), source, value);
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ValidatedExt;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Page {
        #[validate(range(min = 1))]
        page: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/items",
            get(|req: Request| async move { req.validated::<Page>(Source::Query).page.to_string() })
                .route_layer(validate::<Page>(Source::Query)),
        )
    }

    async fn get_status(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_request_reaches_handler() {
        assert_eq!(get_status("/items?page=4").await, (StatusCode::OK, "4".into()));
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let (status, body) = get_status("/items?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("page"));

        let (status, _) = get_status("/items?page=x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_layer_source_from_tag() {
        let layer = validate::<Page>("json");
        assert_eq!(layer.source(), Source::Json);
    }
}
