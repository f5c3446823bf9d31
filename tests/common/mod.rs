//! Shared schemas and helpers for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, Method, StatusCode};
use axum::routing::{get, MethodRouter};
use axum::Router;
use request_gate::{Settings, Source, ValidatedExt};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
pub struct Profile {
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Schema shared by the query, form, JSON and XML routes.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
pub struct TestSchema {
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(nested)]
    pub profile: Profile,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub follow_ids: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
pub struct ParamsSchema {
    #[validate(range(min = 1))]
    pub id: u64,
}

/// Counts handler invocations.
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Handler echoing the validated `TestSchema` for `source` back as JSON.
pub fn echo(source: Source, calls: Calls) -> MethodRouter {
    axum::routing::any(move |req: Request| {
        calls.hit();
        async move {
            let value = req.validated::<TestSchema>(source);
            axum::Json((*value).clone())
        }
    })
}

/// Router with one route per source, all sharing `settings`.
pub fn router(settings: &Settings, calls: &Calls) -> Router {
    let mut app = Router::new().route(
        "/users/{id}",
        get({
            let calls = calls.clone();
            move |req: Request| {
                calls.hit();
                async move { req.validated::<ParamsSchema>(Source::Params).id.to_string() }
            }
        })
        .route_layer(settings.layer::<ParamsSchema>(Source::Params)),
    );

    for (path, source) in [
        ("/query", Source::Query),
        ("/form", Source::Form),
        ("/json", Source::Json),
        ("/xml", Source::Xml),
    ] {
        app = app.route(
            path,
            echo(source, calls.clone()).layer(settings.layer::<TestSchema>(source)),
        );
    }
    app
}

pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> Reply {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app.oneshot(builder.body(body.into()).unwrap()).await.unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get_uri(app: Router, uri: &str) -> Reply {
    send(app, Method::GET, uri, None, Body::empty()).await
}

pub fn john() -> TestSchema {
    TestSchema {
        id: 123,
        profile: Profile {
            name: "John".into(),
            email: "john@example.com".into(),
        },
        verified: true,
        follow_ids: vec![4, 5],
    }
}
