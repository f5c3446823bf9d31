//! Error policies: turning a [`Rejection`] into a response.
//!
//! # Design Decisions
//! - Decode and validation failures go through the same policy
//! - The default mirrors a bare `400 Bad Request` with the description as body
//! - Any `Fn(&Rejection) -> Response` is a policy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{DecodeError, FailureKind, Rejection};
use crate::validation::Violation;

/// Produces the response sent when a request is rejected.
pub trait ErrorPolicy: Send + Sync + 'static {
    fn handle(&self, rejection: &Rejection) -> Response;
}

impl<F> ErrorPolicy for F
where
    F: Fn(&Rejection) -> Response + Send + Sync + 'static,
{
    fn handle(&self, rejection: &Rejection) -> Response {
        self(rejection)
    }
}

/// Status codes per failure origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Statuses {
    decode: StatusCode,
    validation: StatusCode,
}

impl Statuses {
    fn for_kind(&self, kind: FailureKind) -> StatusCode {
        match kind {
            FailureKind::Decode => self.decode,
            FailureKind::Validation => self.validation,
        }
    }
}

impl Default for Statuses {
    fn default() -> Self {
        Self {
            decode: StatusCode::BAD_REQUEST,
            validation: StatusCode::BAD_REQUEST,
        }
    }
}

/// Default policy: the description as a `text/plain` body.
#[derive(Debug, Clone, Default)]
pub struct PlainText {
    statuses: Statuses,
}

impl PlainText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `status` for every rejection.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.statuses = Statuses {
            decode: status,
            validation: status,
        };
        self
    }

    /// Use `status` for validation failures only.
    pub fn with_validation_status(mut self, status: StatusCode) -> Self {
        self.statuses.validation = status;
        self
    }
}

impl ErrorPolicy for PlainText {
    fn handle(&self, rejection: &Rejection) -> Response {
        let status = self.statuses.for_kind(rejection.kind());
        (status, rejection.description()).into_response()
    }
}

/// Structured policy:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "fields": [{ "field": "profile.email", "code": "email" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonBody {
    statuses: Statuses,
}

#[derive(Serialize)]
struct ErrorWrapper<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
    fields: Vec<FieldEntry<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum FieldEntry<'a> {
    Violation(&'a Violation),
    Decode {
        field: String,
        code: &'static str,
        message: &'a str,
    },
}

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.statuses = Statuses {
            decode: status,
            validation: status,
        };
        self
    }

    pub fn with_validation_status(mut self, status: StatusCode) -> Self {
        self.statuses.validation = status;
        self
    }
}

impl ErrorPolicy for JsonBody {
    fn handle(&self, rejection: &Rejection) -> Response {
        let kind = rejection.kind();
        let (message, fields) = match rejection {
            Rejection::Validation(violations) => (
                "Validation failed".to_string(),
                violations.iter().map(FieldEntry::Violation).collect(),
            ),
            Rejection::Decode(DecodeError::Field(e)) if e.path().iter().next().is_some() => (
                rejection.description(),
                vec![FieldEntry::Decode {
                    field: e.path().to_string(),
                    code: "decode",
                    message: e.inner().message(),
                }],
            ),
            Rejection::Decode(_) => (rejection.description(), Vec::new()),
        };

        let body = ErrorWrapper {
            error: ErrorBody {
                error_type: kind.as_str(),
                message,
                fields,
            },
        };
        (self.statuses.for_kind(kind), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{self, Rules};
    use validator::Validate;

    #[derive(Validate)]
    struct Contact {
        #[validate(email)]
        email: String,
    }

    fn validation_rejection() -> Rejection {
        let contact = Contact {
            email: "nope".into(),
        };
        Rejection::Validation(validation::check(&Rules::new(), &contact).unwrap_err())
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_plain_text_default() {
        let response = PlainText::new().handle(&validation_rejection());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, "email: email");
    }

    #[tokio::test]
    async fn test_plain_text_statuses() {
        let policy = PlainText::new()
            .with_status(StatusCode::NOT_FOUND)
            .with_validation_status(StatusCode::UNPROCESSABLE_ENTITY);
        let decode = Rejection::Decode(DecodeError::Xml("boom".into()));

        assert_eq!(policy.handle(&decode).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            policy.handle(&validation_rejection()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_json_body_validation() {
        let policy = JsonBody::new().with_validation_status(StatusCode::UNPROCESSABLE_ENTITY);
        let response = policy.handle(&validation_rejection());
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["error"]["type"], "validation_error");
        assert_eq!(body["error"]["fields"][0]["field"], "email");
        assert_eq!(body["error"]["fields"][0]["code"], "email");
    }

    #[tokio::test]
    async fn test_json_body_decode() {
        let rejection = Rejection::Decode(DecodeError::JsonShape("expected an object"));
        let response = JsonBody::new().handle(&rejection);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["error"]["type"], "decode_error");
        assert_eq!(body["error"]["message"], "invalid JSON: expected an object");
        assert_eq!(body["error"]["fields"], serde_json::json!([]));
    }
}
