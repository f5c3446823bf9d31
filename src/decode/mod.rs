//! Decode dispatching.
//!
//! # Data Flow
//! ```text
//! Request + Source
//!     → content-type check (body sources only)
//!     → body read, capped by the body limit (body sources only)
//!     → normalize::* (source-specific)  → FieldMap
//!     → de.rs (structural decode)        → fresh T
//! ```
//!
//! # Design Decisions
//! - A new `T` is built for every call; nothing is cached across requests
//! - The first error aborts; a partially decoded value is never returned
//! - Buffered bodies are put back on the request for downstream handlers

pub mod de;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::normalize::{json, params, urlencoded, xml};
use crate::source::Source;

pub use de::{from_field_map, FieldError};

/// Default cap on buffered request bodies: 1 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Decode a fresh `T` from the given source of `req`.
///
/// Returns the decoded value together with the request, whose body is still
/// readable when the source consumed it.
pub async fn decode<T: DeserializeOwned>(
    source: Source,
    req: Request,
    body_limit: usize,
) -> Result<(T, Request), DecodeError> {
    let (mut parts, mut body) = req.into_parts();

    if source.reads_body() {
        check_content_type(source, &parts.headers)?;
    }

    let fields = match source {
        Source::Params => params::from_parts(&mut parts).await?,
        Source::Query => urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())?,
        Source::Form => urlencoded::parse(&read_body(&mut body, body_limit).await?)?,
        Source::Json => json::flatten(&read_body(&mut body, body_limit).await?)?,
        Source::Xml => xml::flatten(&read_body(&mut body, body_limit).await?)?,
    };

    let value = from_field_map(&fields)?;
    Ok((value, Request::from_parts(parts, body)))
}

/// Buffer the body, leaving a replayable copy in its place.
async fn read_body(body: &mut Body, limit: usize) -> Result<Bytes, DecodeError> {
    let bytes = axum::body::to_bytes(std::mem::take(body), limit)
        .await
        .map_err(DecodeError::Body)?;
    *body = Body::from(bytes.clone());
    Ok(bytes)
}

/// A declared content type must match a body source; an absent one is accepted.
fn check_content_type(source: Source, headers: &HeaderMap) -> Result<(), DecodeError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(());
    };
    let found = value.to_str().unwrap_or_default();
    let mime = found
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let (expected, accepted) = match source {
        Source::Params | Source::Query => return Ok(()),
        Source::Form => (
            "application/x-www-form-urlencoded",
            mime == "application/x-www-form-urlencoded",
        ),
        Source::Json => (
            "application/json",
            mime == "application/json" || mime.ends_with("+json"),
        ),
        Source::Xml => (
            "application/xml",
            mime == "application/xml" || mime == "text/xml" || mime.ends_with("+xml"),
        ),
    };

    if accepted {
        Ok(())
    } else {
        Err(DecodeError::ContentType {
            expected,
            found: found.to_string(),
        })
    }
}
