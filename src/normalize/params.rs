//! Route parameters.

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;

use super::FieldMap;
use crate::error::DecodeError;

/// Collect the matched route parameters, one value per name.
///
/// A request that went through no parameterized route yields an empty map;
/// missing keys surface later as decode or validation failures.
pub async fn from_parts(parts: &mut Parts) -> Result<FieldMap, DecodeError> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => Ok(params.iter().collect()),
        Err(RawPathParamsRejection::MissingPathParams(_)) => Ok(FieldMap::new()),
        Err(rejection) => Err(DecodeError::PathParam(rejection.body_text())),
    }
}
