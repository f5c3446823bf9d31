//! Input source tags.
//!
//! # Responsibilities
//! - Name the closed set of places request input can come from
//! - Resolve textual tags (wiring code, config) into a [`Source`]
//!
//! # Design Decisions
//! - An unknown textual tag is a wiring mistake, not bad client input:
//!   [`IntoSource`] panics instead of producing a recoverable error
//! - `FromStr` stays fallible for callers that want to check a tag themselves

use std::fmt;
use std::str::FromStr;

/// Where the input for a validation step is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Named segments of the matched route (`/users/{id}`).
    Params,
    /// The URL query string.
    Query,
    /// An `application/x-www-form-urlencoded` body.
    Form,
    /// A JSON object body.
    Json,
    /// An XML document body.
    Xml,
}

impl Source {
    /// All variants, in declaration order.
    pub const ALL: [Source; 5] = [
        Source::Params,
        Source::Query,
        Source::Form,
        Source::Json,
        Source::Xml,
    ];

    /// Canonical tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Params => "Params",
            Source::Query => "Query",
            Source::Form => "Form",
            Source::Json => "JSON",
            Source::Xml => "XML",
        }
    }

    /// Whether decoding this source consumes the request body.
    pub fn reads_body(&self) -> bool {
        matches!(self, Source::Form | Source::Json | Source::Xml)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual tag names no known source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// Conversion accepted by the middleware factory.
///
/// Implemented for [`Source`] itself and for textual tags. Resolving a textual
/// tag that names no source panics with `unknown source: <tag>`.
pub trait IntoSource {
    fn into_source(self) -> Source;
}

impl IntoSource for Source {
    fn into_source(self) -> Source {
        self
    }
}

impl IntoSource for &str {
    fn into_source(self) -> Source {
        match self.parse() {
            Ok(source) => source,
            Err(e) => panic!("{e}"),
        }
    }
}

impl IntoSource for String {
    fn into_source(self) -> Source {
        self.as_str().into_source()
    }
}
