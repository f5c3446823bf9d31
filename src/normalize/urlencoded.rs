//! `application/x-www-form-urlencoded` data, used by query strings and form bodies.

use url::form_urlencoded;

use super::FieldMap;
use crate::error::DecodeError;

/// Parse url-encoded pairs, keeping every value of a repeated key.
pub fn parse(input: &[u8]) -> Result<FieldMap, DecodeError> {
    check_syntax(input)?;

    Ok(form_urlencoded::parse(input)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}

/// Reject input the lenient pair parser would silently accept.
fn check_syntax(input: &[u8]) -> Result<(), DecodeError> {
    if input.contains(&b';') {
        return Err(DecodeError::UrlEncoded("invalid semicolon separator".into()));
    }

    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            let escaped = input
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !escaped {
                return Err(DecodeError::UrlEncoded(format!(
                    "invalid percent escape at offset {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(())
}
