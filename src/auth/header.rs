//! Token extraction from request headers.

use axum::http::{HeaderMap, HeaderName};

/// Optional scheme accepted in front of the token.
const BEARER_SCHEME: &str = "bearer";

/// Outcome of looking for a token header.
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderToken<'a> {
    /// Header absent or blank
    Missing,
    /// Header present but not visible ASCII
    Unreadable,
    Present(&'a str),
}

/// Read the token from the named header, stripping an optional `Bearer ` prefix.
pub fn get_token<'a>(headers: &'a HeaderMap, name: &HeaderName) -> HeaderToken<'a> {
    let Some(value) = headers.get(name) else {
        return HeaderToken::Missing;
    };
    let Ok(value) = value.to_str() else {
        return HeaderToken::Unreadable;
    };

    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ if value.eq_ignore_ascii_case(BEARER_SCHEME) => "",
        _ => value,
    };

    if token.is_empty() {
        HeaderToken::Missing
    } else {
        HeaderToken::Present(token)
    }
}
