use crate::error::AuthError;
use http::HeaderValue;

const MISSING_SCHEME: &str = "Authorization header must start with \"Bearer\".";
const MISSING_TOKEN: &str = "Token not found.";
const AMBIGUOUS_TOKEN: &str = "Authorization header must be bearer token.";

/// Extracts the bearer token from a raw `Authorization` header value.
///
/// The header is split on whitespace; the first segment must be the `Bearer`
/// scheme (case-insensitive) and exactly one token segment must follow it.
/// The token is returned unmodified.
pub fn extract_bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };

    let value = header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader(MISSING_SCHEME))?;

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return Err(AuthError::MalformedHeader(MISSING_SCHEME)),
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader(MISSING_TOKEN))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(AMBIGUOUS_TOKEN));
    }

    Ok(token)
}
