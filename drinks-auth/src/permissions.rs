use crate::claims::Claims;
use crate::error::AuthError;
use http::StatusCode;
use serde_json::Value;

/// Asserts that `permission` is a member of the claims' `permissions` array.
///
/// A token without any `permissions` claim is a malformed token shape and is
/// rejected as a bad request; a token that simply lacks the permission is
/// forbidden.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    if claims.permissions().is_none() {
        return Err(AuthError::invalid_claims(
            "Permissions not included in JWT.",
            StatusCode::BAD_REQUEST,
        ));
    }

    if has_permission(permission, claims) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized)
    }
}

/// Membership test over the `permissions` array; anything that is not an
/// array of strings grants nothing.
pub fn has_permission(permission: &str, claims: &Claims) -> bool {
    match claims.permissions() {
        Some(Value::Array(granted)) => granted.iter().any(|p| p.as_str() == Some(permission)),
        _ => false,
    }
}
