use http::StatusCode;
use thiserror::Error;

/// Reasons a request fails authorization.
///
/// Every variant maps to an HTTP status, a machine-readable code and a
/// description that is safe to return to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("{0}")]
    MalformedHeader(&'static str),

    #[error("{description}")]
    InvalidHeader {
        description: &'static str,
        status: StatusCode,
    },

    #[error("{description}")]
    InvalidClaims {
        description: &'static str,
        status: StatusCode,
    },

    #[error("Token expired.")]
    TokenExpired,

    #[error("Permission not found.")]
    Unauthorized,

    #[error("Unable to fetch signing keys: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub(crate) fn invalid_header(description: &'static str) -> Self {
        Self::InvalidHeader {
            description,
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub(crate) fn invalid_claims(description: &'static str, status: StatusCode) -> Self {
        Self::InvalidClaims {
            description,
            status,
        }
    }

    /// HTTP status the failure should be rendered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeader | Self::MalformedHeader(_) | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidHeader { status, .. } | Self::InvalidClaims { status, .. } => *status,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::KeySetUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "authorization_header_missing",
            Self::MalformedHeader(_) | Self::InvalidHeader { .. } => "invalid_header",
            Self::InvalidClaims { .. } => "invalid_claims",
            Self::TokenExpired => "token_expired",
            Self::Unauthorized => "unauthorized",
            Self::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }

    /// Description suitable for the response body. Unlike `Display`, it never
    /// includes upstream failure details.
    pub fn description(&self) -> String {
        match self {
            Self::KeySetUnavailable(_) => "Unable to fetch signing keys.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingHeader.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedHeader("Token not found.").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::invalid_header("Unable to find the appropriate key.").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::invalid_claims("Permissions not included in JWT.", StatusCode::BAD_REQUEST)
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::KeySetUnavailable("connection refused".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_key_set_description_hides_details() {
        let err = AuthError::KeySetUnavailable("dns error: no such host".to_string());
        assert_eq!(err.description(), "Unable to fetch signing keys.");
        assert!(err.to_string().contains("dns error"));
        assert_eq!(err.code(), "jwks_unavailable");
    }
}
