use crate::claims::Claims;
use crate::error::AuthError;
use crate::jwks::KeySet;
use http::StatusCode;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use log::debug;

const UNDECODABLE_HEADER: &str = "Error decoding token headers.";
const MISSING_KID: &str = "Authorization malformed.";
const UNKNOWN_KID: &str = "Unable to find the appropriate key.";
const INCORRECT_CLAIMS: &str = "Incorrect claims. Please, check the audience and issuer.";
const UNPARSABLE_TOKEN: &str = "Unable to parse authentication token.";

/// Verifies bearer tokens issued by a single identity provider.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
    leeway: u64,
}

impl TokenVerifier {
    /// Tokens must be issued by `https://{domain}/` for `audience` and signed
    /// with one of `algorithms`.
    pub fn new(domain: &str, audience: impl Into<String>, algorithms: Vec<Algorithm>) -> Self {
        Self {
            audience: audience.into(),
            issuer: format!("https://{domain}/"),
            algorithms,
            leeway: 0,
        }
    }

    /// Clock skew tolerated on `exp`, in seconds
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify `token` against `key_set` and return its claims.
    pub fn verify(&self, token: &str, key_set: &KeySet) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("Failed to decode token header: {e}");
            AuthError::invalid_header(UNDECODABLE_HEADER)
        })?;

        let kid = header.kid.ok_or(AuthError::InvalidHeader {
            description: MISSING_KID,
            status: StatusCode::UNAUTHORIZED,
        })?;

        let key = key_set
            .find(&kid)
            .ok_or_else(|| AuthError::invalid_header(UNKNOWN_KID))?
            .decoding_key()
            .map_err(|e| {
                debug!("Signing key '{kid}' is unusable: {e}");
                AuthError::invalid_header(UNPARSABLE_TOKEN)
            })?;

        decode::<Claims>(token, &key, &self.validation())
            .map(|data| data.claims)
            .map_err(classify)
    }

    fn validation(&self) -> Validation {
        let mut validation =
            Validation::new(self.algorithms.first().copied().unwrap_or(Algorithm::RS256));
        validation.algorithms = self.algorithms.clone();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        // Tokens without `exp` never verify
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = self.leeway;
        validation
    }
}

/// Whether `err` means the token's `kid` is missing from the key set
pub(crate) fn is_unknown_key(err: &AuthError) -> bool {
    *err == AuthError::invalid_header(UNKNOWN_KID)
}

fn classify(err: JwtError) -> AuthError {
    debug!("Token rejected: {err}");
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
            AuthError::invalid_claims(INCORRECT_CLAIMS, StatusCode::UNAUTHORIZED)
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthError::invalid_claims(INCORRECT_CLAIMS, StatusCode::UNAUTHORIZED)
        }
        _ => AuthError::invalid_header(UNPARSABLE_TOKEN),
    }
}
