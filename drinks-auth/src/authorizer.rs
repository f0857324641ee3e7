use crate::bearer::extract_bearer_token;
use crate::claims::Claims;
use crate::error::AuthError;
use crate::jwks::KeySetSource;
use crate::permissions::check_permissions;
use crate::verifier::{TokenVerifier, is_unknown_key};
use http::HeaderValue;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// The full request-authorization pipeline.
///
/// Runs token extraction, key set retrieval, token verification and the
/// permission check in that order, stopping at the first failure.
#[derive(Clone)]
pub struct Authorizer {
    key_set: Arc<dyn KeySetSource>,
    verifier: TokenVerifier,
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("verifier", &self.verifier)
            // The key set source is a trait object without Debug
            .finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn new(key_set: Arc<dyn KeySetSource>, verifier: TokenVerifier) -> Self {
        Self { key_set, verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authenticate the request without checking any permission
    pub async fn verify(&self, header: Option<&HeaderValue>) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(header)?;
        let key_set = self.key_set.key_set().await?;

        match self.verifier.verify(token, &key_set) {
            Err(err) if is_unknown_key(&err) => match self.key_set.refresh().await? {
                Some(fresh) => {
                    debug!("Token key not in stored key set, retrying with a fresh one");
                    self.verifier.verify(token, &fresh)
                }
                None => Err(err),
            },
            result => result,
        }
    }

    /// Authenticate the request and require `permission`
    pub async fn authorize(
        &self,
        header: Option<&HeaderValue>,
        permission: &str,
    ) -> Result<Claims, AuthError> {
        let claims = self.verify(header).await?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }
}
