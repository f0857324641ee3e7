//! # drinks-auth
//!
//! Bearer-token authorization against a third-party identity provider.
//!
//! ## Components
//!
//! - **Bearer:** Extracts the token from the `Authorization` header.
//! - **JWKS:** Retrieves the provider's public signing keys.
//! - **Verifier:** Checks signature, issuer, audience and expiry.
//! - **Permissions:** Checks the `permissions` claim.
//! - **Authorizer:** Runs all of the above in order.

pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use authorizer::Authorizer;
pub use bearer::extract_bearer_token;
pub use claims::Claims;
pub use error::AuthError;
pub use jsonwebtoken::Algorithm;
pub use jwks::{JsonWebKey, KeySet, KeySetSource, RemoteKeySet, jwks_url_for_domain};
pub use permissions::{check_permissions, has_permission};
pub use verifier::TokenVerifier;
