use crate::error::AuthError;
use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use log::{debug, error};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Well-known path under which identity providers publish their key set
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// A single public signing key as published in a JSON Web Key Set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type, e.g. `RSA`
    pub kty: String,
    /// Key identifier matched against the token header's `kid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended key usage, e.g. `sig`
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// RSA modulus, base64url encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA exponent, base64url encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl JsonWebKey {
    /// Builds a verification key from the RSA components
    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        match (self.kty.as_str(), &self.n, &self.e) {
            ("RSA", Some(n), Some(e)) => DecodingKey::from_rsa_components(n, e),
            _ => Err(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into()),
        }
    }
}

/// The provider's published set of signing keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub keys: Vec<JsonWebKey>,
}

impl KeySet {
    pub fn new(keys: Vec<JsonWebKey>) -> Self {
        Self { keys }
    }

    /// Finds the key whose `kid` matches
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }
}

/// Source of the key set used to verify tokens.
///
/// Implementations are consulted once per verification; whether that hits
/// the network is up to the implementation.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn key_set(&self) -> Result<KeySet, AuthError>;

    /// Bypass any stored copy and fetch the key set again.
    ///
    /// Called when a token names a key the current set does not contain.
    /// Sources that never serve stale keys return `None`.
    async fn refresh(&self) -> Result<Option<KeySet>, AuthError> {
        Ok(None)
    }
}

/// A fixed, locally known key set
#[async_trait]
impl KeySetSource for KeySet {
    async fn key_set(&self) -> Result<KeySet, AuthError> {
        Ok(self.clone())
    }
}

/// Builds the key set URL for an identity provider domain
pub fn jwks_url_for_domain(domain: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://{domain}{JWKS_PATH}"))
}

/// Fetches the key set over HTTP on every call
#[derive(Debug, Clone)]
pub struct RemoteKeySet {
    client: Client,
    url: Url,
}

impl RemoteKeySet {
    /// Create a fetcher whose requests are bounded by `timeout`
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            // The key set is fetched from a single host
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl KeySetSource for RemoteKeySet {
    async fn key_set(&self) -> Result<KeySet, AuthError> {
        debug!("Fetching signing keys from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch signing keys from {}: {}", self.url, e);
                AuthError::KeySetUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Key set endpoint {} responded with {}", self.url, status);
            return Err(AuthError::KeySetUnavailable(format!(
                "key set endpoint responded with status {status}"
            )));
        }

        response.json::<KeySet>().await.map_err(|e| {
            error!("Failed to parse key set from {}: {}", self.url, e);
            AuthError::KeySetUnavailable(e.to_string())
        })
    }
}
