use crate::cache::{create_cache, Cache};
use crate::config::{CacheStore, DrinksConfig};
use crate::create_app;
use crate::db;
use crate::models::{Drink, NewDrink, RecipePart};
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

const SIGNING_KEY: &str = include_str!("../../drinks-auth/tests/fixtures/signing_key.pem");
const JWKS: &str = include_str!("../../drinks-auth/tests/fixtures/jwks.json");
const KID: &str = "drinks-test-key";

/// Path the key set mock is served under
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Test fixture for setting up a complete test environment with a mocked
/// identity provider.
///
/// The fixture starts a mock key set endpoint serving the test signing key,
/// opens an empty in-memory database and builds the full application router.
/// Tokens accepted by the application are minted with [`TestFixture::token`].
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     let token = fixture.token(&["post:drinks"]);
///
///     let response = fixture
///         .post("/drinks", Some(&token), &json!({"title": "Latte", "recipe": []}))
///         .await;
///
///     response.assert_ok();
///     assert_eq!(response.json["created"], 1);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub config: DrinksConfig,
    /// The database behind the router
    pub db: SqlitePool,
    /// Mock server for the identity provider's key set
    pub jwks_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with key set caching disabled.
    pub async fn new() -> Self {
        Self::with_cache_store(CacheStore::None).await
    }

    /// Creates a new test fixture using the given key set cache store.
    pub async fn with_cache_store(store: CacheStore) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let jwks_mock = MockServer::start().await;
        let mut config = DrinksConfig::for_test_with_mocks(&jwks_mock);
        config.cache.store = store;

        Self::with_config(config, jwks_mock, true).await
    }

    /// Creates a fixture whose key set endpoint has no routes mounted.
    ///
    /// Mount responses on `jwks_mock` (or use [`TestFixture::add_jwks_mock`])
    /// to define how the endpoint behaves.
    pub async fn without_jwks(store: CacheStore) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let jwks_mock = MockServer::start().await;
        let mut config = DrinksConfig::for_test_with_mocks(&jwks_mock);
        config.cache.store = store;

        Self::with_config(config, jwks_mock, false).await
    }

    async fn with_config(config: DrinksConfig, jwks_mock: MockServer, serve_jwks: bool) -> Self {
        if serve_jwks {
            Mock::given(matchers::method("GET"))
                .and(matchers::path(JWKS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(Self::jwks()))
                .mount(&jwks_mock)
                .await;
        }

        let db = db::connect(&config.database)
            .await
            .expect("Failed to open test database");
        let cache: Cache = create_cache(&config.cache).expect("Failed to create cache");
        let state =
            AppState::new(config.clone(), db.clone(), cache).expect("Failed to build state");
        let app = create_app(state);

        Self {
            app,
            config,
            db,
            jwks_mock,
        }
    }

    /// The key set holding the test signing key
    pub fn jwks() -> Value {
        serde_json::from_str(JWKS).expect("Failed to parse JWKS fixture")
    }

    /// Initializes the test logger with the given level.
    ///
    /// Called by every constructor; repeated initialization is ignored.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Claims of a valid token for the configured issuer and audience.
    pub fn claims(&self, permissions: &[&str]) -> Value {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time before UNIX epoch")
            .as_secs();
        json!({
            "iss": format!("https://{}/", self.config.auth.domain),
            "sub": "auth0|test-manager",
            "aud": self.config.auth.audience,
            "iat": now,
            "exp": now + 600,
            "permissions": permissions,
        })
    }

    /// Signs arbitrary claims with the test key.
    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(KID.to_string());
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).expect("Invalid test key");
        encode(&header, claims, &key).expect("Failed to sign token")
    }

    /// A valid token granting `permissions`.
    pub fn token(&self, permissions: &[&str]) -> String {
        self.sign(&self.claims(permissions))
    }

    /// Inserts a drink directly into the database.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let latte = fixture.seed_drink("Latte").await;
    /// let response = fixture.delete(format!("/drinks/{}", latte.id), Some(&token)).await;
    /// ```
    pub async fn seed_drink(&self, title: &str) -> Drink {
        let drink = NewDrink {
            title: title.to_string(),
            recipe: vec![RecipePart {
                color: "white".to_string(),
                name: "milk".to_string(),
                parts: 1,
            }],
        };
        db::drinks::insert(&self.db, &drink)
            .await
            .expect("Failed to seed drink")
    }

    /// Creates a request builder with a JSON content type and, if given, a
    /// bearer token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let request = fixture
    ///     .request_builder(Method::POST, "/drinks", Some(&token))
    ///     .body(Body::from("{not json"))
    ///     .expect("Failed to build request");
    ///
    /// fixture.send(request).await.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    /// ```
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        builder
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, token, body).await
    }

    /// Sends a PATCH request with a JSON body to the specified URI.
    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::PATCH, uri, token, body).await
    }

    /// Sends a DELETE request to the specified URI.
    pub async fn delete(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request with the given raw `Authorization` header value.
    pub async fn get_with_authorization(
        &self,
        uri: impl AsRef<str>,
        authorization: &str,
    ) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, None)
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// This is the lower-level method used by the convenience methods like
    /// `get()` and `post()`.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Mounts a key set endpoint response on the mock identity provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let fixture = TestFixture::without_jwks(CacheStore::None).await;
    /// fixture.add_jwks_mock(ResponseTemplate::new(503), 1).await;
    ///
    /// let response = fixture.get("/drinks-detail", Some(&token)).await;
    /// response.assert_status(StatusCode::BAD_GATEWAY);
    /// ```
    pub async fn add_jwks_mock(&self, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path(JWKS_PATH))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&self.jwks_mock)
            .await;
    }

    /// Number of requests the key set endpoint has received.
    pub async fn jwks_requests(&self) -> usize {
        self.jwks_mock
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts the response is the error envelope with `status` and `message`.
    pub fn assert_error(&self, status: StatusCode, message: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(
            self.json,
            json!({
                "success": false,
                "error": status.as_u16(),
                "message": message,
            })
        );
        self
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
