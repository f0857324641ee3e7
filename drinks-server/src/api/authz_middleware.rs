use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use drinks_auth::Authorizer;
use http::header::AUTHORIZATION;
use log::{debug, warn};
use std::sync::Arc;

/// Middleware state naming the permission a route requires
#[derive(Clone)]
pub struct RequiredPermission {
    authorizer: Arc<Authorizer>,
    permission: &'static str,
}

impl RequiredPermission {
    pub fn new(state: &AppState, permission: &'static str) -> Self {
        Self {
            authorizer: state.authorizer.clone(),
            permission,
        }
    }
}

/// Runs the authorization pipeline and hands the verified claims to the
/// handler as a request extension.
pub async fn authorization_middleware(
    State(required): State<RequiredPermission>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request.headers().get(AUTHORIZATION).cloned();

    match required
        .authorizer
        .authorize(header.as_ref(), required.permission)
        .await
    {
        Ok(claims) => {
            debug!(
                "Granted '{}' to {} on {} {}",
                required.permission,
                claims.subject().unwrap_or("<no subject>"),
                request.method(),
                request.uri().path()
            );
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(
                "Denied {} {} requiring '{}': {}",
                request.method(),
                request.uri().path(),
                required.permission,
                err.code()
            );
            Err(err.into())
        }
    }
}
