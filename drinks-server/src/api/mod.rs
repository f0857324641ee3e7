mod authz_middleware;
pub(crate) mod drinks;
pub(crate) mod health;

use crate::api::authz_middleware::{authorization_middleware, RequiredPermission};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post, MethodRouter};
use axum::Router;

pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found()
}

pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Wraps `route` so it only runs for requests granted `permission`
fn protected(
    state: &AppState,
    permission: &'static str,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(
        RequiredPermission::new(state, permission),
        authorization_middleware,
    ))
}

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/drinks",
            get(drinks::list_drinks).merge(protected(
                state,
                "post:drinks",
                post(drinks::create_drink),
            )),
        )
        .route(
            "/drinks-detail",
            protected(
                state,
                "get:drinks-detail",
                get(drinks::list_drink_details),
            ),
        )
        .route(
            "/drinks/{id}",
            protected(state, "patch:drinks", patch(drinks::update_drink)).merge(protected(
                state,
                "delete:drinks",
                delete(drinks::delete_drink),
            )),
        )
}
