use crate::db;
use crate::errors::{ApiError, ErrorBody};
use crate::models::{
    CreatedResponse, DeletedResponse, Drink, DrinkPatch, DrinksResponse, NewDrink,
    ShortDrinksResponse, UpdatedResponse,
};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Json, Path, State};
use drinks_auth::Claims;
use log::{debug, info};

fn subject(claims: &Claims) -> &str {
    claims.subject().unwrap_or("<no subject>")
}

/// Non-numeric ids can never match a drink
fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::not_found())
}

/// List all drinks without ingredient amounts
#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks, short representation", body = ShortDrinksResponse),
        (status = 404, description = "There are no drinks", body = ErrorBody)
    )
)]
pub(crate) async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<ShortDrinksResponse>, ApiError> {
    let drinks = db::drinks::list(&state.db).await?;
    if drinks.is_empty() {
        return Err(ApiError::not_found());
    }

    Ok(Json(ShortDrinksResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// List all drinks with their full recipes
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = DRINKS_TAG,
    security(("bearer" = ["get:drinks-detail"])),
    responses(
        (status = 200, description = "All drinks, long representation", body = DrinksResponse),
        (status = 400, description = "Token could not be verified", body = ErrorBody),
        (status = 401, description = "Missing, malformed or expired token", body = ErrorBody),
        (status = 403, description = "Permission not granted", body = ErrorBody),
        (status = 404, description = "There are no drinks", body = ErrorBody)
    )
)]
pub(crate) async fn list_drink_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DrinksResponse>, ApiError> {
    debug!("Listing drink details for {}", subject(&claims));

    let drinks = db::drinks::list(&state.db).await?;
    if drinks.is_empty() {
        return Err(ApiError::not_found());
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// Create a drink
#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    request_body = NewDrink,
    security(("bearer" = ["post:drinks"])),
    responses(
        (status = 200, description = "Drink created", body = CreatedResponse),
        (status = 400, description = "Token could not be verified", body = ErrorBody),
        (status = 401, description = "Missing, malformed or expired token", body = ErrorBody),
        (status = 403, description = "Permission not granted", body = ErrorBody),
        (status = 422, description = "Invalid body or duplicate title", body = ErrorBody)
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(new_drink) = payload?;
    if new_drink.title.trim().is_empty() {
        return Err(ApiError::unprocessable());
    }

    let drink = db::drinks::insert(&state.db, &new_drink).await?;
    info!(
        "Drink {} '{}' created by {}",
        drink.id,
        drink.title,
        subject(&claims)
    );

    Ok(Json(CreatedResponse {
        success: true,
        created: drink.id,
        drinks: vec![drink],
    }))
}

/// Update the title and/or recipe of a drink
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(("id" = i64, Path, description = "Drink id")),
    request_body = DrinkPatch,
    security(("bearer" = ["patch:drinks"])),
    responses(
        (status = 200, description = "Drink updated", body = UpdatedResponse),
        (status = 400, description = "Token could not be verified", body = ErrorBody),
        (status = 401, description = "Missing, malformed or expired token", body = ErrorBody),
        (status = 403, description = "Permission not granted", body = ErrorBody),
        (status = 404, description = "Unknown drink", body = ErrorBody),
        (status = 422, description = "Nothing to update or invalid body", body = ErrorBody)
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkPatch>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = drink_id(path)?;
    let mut drink = db::drinks::find(&state.db, id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(ApiError::unprocessable());
    }
    patch.apply(&mut drink);

    // The drink may have been deleted since the lookup
    let drink = db::drinks::update(&state.db, &drink)
        .await?
        .ok_or_else(ApiError::not_found)?;
    info!("Drink {} updated by {}", drink.id, subject(&claims));

    Ok(Json(UpdatedResponse {
        success: true,
        updated: drink.id,
        drinks: vec![drink],
    }))
}

/// Delete a drink
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(("id" = i64, Path, description = "Drink id")),
    security(("bearer" = ["delete:drinks"])),
    responses(
        (status = 200, description = "Drink deleted", body = DeletedResponse),
        (status = 400, description = "Token could not be verified", body = ErrorBody),
        (status = 401, description = "Missing, malformed or expired token", body = ErrorBody),
        (status = 403, description = "Permission not granted", body = ErrorBody),
        (status = 404, description = "Unknown drink", body = ErrorBody)
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = drink_id(path)?;
    if !db::drinks::delete(&state.db, id).await? {
        return Err(ApiError::not_found());
    }
    info!("Drink {} deleted by {}", id, subject(&claims));

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}
