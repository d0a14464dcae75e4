use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use database::services::MenuItemService;
use log::info;
use models::{MenuItem, MenuItemChanges, MenuItemFields, Payload};

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState};

/// List every menu item
#[utoipa::path(
    get,
    path = "/menu/items/",
    responses(
        (status = 200, description = "All menu items in id order", body = Vec<MenuItem>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    info!("GET /menu/items/");
    Ok(Json(MenuItemService::list(&state.db).await?))
}

/// Add an item to the menu
#[utoipa::path(
    post,
    path = "/menu/items/",
    request_body = MenuItemFields,
    responses(
        (status = 201, description = "Menu item created", body = MenuItem),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    let Json(payload) = payload?;
    let fields = MenuItemFields::from_payload(payload)?;

    let item = MenuItemService::create(&state.db, fields).await?;
    info!("POST /menu/items/ created {}", item.id);

    Ok((StatusCode::CREATED, Json(item)))
}

/// Get a single menu item
#[utoipa::path(
    get,
    path = "/menu/items/{id}/",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item found", body = MenuItem),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Menu item not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MenuItem>, ApiError> {
    let Path(id) = id?;
    info!("GET /menu/items/{id}/");

    MenuItemService::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Replace every field of a menu item
#[utoipa::path(
    put,
    path = "/menu/items/{id}/",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body = MenuItemFields,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItem),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Menu item not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<MenuItem>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    info!("PUT /menu/items/{id}/");

    let fields = MenuItemFields::from_payload(payload)?;
    MenuItemService::update(&state.db, id, fields)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Change some fields of a menu item
#[utoipa::path(
    patch,
    path = "/menu/items/{id}/",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body = MenuItemFields,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItem),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Menu item not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn partial_update_menu_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<MenuItem>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    info!("PATCH /menu/items/{id}/");

    let changes = MenuItemChanges::from_payload(payload)?;
    MenuItemService::partial_update(&state.db, id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Remove a menu item
#[utoipa::path(
    delete,
    path = "/menu/items/{id}/",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Menu item not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    info!("DELETE /menu/items/{id}/");

    if MenuItemService::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
