use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use database::services::BookingService;
use log::info;
use models::{Booking, BookingChanges, BookingFields, Payload};

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState};

/// List every booking
#[utoipa::path(
    get,
    path = "/booking/tables/",
    responses(
        (status = 200, description = "All bookings in id order", body = Vec<Booking>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    info!("GET /booking/tables/");
    Ok(Json(BookingService::list(&state.db).await?))
}

/// Book a table
#[utoipa::path(
    post,
    path = "/booking/tables/",
    request_body = BookingFields,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let Json(payload) = payload?;
    let fields = BookingFields::from_payload(payload)?;

    let booking = BookingService::create(&state.db, fields).await?;
    info!("POST /booking/tables/ created {}", booking.id);

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a single booking
#[utoipa::path(
    get,
    path = "/booking/tables/{id}/",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Booking not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = id?;
    info!("GET /booking/tables/{id}/");

    BookingService::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Replace every field of a booking
#[utoipa::path(
    put,
    path = "/booking/tables/{id}/",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = BookingFields,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Booking not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn update_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    info!("PUT /booking/tables/{id}/");

    let fields = BookingFields::from_payload(payload)?;
    BookingService::update(&state.db, id, fields)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Change some fields of a booking
#[utoipa::path(
    patch,
    path = "/booking/tables/{id}/",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = BookingFields,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Booking not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn partial_update_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    info!("PATCH /booking/tables/{id}/");

    let changes = BookingChanges::from_payload(payload)?;
    BookingService::partial_update(&state.db, id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Cancel a booking
#[utoipa::path(
    delete,
    path = "/booking/tables/{id}/",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Booking not found", body = crate::error::ErrorBody)
    ),
    security(("token" = [])),
    tag = "Booking"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    info!("DELETE /booking/tables/{id}/");

    if BookingService::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
