use axum::http::StatusCode;

/// Liveness probe. Needs no token and does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is accepting requests", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
