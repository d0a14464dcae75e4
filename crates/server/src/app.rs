use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    doc::ApiDoc,
    routes::{auth, booking, health, menu_item},
    state::AppState,
};

/// Builds the full application router
pub fn router(state: AppState) -> Router {
    let menu = Router::new()
        .route(
            "/menu/items/",
            get(menu_item::list_menu_items).post(menu_item::create_menu_item),
        )
        .route(
            "/menu/items/{id}/",
            get(menu_item::get_menu_item)
                .put(menu_item::update_menu_item)
                .patch(menu_item::partial_update_menu_item)
                .delete(menu_item::delete_menu_item),
        );

    // `/booking/` and `/booking/tables/` are aliases of the same resource
    let mut bookings = Router::new();
    for prefix in ["/booking", "/booking/tables"] {
        bookings = bookings
            .route(
                &format!("{prefix}/"),
                get(booking::list_bookings).post(booking::create_booking),
            )
            .route(
                &format!("{prefix}/{{id}}/"),
                get(booking::get_booking)
                    .put(booking::update_booking)
                    .patch(booking::partial_update_booking)
                    .delete(booking::delete_booking),
            );
    }

    Router::new()
        .route("/health", get(health::health))
        .route("/api-token-auth/", post(auth::obtain_token))
        .merge(menu)
        .merge(bookings)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
