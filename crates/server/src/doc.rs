use crate::routes::{auth, booking, health, menu_item};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Token <key>, as issued by /api-token-auth/",
                ))),
            );
        }
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::obtain_token,
        menu_item::list_menu_items,
        menu_item::create_menu_item,
        menu_item::get_menu_item,
        menu_item::update_menu_item,
        menu_item::partial_update_menu_item,
        menu_item::delete_menu_item,
        booking::list_bookings,
        booking::create_booking,
        booking::get_booking,
        booking::update_booking,
        booking::partial_update_booking,
        booking::delete_booking,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuing"),
        (name = "Menu", description = "Menu item endpoints"),
        (name = "Booking", description = "Table booking endpoints"),
        (name = "Health", description = "Liveness check"),
    ),
    info(
        title = "Restaurant API",
        version = "1.0.0",
        description = "Menu and table booking API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
