pub mod auth;
pub mod booking;
pub mod menu_item;

pub use auth::{AuthError, AuthService};
pub use booking::BookingService;
pub use menu_item::MenuItemService;

/// Fresh in-memory database with every migration applied
#[cfg(test)]
pub(crate) async fn test_connection() -> sea_orm::DatabaseConnection {
    use migration::{Migrator, MigratorTrait};

    let db = crate::db::create_connection("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}
