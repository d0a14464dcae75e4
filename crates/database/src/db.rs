use log::debug;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Creates a database connection pool for `database_url`.
///
/// An in-memory SQLite database only lives as long as its connection, so the
/// pool is pinned to a single connection in that case.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging_level(log::LevelFilter::Debug);

    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    debug!("Connecting to database");
    Database::connect(options).await
}
