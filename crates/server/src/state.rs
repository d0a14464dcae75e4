use sea_orm::DatabaseConnection;

/// Shared handler state. The connection pool is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
