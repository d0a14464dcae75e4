pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_menu_items_table;
mod m20250801_000002_create_bookings_table;
mod m20250801_000003_create_auth_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_menu_items_table::Migration),
            Box::new(m20250801_000002_create_bookings_table::Migration),
            Box::new(m20250801_000003_create_auth_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{
        ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement,
    };

    async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        Database::connect(options).await.unwrap()
    }

    #[tokio::test]
    async fn test_up_then_down() {
        let db = memory_db().await;

        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        for table in ["menu_items", "bookings", "users", "auth_tokens"] {
            assert!(manager.has_table(table).await.unwrap(), "missing {table}");
        }

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("menu_items").await.unwrap());
    }

    #[tokio::test]
    async fn test_check_constraints_reject_negative_inventory() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        let result = db
            .execute(Statement::from_string(
                db.get_database_backend(),
                "INSERT INTO menu_items (title, price, inventory) VALUES ('Soup', 4.5, -1)",
            ))
            .await;

        assert!(result.is_err());
    }
}
