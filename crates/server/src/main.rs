use database::{db::create_connection, services::AuthService};
use log::{error, info};
use migration::{Migrator, MigratorTrait};

mod app;
mod auth;
mod config;
mod doc;
mod error;
mod routes;
mod state;
mod utils;

use config::Config;
use state::AppState;
use utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let db = create_connection(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    info!("Database schema is up to date");

    if let Some(admin) = &config.admin {
        if AuthService::ensure_user(&db, &admin.username, &admin.password).await? {
            info!("Seeded administrator {}", admin.username);
        }
    }

    let app = app::router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!("Running axum on http://{}", config.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
