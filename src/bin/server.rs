//! Taskboard HTTP server entrypoint.

use taskboard::config::Config;
use taskboard::database::DatabaseConnection;
use taskboard::logging::init_structured_logging;
use taskboard::web::{create_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_structured_logging();

    let config = Config::from_env();
    let connection = DatabaseConnection::new(&config).await?;
    let pool = connection.pool().clone();

    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = create_router(AppState::new(pool));
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(bind_address = %config.bind_address, "taskboard server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
