//! Applies the SQL migrations to the configured database.

use catalog::{Config, telemetry};
use store::PostgresCommitter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    telemetry::init_tracing(&config);

    let pool = config.connect().await?;
    tracing::info!(max_connections = config.max_connections, "Connected to database");

    PostgresCommitter::new(pool).run_migrations().await?;
    tracing::info!("Migrations applied");

    Ok(())
}
