use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Create a PostgreSQL connection pool and run migrations.
/// Returns None if Postgres is not configured.
pub async fn init_pg_pool(config: &tender_core::config::PostgresConfig) -> Option<PgPool> {
    if !config.is_configured() {
        warn!("PG_USERNAME not set — document storage and search disabled");
        return None;
    }

    let url = config.connection_string();
    match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&url)
        .await
    {
        Ok(pool) => {
            info!("PostgreSQL connected: {}", config.host);
            match sqlx::migrate!("../../migrations").run(&pool).await {
                Ok(_) => {
                    info!("Database migrations applied successfully");
                    Some(pool)
                }
                Err(e) => {
                    warn!("Failed to run migrations: {} — storage features disabled", e);
                    None
                }
            }
        }
        Err(e) => {
            warn!("Failed to connect to PostgreSQL: {} — storage features disabled", e);
            None
        }
    }
}
