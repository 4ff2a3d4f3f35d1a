mod api;
mod db;
mod router;
mod state;
mod vector_store;

use std::sync::Arc;

use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tender_core::config::load_dotenv();
    let config = tender_core::Config::from_env();
    config.log_summary();

    let pg_pool = db::init_pg_pool(&config.postgres).await;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pg_pool));
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
