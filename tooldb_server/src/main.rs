//! tooldb server: reads settings from the environment, ensures the database and tables exist,
//! and serves the directory API.
//!
//! Run from repo root: `cargo run -p tooldb-server`

use std::sync::Arc;
use tokio::net::TcpListener;
use tooldb::{
    app, ensure_database_exists, ensure_schema, AppState, PgToolStore, Settings,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tooldb=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    ensure_schema(&pool, &settings.schema).await?;

    let store = PgToolStore::new(pool, settings.schema.clone());
    let state = AppState::new(Arc::new(store));
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("tooldb listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
