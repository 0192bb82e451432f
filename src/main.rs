use std::sync::Arc;

use anyhow::Context;

use todos_api::auth::TokenVerifier;
use todos_api::config::AppConfig;
use todos_api::router;
use todos_api::store::{DynTodoStore, MemoryTodoStore, PgTodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up OIDC_PROVIDER, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("configuration")?;
    tracing::info!(
        "verifying tokens issued by {} for audience {}",
        config.auth.issuer,
        config.auth.audience
    );

    // The store must be ready before the listener accepts traffic.
    let store: DynTodoStore = match &config.database.url {
        Some(url) => {
            let store = PgTodoStore::connect(url)
                .await
                .context("database connection")?;
            tracing::info!("connected to postgres");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; to-dos are held in memory only");
            Arc::new(MemoryTodoStore::new())
        }
    };

    let verifier = Arc::new(TokenVerifier::new(&config.auth));
    let app = router::app(store, verifier);

    let bind_addr = format!("0.0.0.0:{}", config.http.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
