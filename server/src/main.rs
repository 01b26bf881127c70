use anyhow::Context;
use recipe_server::config::{Config, StoreBackend};
use recipe_server::recipes::RecipeService;
use recipe_server::store::{MemoryRecipeStore, PgRecipeStore, RecipeStore};
use recipe_server::{api, app, db, telemetry, AppState};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json()?;
        println!("{}", spec);
        return Ok(());
    }

    telemetry::init_telemetry()?;

    let config = Config::load()?;
    let state: AppState = Arc::new(RecipeService::new(build_store(&config)?));
    tracing::info!(backend = state.backend_name(), "recipe store ready");

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    let address = listener.local_addr()?;

    tracing::info!("Server listening on {}", address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", address);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", address);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecipeStore>> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Ok(Arc::new(MemoryRecipeStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::create_pool(database_url, config.pool_size)
                .context("failed to connect to the database")?;
            Ok(Arc::new(PgRecipeStore::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
