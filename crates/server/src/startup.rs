use std::future::Future;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::repo::SeaOrmRepository;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the config file when present, otherwise defaults plus environment.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Router over an already-built state; used by `run` and by tests.
pub fn app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await
}

/// Connect, migrate, build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    info!(event = "migrations_applied", "database schema up to date");

    let state = AppState::new(Arc::new(SeaOrmRepository::new(db)));
    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(addr.as_str()).await?;
    info!(%addr, "listening");
    serve(listener, app(state), shutdown).await?;
    info!(event = "drained", "all connections closed");
    Ok(())
}
