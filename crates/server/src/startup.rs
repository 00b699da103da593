use std::{future::Future, sync::Arc};

use axum::Router;
use common::env::ensure_parent_dir;
use configs::AppConfig;
use service::users::{FileUserRepository, UserRepository, UserService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;

/// Shared handler state: the request handler over the injected store.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService<dyn UserRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { users: Arc::new(UserService::new(repo)) }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the user store described by `cfg` and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    ensure_parent_dir(&cfg.storage.users_file).await?;
    let repo = FileUserRepository::load_with(&cfg.storage.users_file, cfg.storage.reject_duplicate_ids).await;
    Ok(routes::build_router(ServerState::new(repo), build_cors()))
}

/// Bind `cfg.server` and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, users_file = %cfg.storage.users_file.display(), "users mock server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
