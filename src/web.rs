mod handlers;
mod routes;

#[cfg(test)]
mod tests;

use axum::Router;
use std::{path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::repository::BlogRepository;

pub use handlers::INDEX_POST_COUNT;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BlogRepository>,
}

impl AppState {
    pub fn new(repo: impl BlogRepository + 'static) -> Arc<Self> {
        Arc::new(Self {
            repo: Arc::new(repo),
        })
    }
}

pub fn app(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: String, app: Router) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::Error::Internal(e.to_string()))?;

    Ok(())
}
