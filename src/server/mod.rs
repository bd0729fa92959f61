//! HTTP surface over the store.

pub mod error;
mod routes;

pub use error::ApiError;

use crate::core::Store;
use crate::errors::{AppError, AppResult};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    currency: Arc<str>,
}

impl AppState {
    pub fn new(store: Store, currency: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(store),
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Run a store call on the blocking pool; SQLite access is synchronous.
    pub(crate) async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| ApiError::internal(format!("store task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

pub async fn serve(addr: &str, state: AppState) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Other(format!("cannot listen on {addr}: {e}")))?;

    tracing::info!("listening on {}", addr);
    println!("🌐 Serving on http://{addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
