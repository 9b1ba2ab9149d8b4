use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod config;
pub mod extract;
pub mod models;
pub mod routes;
pub mod validate;

use config::Config;
use extract::{ExtractionError, Extractor};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Extractor,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ExtractionError> {
        let extractor = Extractor::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            extractor,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/extract", post(routes::extract_endpoint))
        .with_state(state)
}
