//! JSON REST API for tagbook.
//!
//! Exposes an axum [`Router`] backed by any [`TagStore`]. Every route
//! requires HTTP Basic credentials; dimension and vocabulary writes are
//! restricted to curators. The authenticated user is recorded as the author
//! of every write and the server clock as its timestamp.

pub mod auth;
pub mod error;
pub mod extract;
pub mod history;
pub mod images;
pub mod keywords;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use serde::Deserialize;
use tagbook_core::{seed::Seed, store::TagStore};
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, UserConfig};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:  String,
  pub port:  u16,
  #[serde(default)]
  pub users: Vec<UserConfig>,
  /// Initial vocabulary and images; the stock seed when omitted.
  #[serde(default)]
  pub seed:  Option<Seed>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: TagStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S: TagStore + 'static> AppState<S> {
  /// Run a store call on the blocking pool.
  ///
  /// Structural operations hold the store's global write lock for a walk
  /// over every image, which must not stall a runtime worker.
  pub async fn blocking<T, F>(&self, task: F) -> Result<T, ApiError>
  where
    F: FnOnce(&S) -> Result<T, S::Error> + Send + 'static,
    T: Send + 'static,
  {
    let store = Arc::clone(&self.store);
    tokio::task::spawn_blocking(move || task(&store))
      .await
      .inspect_err(|e| tracing::error!(error = %e, "store task failed"))?
      .map_err(ApiError::from_store)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TagStore + Clone + 'static,
{
  Router::new()
    // Images
    .route("/images", get(images::list::<S>))
    .route("/images/", get(images::list::<S>))
    .route(
      "/images/{id}",
      get(images::get_one::<S>)
        .put(images::create::<S>)
        .post(images::assign::<S>)
        .delete(images::unassign::<S>),
    )
    .route("/images/{id}/{dimension}", get(images::get_value::<S>))
    // Vocabulary
    .route("/keywords", get(keywords::dimensions::<S>))
    .route("/keywords/", get(keywords::dimensions::<S>))
    .route(
      "/keywords/{dimension}",
      get(keywords::active::<S>)
        .put(keywords::create_dimension::<S>)
        .delete(keywords::delete_dimension::<S>),
    )
    .route(
      "/keywords/{dimension}/{keyword}",
      put(keywords::create_keyword::<S>).delete(keywords::delete_keyword::<S>),
    )
    // History
    .route("/history/images", get(history::images::<S>))
    .route("/history/images/", get(history::images::<S>))
    .route("/history/images/{id}", get(history::image::<S>))
    .route("/history/images/{id}/{dimension}", get(history::image_dimension::<S>))
    .route("/history/keywords", get(history::dimensions::<S>))
    .route("/history/keywords/", get(history::dimensions::<S>))
    .route("/history/keywords/{dimension}", get(history::keywords::<S>))
    .route("/history/keywords/{dimension}/{keyword}", get(history::keyword::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
