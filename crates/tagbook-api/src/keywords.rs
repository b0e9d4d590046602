//! Handlers for `/keywords` endpoints. Writes are curator-only.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/keywords` | Dimension names |
//! | `GET`    | `/keywords/{dimension}` | Active keyword names |
//! | `PUT`    | `/keywords/{dimension}` | Create dimension; seeds every image. Idempotent |
//! | `DELETE` | `/keywords/{dimension}` | Hard delete: drops every image's history for it |
//! | `PUT`    | `/keywords/{dimension}/{keyword}` | Create, or undelete a deprecated keyword |
//! | `DELETE` | `/keywords/{dimension}/{keyword}` | Soft delete (deprecate) |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use tagbook_core::{keyword::Keyword, store::TagStore};

use crate::{
  AppState,
  auth::{Curator, Reader},
  error::ApiError,
  history::{active_details, keyword_detail},
};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /keywords`
pub async fn dimensions<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  dimension_names(&state)
}

/// `GET /keywords/{dimension}`
pub async fn active<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path(dimension): Path<String>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  active_names(&state, &dimension)
}

// ─── Dimensions ───────────────────────────────────────────────────────────────

/// `PUT /keywords/{dimension}` — expensive: touches every image.
pub async fn create_dimension<S>(
  State(state): State<AppState<S>>,
  Curator(user): Curator,
  Path(dimension): Path<String>,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let name = dimension.clone();
  state
    .blocking(move |store| store.create_dimension(&name, &user.username, Utc::now()))
    .await?;
  active_details(&state, &dimension)
}

/// `DELETE /keywords/{dimension}` — expensive and irreversible.
///
/// History is keyed by dimension name, so every image loses its log for
/// this dimension and re-creating the name starts from nothing.
pub async fn delete_dimension<S>(
  State(state): State<AppState<S>>,
  Curator(user): Curator,
  Path(dimension): Path<String>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let name = dimension.clone();
  let removed = state.blocking(move |store| store.delete_dimension(&name)).await?;
  if removed {
    tracing::warn!(dimension = %dimension, user = %user.username, "dimension hard-deleted");
  }
  dimension_names(&state)
}

// ─── Keywords ─────────────────────────────────────────────────────────────────

/// `PUT /keywords/{dimension}/{keyword}`
pub async fn create_keyword<S>(
  State(state): State<AppState<S>>,
  Curator(user): Curator,
  Path((dimension, keyword)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  state
    .store
    .create_keyword(&dimension, &keyword, &user.username, Utc::now())
    .map_err(ApiError::from_store)?;
  keyword_detail(&state, &dimension, &keyword)
}

/// `DELETE /keywords/{dimension}/{keyword}` — unknown keywords are ignored.
pub async fn delete_keyword<S>(
  State(state): State<AppState<S>>,
  _curator: Curator,
  Path((dimension, keyword)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  state
    .store
    .delete_keyword(&dimension, &keyword)
    .map_err(ApiError::from_store)?;
  active_names(&state, &dimension)
}

fn dimension_names<S: TagStore>(state: &AppState<S>) -> Result<Json<Vec<String>>, ApiError> {
  let dims = state.store.list_dimensions().map_err(ApiError::from_store)?;
  Ok(Json(dims.into_iter().map(|d| d.name).collect()))
}

fn active_names<S: TagStore>(
  state: &AppState<S>,
  dimension: &str,
) -> Result<Json<Vec<String>>, ApiError> {
  let names = state.store.list_active(dimension).map_err(ApiError::from_store)?;
  Ok(Json(names))
}
