//! Handlers for `/history` endpoints — raw, unresolved data.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/history/images` | Every image with its full history |
//! | `GET`  | `/history/images/{id}` | One image with its full history |
//! | `GET`  | `/history/images/{id}/{dimension}` | One log, oldest record first |
//! | `GET`  | `/history/keywords` | Dimensions with creation metadata |
//! | `GET`  | `/history/keywords/{dimension}` | Active keywords with metadata |
//! | `GET`  | `/history/keywords/{dimension}/{keyword}` | `{}` when deprecated |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
};
use tagbook_core::{
  dimension::DimensionInfo,
  entity::EntityId,
  history::Record,
  keyword::Keyword,
  store::TagStore,
  view::EntityHistory,
};

use crate::{AppState, auth::Reader, error::ApiError};

// ─── Images ───────────────────────────────────────────────────────────────────

/// `GET /history/images`
pub async fn images<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
) -> Result<Json<Vec<EntityHistory>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let all = state.store.all_histories().map_err(ApiError::from_store)?;
  Ok(Json(all))
}

/// `GET /history/images/{id}`
pub async fn image<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path(id): Path<EntityId>,
) -> Result<Json<EntityHistory>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let history = state.store.entity_history(&id).map_err(ApiError::from_store)?;
  Ok(Json(history))
}

/// `GET /history/images/{id}/{dimension}`
pub async fn image_dimension<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path((id, dimension)): Path<(EntityId, String)>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let records = state
    .store
    .full_history(&id, &dimension)
    .map_err(ApiError::from_store)?;
  Ok(Json(records))
}

// ─── Vocabulary ───────────────────────────────────────────────────────────────

/// `GET /history/keywords`
pub async fn dimensions<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
) -> Result<Json<Vec<DimensionInfo>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let dims = state.store.list_dimensions().map_err(ApiError::from_store)?;
  Ok(Json(dims))
}

/// `GET /history/keywords/{dimension}`
pub async fn keywords<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path(dimension): Path<String>,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  active_details(&state, &dimension)
}

/// `GET /history/keywords/{dimension}/{keyword}`
pub async fn keyword<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path((dimension, keyword)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  keyword_detail(&state, &dimension, &keyword)
}

/// Active keywords of `dimension`, keyed by name.
pub(crate) fn active_details<S: TagStore>(
  state: &AppState<S>,
  dimension: &str,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError> {
  let keywords = state
    .store
    .active_keywords(dimension)
    .map_err(ApiError::from_store)?;
  Ok(Json(keywords.into_iter().map(|k| (k.name.clone(), k)).collect()))
}

/// `{name: keyword}` for an active keyword, `{}` for a deprecated one.
pub(crate) fn keyword_detail<S: TagStore>(
  state: &AppState<S>,
  dimension: &str,
  name: &str,
) -> Result<Json<BTreeMap<String, Keyword>>, ApiError> {
  let keyword = state
    .store
    .get_keyword(dimension, name)
    .map_err(ApiError::from_store)?;
  let mut out = BTreeMap::new();
  if keyword.is_active() {
    out.insert(keyword.name.clone(), keyword);
  }
  Ok(Json(out))
}
