//! Handlers for `/images` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/images` | Current values of every image |
//! | `GET`    | `/images/{id}` | Current values of one image |
//! | `GET`    | `/images/{id}/{dimension}` | One resolved value (`null` when absent) |
//! | `PUT`    | `/images/{id}` | Optional body: `{"<dimension>":"<keyword>", ...}`; creates the image |
//! | `POST`   | `/images/{id}` | Body: `{"dimension":..,"keyword":..}`; appends an assignment |
//! | `DELETE` | `/images/{id}` | Body: `{"dimension":..}`; appends an absence |
//!
//! `POST` rather than `PUT` for assignment: it always appends a record, even
//! when the keyword is unchanged.

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use tagbook_core::{
  entity::EntityId,
  keyword::Keyword,
  store::TagStore,
  view::CurrentValues,
};

use crate::{
  AppState,
  auth::Reader,
  error::ApiError,
  extract::JsonBody,
};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /images`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
) -> Result<Json<BTreeMap<EntityId, CurrentValues>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let views = state.store.all_current_values().map_err(ApiError::from_store)?;
  Ok(Json(views.into_iter().map(|v| (v.entity.id, v.values)).collect()))
}

/// `GET /images/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path(id): Path<EntityId>,
) -> Result<Json<CurrentValues>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  current(&state, &id)
}

/// `GET /images/{id}/{dimension}`
pub async fn get_value<S>(
  State(state): State<AppState<S>>,
  _reader: Reader,
  Path((id, dimension)): Path<(EntityId, String)>,
) -> Result<Json<Option<Keyword>>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let value = state
    .store
    .current_value(&id, &dimension)
    .map_err(ApiError::from_store)?;
  Ok(Json(value))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `PUT /images/{id}` — body maps dimension to initial keyword.
///
/// Without a body every dimension starts out absent. Unknown dimensions are
/// ignored and unknown or deprecated keywords start out absent. An existing
/// image is returned unchanged.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Reader(user): Reader,
  Path(id): Path<EntityId>,
  body: Option<JsonBody<BTreeMap<String, String>>>,
) -> Result<Json<CurrentValues>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  let initial = body.map(|JsonBody(map)| map).unwrap_or_default();
  let view = state
    .blocking(move |store| store.create_entity(&id, &initial, &user.username, Utc::now()))
    .await?;
  Ok(Json(view.values))
}

// ─── Assign / unassign ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub dimension: String,
  pub keyword:   String,
}

/// `POST /images/{id}` — body: `{"dimension":"Mood","keyword":"Gory"}`
pub async fn assign<S>(
  State(state): State<AppState<S>>,
  Reader(user): Reader,
  Path(id): Path<EntityId>,
  JsonBody(body): JsonBody<AssignBody>,
) -> Result<Json<CurrentValues>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  state
    .store
    .assign(&id, &body.dimension, &body.keyword, &user.username, Utc::now())
    .map_err(ApiError::from_store)?;
  current(&state, &id)
}

#[derive(Debug, Deserialize)]
pub struct UnassignBody {
  pub dimension: String,
}

/// `DELETE /images/{id}` — body: `{"dimension":"Mood"}`
///
/// Images themselves cannot be deleted; this returns one dimension to the
/// never-tagged state.
pub async fn unassign<S>(
  State(state): State<AppState<S>>,
  Reader(user): Reader,
  Path(id): Path<EntityId>,
  JsonBody(body): JsonBody<UnassignBody>,
) -> Result<Json<CurrentValues>, ApiError>
where
  S: TagStore + Clone + 'static,
{
  state
    .store
    .unassign(&id, &body.dimension, &user.username, Utc::now())
    .map_err(ApiError::from_store)?;
  current(&state, &id)
}

fn current<S: TagStore>(state: &AppState<S>, id: &EntityId) -> Result<Json<CurrentValues>, ApiError> {
  let view = state.store.current_values(id).map_err(ApiError::from_store)?;
  Ok(Json(view.values))
}
