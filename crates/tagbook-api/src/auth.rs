//! HTTP Basic-auth extractors.
//!
//! Every route requires a configured user. Vocabulary and dimension writes
//! additionally require a restricted (curator) user.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Deserialize;
use tagbook_core::store::TagStore;

use crate::{AppState, error::ApiError};

/// One configured account.
#[derive(Clone, Deserialize)]
pub struct UserConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  /// Curators may change dimensions and vocabulary.
  #[serde(default)]
  pub restricted:    bool,
}

/// Credentials accepted by this server instance.
#[derive(Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserConfig>,
}

/// The authenticated caller; its `username` is recorded as author of writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub username:   String,
  pub restricted: bool,
}

/// Any authenticated user.
pub struct Reader(pub User);

/// An authenticated restricted user.
pub struct Curator(pub User);

/// Verify Basic credentials from `headers` against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<User, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let account = config
    .users
    .iter()
    .find(|u| u.username == username)
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(User {
    username:   account.username.clone(),
    restricted: account.restricted,
  })
}

impl<S> FromRequestParts<AppState<S>> for Reader
where
  S: TagStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Reader(verify_auth(&parts.headers, &state.auth)?))
  }
}

impl<S> FromRequestParts<AppState<S>> for Curator
where
  S: TagStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_auth(&parts.headers, &state.auth)?;
    if !user.restricted {
      tracing::debug!(user = %user.username, "curator route refused");
      return Err(ApiError::Forbidden);
    }
    Ok(Curator(user))
  }
}

/// Argon2 PHC string with cheap parameters; verification reads them back
/// from the string, so tests stay fast.
#[cfg(test)]
pub(crate) fn cheap_hash(password: &str) -> String {
  use argon2::{Algorithm, Params, PasswordHasher, Version, password_hash::SaltString};
  use rand_core::OsRng;

  let argon = Argon2::new(
    Algorithm::Argon2id,
    Version::V0x13,
    Params::new(1024, 1, 1, None).unwrap(),
  );
  let salt = SaltString::generate(&mut OsRng);
  argon.hash_password(password.as_bytes(), &salt).unwrap().to_string()
}
