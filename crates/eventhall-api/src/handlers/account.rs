//! Handlers for registration, login, and the admin registrations listing.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/register` | Body: `{"name","email","password","event"}`; 201 |
//! | `POST` | `/api/login` | Body: `{"email","password"}`; 200 |
//! | `GET`  | `/api/admin/register` | Public identity fields only |
//!
//! The workflows themselves live in [`eventhall_core::account`]; this module
//! only maps their outcomes onto HTTP.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use eventhall_core::{
  account::{self, AccountError, LoginRequest, RegisterRequest},
  identity::PublicIdentity,
  store::IdentityStore,
};
use serde_json::json;

use crate::{AppState, error::ApiError};

const INVALID_LOGIN: &str = "Invalid email or password";

fn register_error(err: AccountError) -> ApiError {
  match err {
    AccountError::MissingField(_) => ApiError::bad_request("All fields are required"),
    AccountError::InvalidInput(_) => ApiError::bad_request("Invalid password"),
    AccountError::DuplicateIdentity => ApiError::bad_request("User already exists"),
    AccountError::PersistenceError(source) => ApiError::Internal {
      message: "Error registering user",
      source,
    },
    // Not produced by registration.
    AccountError::IdentityNotFound | AccountError::InvalidCredentials => {
      ApiError::bad_request(INVALID_LOGIN)
    }
  }
}

/// With `reveal_unknown_email` off, an unknown email and a wrong password
/// produce the same response.
fn login_error(err: AccountError, reveal_unknown_email: bool) -> ApiError {
  match err {
    AccountError::MissingField(_) => {
      ApiError::bad_request("Email and password are required")
    }
    AccountError::IdentityNotFound if reveal_unknown_email => {
      ApiError::not_found("User not found")
    }
    AccountError::InvalidCredentials if reveal_unknown_email => {
      ApiError::bad_request("Invalid credentials")
    }
    AccountError::IdentityNotFound
    | AccountError::InvalidCredentials
    | AccountError::InvalidInput(_)
    | AccountError::DuplicateIdentity => ApiError::bad_request(INVALID_LOGIN),
    AccountError::PersistenceError(source) => ApiError::Internal {
      message: "Error logging in",
      source,
    },
  }
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /api/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IdentityStore,
{
  let Json(request) = body?;

  let user = account::register(state.store.as_ref(), &state.policy, request)
    .await
    .map_err(register_error)?;

  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "User registered successfully", "user": user })),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `POST /api/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IdentityStore,
{
  let Json(request) = body?;

  let user = account::login(state.store.as_ref(), &state.policy, request)
    .await
    .map_err(|e| login_error(e, state.config.reveal_unknown_email))?;

  Ok(Json(json!({ "message": "Login successful", "user": user })))
}

// ─── Registrations ────────────────────────────────────────────────────────────

/// `GET /api/admin/register`
pub async fn list_registrations<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<PublicIdentity>>, ApiError>
where
  S: IdentityStore,
{
  let identities = state
    .store
    .list_identities()
    .await
    .map_err(ApiError::internal("Error fetching registrations"))?;
  Ok(Json(identities.iter().map(|i| i.public()).collect()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn login_failures_are_indistinguishable_by_default() {
    let unknown = login_error(AccountError::IdentityNotFound, false);
    let wrong = login_error(AccountError::InvalidCredentials, false);
    assert_eq!(unknown.to_string(), wrong.to_string());
  }

  #[test]
  fn login_failures_are_distinct_when_revealed() {
    assert!(matches!(
      login_error(AccountError::IdentityNotFound, true),
      ApiError::NotFound(_)
    ));
    assert!(matches!(
      login_error(AccountError::InvalidCredentials, true),
      ApiError::BadRequest(_)
    ));
  }

  #[test]
  fn register_persistence_failure_is_internal() {
    let err = register_error(AccountError::PersistenceError(Box::new(
      std::io::Error::other("boom"),
    )));
    assert!(matches!(
      err,
      ApiError::Internal { message: "Error registering user", .. }
    ));
  }
}
