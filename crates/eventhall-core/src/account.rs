//! Registration and login workflows.
//!
//! Each workflow is one request-scoped pass: validate the input shape, consult
//! the [`IdentityStore`], run the [`PasswordPolicy`], and return either the
//! identity's public fields or an [`AccountError`]. Nothing is retried.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::{
  credential::PasswordPolicy,
  identity::{NewIdentity, PublicIdentity},
  store::IdentityStore,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AccountError {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid input: {0}")]
  InvalidInput(#[source] crate::Error),

  #[error("an identity with this email already exists")]
  DuplicateIdentity,

  #[error("no identity is registered for this email")]
  IdentityNotFound,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("persistence error: {0}")]
  PersistenceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AccountError {
  fn persistence<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::PersistenceError(Box::new(e))
  }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Body of a registration request. Every field is optional at the type level
/// so that absence is reported as [`AccountError::MissingField`] rather than
/// a deserialisation failure.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterRequest {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
  pub event:    Option<String>,
}

/// Body of a login request.
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
  pub email:    Option<String>,
  pub password: Option<String>,
}

impl fmt::Debug for RegisterRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RegisterRequest")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("event", &self.event)
      .finish()
  }
}

impl fmt::Debug for LoginRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoginRequest")
      .field("email", &self.email)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

/// Trimmed value of `field`, or `MissingField` if it is absent or blank.
fn required(
  value: Option<String>,
  field: &'static str,
) -> Result<String, AccountError> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .ok_or(AccountError::MissingField(field))
}

/// Like [`required`] but returns the value untrimmed; passwords are hashed
/// exactly as submitted.
fn required_secret(
  value: Option<String>,
  field: &'static str,
) -> Result<String, AccountError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or(AccountError::MissingField(field))
}

// ─── Workflows ───────────────────────────────────────────────────────────────

/// Register a new identity.
///
/// The pre-insert lookup gives a fast, friendly rejection; the store's
/// uniqueness constraint is what actually guarantees one identity per email.
pub async fn register<S>(
  store: &S,
  policy: &PasswordPolicy,
  request: RegisterRequest,
) -> Result<PublicIdentity, AccountError>
where
  S: IdentityStore,
{
  let name = required(request.name, "name")?;
  let email = required(request.email, "email")?;
  let password = required_secret(request.password, "password")?;
  let event = required(request.event, "event")?;

  let existing = store
    .find_identity_by_email(&email)
    .await
    .map_err(AccountError::persistence)?;
  if existing.is_some() {
    tracing::debug!("registration rejected: email already registered");
    return Err(AccountError::DuplicateIdentity);
  }

  let credential = policy
    .spawn_hash(password)
    .await
    .map_err(AccountError::InvalidInput)?;

  let identity = store
    .create_identity(NewIdentity { name, email, credential, event })
    .await
    .map_err(AccountError::persistence)?
    .ok_or_else(|| {
      tracing::debug!("registration lost a race on the email unique index");
      AccountError::DuplicateIdentity
    })?;

  tracing::info!(identity_id = %identity.identity_id, "identity registered");
  Ok(identity.public())
}

/// Authenticate an existing identity. Never writes to the store.
pub async fn login<S>(
  store: &S,
  policy: &PasswordPolicy,
  request: LoginRequest,
) -> Result<PublicIdentity, AccountError>
where
  S: IdentityStore,
{
  let email = required(request.email, "email")?;
  let password = required_secret(request.password, "password")?;

  let identity = match store
    .find_identity_by_email(&email)
    .await
    .map_err(AccountError::persistence)?
  {
    Some(identity) => identity,
    None => {
      policy.spawn_decoy_verify(password).await;
      tracing::debug!("login rejected: unknown email");
      return Err(AccountError::IdentityNotFound);
    }
  };

  if !policy
    .spawn_verify(password, identity.credential.clone())
    .await
  {
    tracing::debug!(identity_id = %identity.identity_id, "login rejected: wrong password");
    return Err(AccountError::InvalidCredentials);
  }

  tracing::info!(identity_id = %identity.identity_id, "login succeeded");
  Ok(identity.public())
}
