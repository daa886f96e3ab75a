//! Handlers for the visitor contact form.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/contact` | Body: `{"name","email","message"}`; 201 |
//! | `GET`  | `/api/admin/contacts` | All submissions, oldest first |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use eventhall_core::{
  message::{ContactMessage, NewContactMessage},
  store::MessageStore,
};
use serde::Deserialize;
use serde_json::json;

use super::non_blank;
use crate::{AppState, error::ApiError};

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SubmitBody {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub message: Option<String>,
}

/// `POST /api/contact`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MessageStore,
{
  let Json(body) = body?;

  let (Some(name), Some(email), Some(message)) = (
    non_blank(body.name),
    non_blank(body.email),
    non_blank(body.message),
  ) else {
    return Err(ApiError::bad_request("All fields are required"));
  };

  let saved = state
    .store
    .record_message(NewContactMessage { name, email, message })
    .await
    .map_err(ApiError::internal("Error submitting contact form"))?;

  tracing::info!(message_id = %saved.message_id, "contact form submitted");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Contact form submitted successfully" })),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/admin/contacts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ContactMessage>>, ApiError>
where
  S: MessageStore,
{
  let messages = state
    .store
    .list_messages()
    .await
    .map_err(ApiError::internal("Error fetching contact form submissions"))?;
  Ok(Json(messages))
}
