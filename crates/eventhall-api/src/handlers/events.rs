//! Handlers for event endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/events`, `/api/admin/events` | Ordered by date |
//! | `POST`   | `/api/admin/events` | Body: [`EventBody`], all fields required; 201 |
//! | `PUT`    | `/api/admin/events/{id}` | Body: [`EventBody`], any subset; 404 if unknown |
//! | `DELETE` | `/api/admin/events/{id}` | 404 if unknown |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate};
use eventhall_core::{
  event::{Event, EventPatch, NewEvent},
  store::EventStore,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::non_blank;
use crate::{AppState, error::ApiError};

/// Request body for creating or updating an event.
#[derive(Debug, Default, Deserialize)]
pub struct EventBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  /// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
  pub date:        Option<String>,
  pub location:    Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
    .map_err(|_| ApiError::bad_request(format!("Invalid date: {raw:?}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/events` and `GET /api/admin/events`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: EventStore,
{
  let events = state
    .store
    .list_events()
    .await
    .map_err(ApiError::internal("Error fetching events"))?;
  Ok(Json(events))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/admin/events`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<EventBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EventStore,
{
  let Json(body) = body?;

  let (Some(name), Some(description), Some(date), Some(location)) = (
    non_blank(body.name),
    non_blank(body.description),
    non_blank(body.date),
    non_blank(body.location),
  ) else {
    return Err(ApiError::bad_request("All fields are required"));
  };
  let date = parse_date(&date)?;

  let event = state
    .store
    .create_event(NewEvent { name, description, date, location })
    .await
    .map_err(ApiError::internal("Error creating event"))?;

  tracing::info!(event_id = %event.event_id, "event created");
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Event created successfully", "event": event })),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Turn a partial body into a patch. Fields that are present must not be
/// blank.
fn patch_from(body: EventBody) -> Result<EventPatch, ApiError> {
  fn field(
    value: Option<String>,
    name: &str,
  ) -> Result<Option<String>, ApiError> {
    match value {
      None => Ok(None),
      Some(v) => non_blank(Some(v))
        .map(Some)
        .ok_or_else(|| ApiError::bad_request(format!("{name} must not be empty"))),
    }
  }

  let patch = EventPatch {
    name:        field(body.name, "name")?,
    description: field(body.description, "description")?,
    date:        field(body.date, "date")?
      .as_deref()
      .map(parse_date)
      .transpose()?,
    location:    field(body.location, "location")?,
  };

  if patch.is_empty() {
    return Err(ApiError::bad_request("No fields to update"));
  }
  Ok(patch)
}

/// `PUT /api/admin/events/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<EventBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EventStore,
{
  let Path(id) = id?;
  let Json(body) = body?;
  let patch = patch_from(body)?;

  let event = state
    .store
    .update_event(id, patch)
    .await
    .map_err(ApiError::internal("Error updating event"))?
    .ok_or_else(|| ApiError::not_found("Event not found"))?;

  tracing::info!(event_id = %id, "event updated");
  Ok(Json(json!({ "message": "Event updated successfully", "event": event })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/admin/events/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EventStore,
{
  let Path(id) = id?;

  state
    .store
    .delete_event(id)
    .await
    .map_err(ApiError::internal("Error deleting event"))?
    .ok_or_else(|| ApiError::not_found("Event not found"))?;

  tracing::info!(event_id = %id, "event deleted");
  Ok(Json(json!({ "message": "Event deleted successfully" })))
}
