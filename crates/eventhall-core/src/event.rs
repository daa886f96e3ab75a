//! Events listed on the platform.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub name:        String,
  pub description: String,
  pub date:        NaiveDate,
  pub location:    String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::EventStore::create_event`].
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub name:        String,
  pub description: String,
  pub date:        NaiveDate,
  pub location:    String,
}

/// A partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub date:        Option<NaiveDate>,
  pub location:    Option<String>,
}

impl EventPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.description.is_none()
      && self.date.is_none()
      && self.location.is_none()
  }
}
