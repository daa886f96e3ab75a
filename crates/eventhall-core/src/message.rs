//! Visitor contact-form submissions. Append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
  pub message_id: Uuid,
  pub name:       String,
  pub email:      String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MessageStore::record_message`].
#[derive(Debug, Clone)]
pub struct NewContactMessage {
  pub name:    String,
  pub email:   String,
  pub message: String,
}
