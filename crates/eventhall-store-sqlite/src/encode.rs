//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, and
//! UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use eventhall_core::{
  credential::StoredCredential, event::Event, identity::Identity,
  message::ContactMessage,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const IDENTITY_COLUMNS: &str =
  "identity_id, name, email, credential, event, created_at";

/// Raw strings read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id: String,
  pub name:        String,
  pub email:       String,
  pub credential:  String,
  pub event:       String,
  pub created_at:  String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id: row.get(0)?,
      name:        row.get(1)?,
      email:       row.get(2)?,
      credential:  row.get(3)?,
      event:       row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      identity_id: decode_uuid(&self.identity_id)?,
      name:        self.name,
      email:       self.email,
      credential:  StoredCredential::new(self.credential),
      event:       self.event,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const EVENT_COLUMNS: &str =
  "event_id, name, description, date, location, created_at";

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub name:        String,
  pub description: String,
  pub date:        String,
  pub location:    String,
  pub created_at:  String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      date:        row.get(3)?,
      location:    row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      name:        self.name,
      description: self.description,
      date:        decode_date(&self.date)?,
      location:    self.location,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const MESSAGE_COLUMNS: &str = "message_id, name, email, message, created_at";

/// Raw strings read directly from a `contact_messages` row.
pub struct RawMessage {
  pub message_id: String,
  pub name:       String,
  pub email:      String,
  pub message:    String,
  pub created_at: String,
}

impl RawMessage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      message_id: row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      message:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_message(self) -> Result<ContactMessage> {
    Ok(ContactMessage {
      message_id: decode_uuid(&self.message_id)?,
      name:       self.name,
      email:      self.email,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_round_trips_through_column_format() {
    let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    assert_eq!(encode_date(d), "2025-03-09");
    assert_eq!(decode_date("2025-03-09").unwrap(), d);
  }

  #[test]
  fn bad_date_is_a_parse_error() {
    assert!(matches!(decode_date("09/03/2025"), Err(Error::DateParse(_))));
  }
}
