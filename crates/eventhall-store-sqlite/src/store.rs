//! [`SqliteStore`] — the SQLite implementation of the Eventhall store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use eventhall_core::{
  event::{Event, EventPatch, NewEvent},
  identity::{Identity, NewIdentity},
  message::{ContactMessage, NewContactMessage},
  store::{EventStore, IdentityStore, MessageStore},
};

use crate::{
  Error, Result,
  encode::{
    EVENT_COLUMNS, IDENTITY_COLUMNS, MESSAGE_COLUMNS, RawEvent, RawIdentity,
    RawMessage, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Eventhall store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Open one at
/// startup and share it; dropping the last clone closes the connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }
}

/// Whether `err` is a violation of a `UNIQUE` index (as opposed to the
/// primary key or any other constraint).
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  type Error = Error;

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    let email = email.to_owned();

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = ?1"),
            rusqlite::params![email],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn create_identity(&self, input: NewIdentity) -> Result<Option<Identity>> {
    let identity = Identity {
      identity_id: Uuid::new_v4(),
      name:        input.name,
      email:       input.email,
      credential:  input.credential.into(),
      event:       input.event,
      created_at:  Utc::now(),
    };

    let id_str     = encode_uuid(identity.identity_id);
    let name       = identity.name.clone();
    let email      = identity.email.clone();
    let credential = identity.credential.as_phc().to_owned();
    let event      = identity.event.clone();
    let at_str     = encode_dt(identity.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO identities (identity_id, name, email, credential, event, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, credential, event, at_str],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      tracing::debug!("identity insert rejected by email unique index");
      return Ok(None);
    }
    Ok(Some(identity))
  }

  async fn list_identities(&self) -> Result<Vec<Identity>> {
    let raws: Vec<RawIdentity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {IDENTITY_COLUMNS} FROM identities ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn list_events(&self) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events ORDER BY date, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
            rusqlite::params![id_str],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn create_event(&self, input: NewEvent) -> Result<Event> {
    let event = Event {
      event_id:    Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      date:        input.date,
      location:    input.location,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(event.event_id);
    let name        = event.name.clone();
    let description = event.description.clone();
    let date_str    = encode_date(event.date);
    let location    = event.location.clone();
    let at_str      = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, name, description, date, location, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, description, date_str, location, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
    let id_str      = encode_uuid(id);
    let name        = patch.name;
    let description = patch.description;
    let date_str    = patch.date.map(encode_date);
    let location    = patch.location;

    // A single statement, so the update is atomic at row granularity.
    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE events SET
                 name        = COALESCE(?2, name),
                 description = COALESCE(?3, description),
                 date        = COALESCE(?4, date),
                 location    = COALESCE(?5, location)
               WHERE event_id = ?1
               RETURNING {EVENT_COLUMNS}"
            ),
            rusqlite::params![id_str, name, description, date_str, location],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn delete_event(&self, id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("DELETE FROM events WHERE event_id = ?1 RETURNING {EVENT_COLUMNS}"),
            rusqlite::params![id_str],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = Error;

  async fn record_message(&self, input: NewContactMessage) -> Result<ContactMessage> {
    let message = ContactMessage {
      message_id: Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      message:    input.message,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(message.message_id);
    let name   = message.name.clone();
    let email  = message.email.clone();
    let body   = message.message.clone();
    let at_str = encode_dt(message.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_messages (message_id, name, email, message, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }

  async fn list_messages(&self) -> Result<Vec<ContactMessage>> {
    let raws: Vec<RawMessage> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MESSAGE_COLUMNS} FROM contact_messages ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawMessage::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }
}
