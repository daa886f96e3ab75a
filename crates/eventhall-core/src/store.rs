//! Store traits implemented by storage backends (e.g.
//! `eventhall-store-sqlite`).
//!
//! Higher layers depend on these abstractions, never on a concrete backend.
//! Every method returns a `Send` future so implementations can be shared
//! across a multi-threaded tokio runtime behind an `Arc`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  event::{Event, EventPatch, NewEvent},
  identity::{Identity, NewIdentity},
  message::{ContactMessage, NewContactMessage},
};

// ─── Identities ──────────────────────────────────────────────────────────────

/// Persistent credential records. Identities are created once and never
/// updated or deleted.
pub trait IdentityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up an identity by exact (case-sensitive) email.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Persist a new identity in a single atomic write.
  ///
  /// Returns `Ok(None)` if another identity already holds `input.email`.
  /// Backends must enforce this with a storage-level uniqueness constraint,
  /// not a prior read, so concurrent registrations cannot both succeed.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// All identities, oldest first.
  fn list_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + '_;
}

// ─── Events ──────────────────────────────────────────────────────────────────

pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All events, ordered by date.
  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn create_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Apply `patch` and return the updated event, or `None` if `id` is
  /// unknown.
  fn update_event(
    &self,
    id: Uuid,
    patch: EventPatch,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Delete and return the event, or `None` if `id` is unknown.
  fn delete_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;
}

// ─── Contact messages ────────────────────────────────────────────────────────

pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn record_message(
    &self,
    input: NewContactMessage,
  ) -> impl Future<Output = Result<ContactMessage, Self::Error>> + Send + '_;

  /// All messages, oldest first.
  fn list_messages(
    &self,
  ) -> impl Future<Output = Result<Vec<ContactMessage>, Self::Error>> + Send + '_;
}
