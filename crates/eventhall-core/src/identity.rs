//! Identity — a registered person's credential record.
//!
//! [`Identity`] carries the [`StoredCredential`] and is deliberately not
//! `Serialize`. Everything that leaves the process goes through
//! [`PublicIdentity`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credential::{CredentialHash, StoredCredential};

/// A persisted identity, as read back from the store.
#[derive(Debug, Clone)]
pub struct Identity {
  pub identity_id: Uuid,
  pub name:        String,
  /// Natural lookup key; compared case-sensitively and unique in the store.
  pub email:       String,
  pub credential:  StoredCredential,
  /// Free-text reference to the event the person signed up for.
  pub event:       String,
  pub created_at:  DateTime<Utc>,
}

impl Identity {
  pub fn public(&self) -> PublicIdentity {
    PublicIdentity {
      identity_id: self.identity_id,
      name:        self.name.clone(),
      email:       self.email.clone(),
      event:       self.event.clone(),
      created_at:  self.created_at,
    }
  }
}

/// The fields of an [`Identity`] that may be returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
  pub identity_id: Uuid,
  pub name:        String,
  pub email:       String,
  pub event:       String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::IdentityStore::create_identity`].
///
/// `identity_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:       String,
  pub email:      String,
  pub credential: CredentialHash,
  pub event:      String,
}
