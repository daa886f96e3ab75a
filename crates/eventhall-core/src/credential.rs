//! Password policy — the only place a plaintext credential is ever touched.
//!
//! [`PasswordPolicy::hash_credential`] turns a plaintext into an Argon2id PHC
//! string wrapped in [`CredentialHash`]. [`PasswordPolicy::verify_credential`]
//! checks a plaintext attempt against a stored hash. Nothing outside this
//! module compares plaintexts against stored representations.

use std::fmt;

use argon2::{
  Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
  Version, password_hash::SaltString,
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::{Error, Result};

/// Longest plaintext ever fed to a verification, independent of the
/// configured `max_length`, so lowering that setting cannot lock out
/// existing identities.
pub const VERIFY_LENGTH_CEILING: usize = 4096;

// ─── CredentialHash ──────────────────────────────────────────────────────────

/// A freshly computed salted one-way representation of a password (an
/// Argon2 PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$…`).
///
/// Only [`PasswordPolicy::hash_credential`] constructs one, and
/// [`crate::identity::NewIdentity`] only accepts this type, so a plaintext
/// can never reach the store.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
  /// The PHC string, for writing to storage.
  pub fn as_phc(&self) -> &str { &self.0 }
}

impl fmt::Debug for CredentialHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("CredentialHash(<redacted>)")
  }
}

// ─── StoredCredential ────────────────────────────────────────────────────────

/// A credential representation as read back from storage.
///
/// Not validated on read: a corrupt row simply never verifies. There is no
/// conversion back into a [`CredentialHash`].
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential(String);

impl StoredCredential {
  pub fn new(phc: impl Into<String>) -> Self { Self(phc.into()) }

  pub fn as_phc(&self) -> &str { &self.0 }
}

impl From<CredentialHash> for StoredCredential {
  fn from(hash: CredentialHash) -> Self { Self(hash.0) }
}

impl fmt::Debug for StoredCredential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("StoredCredential(<redacted>)")
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Argon2id work factor and input limits.
///
/// The defaults (19 MiB, 2 passes, 1 lane) put a single verification in the
/// 50–100 ms range on commodity hardware.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordPolicyConfig {
  pub memory_kib:  u32,
  pub iterations:  u32,
  pub parallelism: u32,
  /// Longest plaintext accepted for new credentials, in bytes.
  pub max_length:  usize,
}

impl Default for PasswordPolicyConfig {
  fn default() -> Self {
    Self {
      memory_kib:  19 * 1024,
      iterations:  2,
      parallelism: 1,
      max_length:  128,
    }
  }
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Hashes and verifies credentials with a fixed Argon2id configuration.
///
/// Cloning is cheap; the policy holds only parameters and one precomputed
/// hash used to equalise timing for unknown identities.
#[derive(Clone)]
pub struct PasswordPolicy {
  argon2:     Argon2<'static>,
  max_length: usize,
  decoy:      StoredCredential,
}

impl PasswordPolicy {
  pub fn new(config: &PasswordPolicyConfig) -> Result<Self> {
    let params = Params::new(
      config.memory_kib,
      config.iterations,
      config.parallelism,
      None,
    )
    .map_err(|e| Error::PolicyParams(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let decoy = hash_with(&argon2, "eventhall-decoy-credential")?.into();

    Ok(Self { argon2, max_length: config.max_length, decoy })
  }

  pub fn max_length(&self) -> usize { self.max_length }

  /// Hash `plaintext` with a fresh random salt.
  ///
  /// Fails with [`Error::EmptyCredential`] or [`Error::CredentialTooLong`]
  /// before doing any work.
  pub fn hash_credential(&self, plaintext: &str) -> Result<CredentialHash> {
    if plaintext.is_empty() {
      return Err(Error::EmptyCredential);
    }
    if plaintext.len() > self.max_length {
      return Err(Error::CredentialTooLong { max: self.max_length });
    }
    hash_with(&self.argon2, plaintext)
  }

  /// Check `plaintext` against `credential`. Never fails: malformed hashes,
  /// empty attempts, and attempts over [`VERIFY_LENGTH_CEILING`] simply do
  /// not match.
  pub fn verify_credential(
    &self,
    plaintext: &str,
    credential: &StoredCredential,
  ) -> bool {
    if plaintext.is_empty() || plaintext.len() > VERIFY_LENGTH_CEILING {
      return false;
    }
    let Ok(parsed) = PasswordHash::new(credential.as_phc()) else {
      return false;
    };
    self
      .argon2
      .verify_password(plaintext.as_bytes(), &parsed)
      .is_ok()
  }

  /// [`hash_credential`](Self::hash_credential) on the blocking thread pool.
  pub async fn spawn_hash(&self, plaintext: String) -> Result<CredentialHash> {
    let policy = self.clone();
    tokio::task::spawn_blocking(move || policy.hash_credential(&plaintext))
      .await
      .map_err(|e| Error::Hashing(e.to_string()))?
  }

  /// [`verify_credential`](Self::verify_credential) on the blocking thread
  /// pool. A panicked or cancelled task counts as a mismatch.
  pub async fn spawn_verify(
    &self,
    plaintext: String,
    credential: StoredCredential,
  ) -> bool {
    let policy = self.clone();
    tokio::task::spawn_blocking(move || {
      policy.verify_credential(&plaintext, &credential)
    })
    .await
    .unwrap_or(false)
  }

  /// Run a verification against a decoy hash and discard the result, so a
  /// lookup miss costs about as much as a wrong password.
  pub async fn spawn_decoy_verify(&self, plaintext: String) {
    let decoy = self.decoy.clone();
    self.spawn_verify(plaintext, decoy).await;
  }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> Result<CredentialHash> {
  let salt = SaltString::generate(&mut OsRng);
  let phc = argon2
    .hash_password(plaintext.as_bytes(), &salt)
    .map_err(|e| Error::Hashing(e.to_string()))?
    .to_string();
  Ok(CredentialHash(phc))
}

#[cfg(test)]
pub(crate) fn test_policy() -> PasswordPolicy {
  PasswordPolicy::new(&PasswordPolicyConfig {
    memory_kib:  64,
    iterations:  1,
    parallelism: 1,
    max_length:  32,
  })
  .unwrap()
}
