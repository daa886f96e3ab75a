//! Error types for `eventhall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("credential must not be empty")]
  EmptyCredential,

  #[error("credential exceeds the maximum length of {max} bytes")]
  CredentialTooLong { max: usize },

  #[error("invalid password policy parameters: {0}")]
  PolicyParams(String),

  #[error("hashing failed: {0}")]
  Hashing(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
