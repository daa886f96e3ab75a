//! Core types, store traits, and account workflows for Eventhall.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`eventhall-store-sqlite`) and the HTTP layer
//! (`eventhall-api`) both depend on it.
//!
//! Passwords only ever enter the store as a [`credential::CredentialHash`],
//! and the only way to produce one from a plaintext is
//! [`credential::PasswordPolicy::hash_credential`]. What comes back out is a
//! [`credential::StoredCredential`], which is only ever compared through
//! [`credential::PasswordPolicy::verify_credential`].

pub mod account;
pub mod credential;
pub mod error;
pub mod event;
pub mod identity;
pub mod message;
pub mod store;

pub use error::{Error, Result};
