//! Observable store layer.
//!
//! # Responsibility
//! - Hold the authoritative contact sequence behind a publish/subscribe API.
//! - Translate storage and serialization failures into `StoreError`.
//!
//! # Invariants
//! - The store is the only component that reads or writes
//!   [`CONTACTS_STORAGE_KEY`].

use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod contact_store;
mod observer;

pub use contact_store::ContactStore;
pub use observer::Subscription;

/// Durable key holding the JSON-serialized contact sequence.
pub const CONTACTS_STORAGE_KEY: &str = "contacts";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize contacts: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
