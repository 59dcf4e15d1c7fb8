//! Contact domain model and entity factory.
//!
//! # Responsibility
//! - Define the single persisted entity and its field bundles.
//! - Assign identifiers at creation time through an `IdGenerator`.
//!
//! # Invariants
//! - `id` is assigned once by the factory and never reassigned.
//! - Merging a `ContactPatch` never touches `id`, even when the patch was
//!   deserialized from a payload that carried one.
//! - Serialized field names (`id`, `name`, `email`, `status`, `vip`) are part
//!   of the durable storage contract.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Contact lifecycle flag shown as a radio choice in the detail form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// The persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub status: ContactStatus,
    pub vip: bool,
}

impl Contact {
    /// Returns the caller-editable part of this contact.
    pub fn fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.clone(),
            email: self.email.clone(),
            status: self.status,
            vip: self.vip,
        }
    }

    /// Applies every present field of `patch`; `id` stays as is.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(vip) = patch.vip {
            self.vip = vip;
        }
    }

    /// Case-insensitive substring match over `name` or `email`.
    ///
    /// `needle_lower` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.email.to_lowercase().contains(needle_lower)
    }
}

/// Field bundle for creating a contact (everything except `id`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub vip: bool,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ContactStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_vip(mut self, vip: bool) -> Self {
        self.vip = vip;
        self
    }
}

impl From<ContactFields> for ContactPatch {
    fn from(value: ContactFields) -> Self {
        Self {
            id: None,
            name: Some(value.name),
            email: Some(value.email),
            status: Some(value.status),
            vip: Some(value.vip),
        }
    }
}

/// Partial update payload. Absent fields keep their current value.
///
/// `id` is accepted so external payloads deserialize cleanly, but
/// [`Contact::apply`] ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<bool>,
}

impl ContactPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn status(mut self, status: ContactStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn vip(mut self, vip: bool) -> Self {
        self.vip = Some(vip);
        self
    }
}

/// Source of fresh contact identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> ContactId;
}

/// Random v4 UUIDs. Default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> ContactId {
        ContactId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix>-<n>` identifiers starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> ContactId {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        ContactId(format!("{}-{next}", self.prefix))
    }
}

/// Builds a contact from caller fields and a freshly generated id.
pub fn create_contact(generator: &dyn IdGenerator, fields: ContactFields) -> Contact {
    Contact {
        id: generator.next_id(),
        name: fields.name,
        email: fields.email,
        status: fields.status,
        vip: fields.vip,
    }
}
