//! Domain model for the contact book.
//!
//! # Responsibility
//! - Define the contact entity, its creation/update payloads and id sources.
//!
//! # Invariants
//! - Every contact is identified by a `ContactId` assigned at creation.
//! - Deletion is immediate; there are no tombstones.

pub mod contact;
