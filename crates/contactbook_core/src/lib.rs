//! Core logic for the contact book.
//! This crate owns the contact store, its durable backing and the headless
//! views that render and edit it.

pub mod app;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod view;

pub use app::{AppError, AppResult, ContactApp, ThemePreference, DARK_MODE_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{
    create_contact, Contact, ContactFields, ContactId, ContactPatch, ContactStatus, IdGenerator,
    SequentialIdGenerator, UuidIdGenerator,
};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteKeyValueStorage, StorageError, StorageResult};
pub use store::{ContactStore, StoreError, StoreResult, Subscription, CONTACTS_STORAGE_KEY};
pub use view::detail_panel::{ContactDraft, DetailPanel, FormField, PanelMode, SubmitOutcome};
pub use view::list_view::{ContactListView, ListItem};
pub use view::markup::escape_html;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
