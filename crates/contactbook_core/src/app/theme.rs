//! Dark-mode presentation preference.
//!
//! # Invariants
//! - Only this module reads or writes [`DARK_MODE_STORAGE_KEY`].
//! - Stored as the text `"true"` or `"false"`; any other value loads as light.

use crate::storage::{KeyValueStorage, StorageResult};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Durable key holding the dark-mode flag.
pub const DARK_MODE_STORAGE_KEY: &str = "darkMode";

/// Document-wide theme state with explicit load and apply-and-persist steps.
pub struct ThemePreference {
    storage: Rc<dyn KeyValueStorage>,
    dark: Cell<bool>,
}

impl ThemePreference {
    /// Reads the stored flag once. Does not write.
    pub fn load(storage: Rc<dyn KeyValueStorage>) -> StorageResult<Self> {
        let saved = storage.get_item(DARK_MODE_STORAGE_KEY)?;
        let dark = saved.as_deref() == Some("true");
        debug!("event=theme_load module=app status=ok dark={dark}");
        Ok(Self {
            storage,
            dark: Cell::new(dark),
        })
    }

    pub fn is_dark(&self) -> bool {
        self.dark.get()
    }

    /// Persists `enabled`, then applies it to the presentation state.
    ///
    /// A failed write leaves the applied state unchanged.
    pub fn apply_and_persist(&self, enabled: bool) -> StorageResult<()> {
        self.storage
            .set_item(DARK_MODE_STORAGE_KEY, if enabled { "true" } else { "false" })?;
        self.dark.set(enabled);
        debug!("event=theme_apply module=app status=ok dark={enabled}");
        Ok(())
    }

    /// Class applied to the document body, if any.
    pub fn body_class(&self) -> Option<&'static str> {
        self.is_dark().then_some("dark")
    }
}
