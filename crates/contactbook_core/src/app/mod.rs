//! App coordinator.
//!
//! # Responsibility
//! - Build the store and both views over one storage backing.
//! - Wire selection, form and store callbacks together.
//! - Own page chrome: search term, result badge, dark mode.
//!
//! # Invariants
//! - The badge always equals the list view's filtered count after any UI
//!   event or store notification.
//! - Save, successful delete and cancel close the panel and clear the
//!   selection. A failed delete is logged and leaves the editor open.
//! - Only the delete flow calls `ContactStore::delete`.

use crate::model::contact::{Contact, ContactId};
use crate::storage::{KeyValueStorage, StorageError};
use crate::store::{ContactStore, StoreError, Subscription};
use crate::view::detail_panel::{DetailPanel, SubmitOutcome};
use crate::view::list_view::ContactListView;
use crate::view::markup::{checked, escape_html};
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

pub mod theme;

pub use theme::{ThemePreference, DARK_MODE_STORAGE_KEY};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Storage(StorageError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct ContactApp {
    store: Rc<ContactStore>,
    list_view: Rc<ContactListView>,
    detail_panel: Rc<DetailPanel>,
    theme: ThemePreference,
    badge: Cell<usize>,
    initialized: Cell<bool>,
    badge_subscription: RefCell<Option<Subscription>>,
}

impl ContactApp {
    /// Builds the app over `storage` with random contact ids.
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> AppResult<Rc<Self>> {
        let store = ContactStore::open(storage.clone())?;
        Self::with_store(storage, Rc::new(store))
    }

    /// Builds the app around an existing store sharing `storage`.
    pub fn with_store(
        storage: Rc<dyn KeyValueStorage>,
        store: Rc<ContactStore>,
    ) -> AppResult<Rc<Self>> {
        let theme = ThemePreference::load(storage)?;
        Ok(Rc::new(Self {
            list_view: ContactListView::new(Rc::clone(&store)),
            detail_panel: DetailPanel::new(Rc::clone(&store)),
            store,
            theme,
            badge: Cell::new(0),
            initialized: Cell::new(false),
            badge_subscription: RefCell::new(None),
        }))
    }

    /// Wires callbacks, applies the saved theme and renders the first frame.
    ///
    /// Calling it again is a no-op.
    pub fn init(self: &Rc<Self>) -> AppResult<()> {
        if self.initialized.replace(true) {
            return Ok(());
        }
        self.wire_handlers();
        self.theme.apply_and_persist(self.theme.is_dark())?;
        self.refresh_badge();
        self.list_view.render();
        info!(
            "event=app_init module=app status=ok contacts={} dark={}",
            self.store.len(),
            self.theme.is_dark()
        );
        Ok(())
    }

    fn wire_handlers(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.list_view.on_select(with_app(&weak, |app, id: &ContactId| {
            app.open_existing(id);
        }));

        self.detail_panel.on_save(with_app(&weak, |app, _contact: &Contact| {
            app.close_detail();
            app.refresh_badge();
        }));

        self.detail_panel.on_delete(with_app(&weak, |app, id: &ContactId| {
            match app.store.delete(id) {
                Ok(_) => {
                    app.close_detail();
                    app.refresh_badge();
                }
                Err(err) => {
                    error!("event=ui_delete module=app status=error id={id} error={err}");
                }
            }
        }));

        let cancel_weak = weak.clone();
        self.detail_panel.on_cancel(move || {
            if let Some(app) = cancel_weak.upgrade() {
                app.close_detail();
            }
        });

        let store_weak = weak;
        // Keeps the badge right for mutations that bypass the UI flows.
        let subscription = self.store.subscribe(move || {
            if let Some(app) = store_weak.upgrade() {
                app.refresh_badge();
            }
        });
        *self.badge_subscription.borrow_mut() = Some(subscription);
    }

    /// Search input changed.
    pub fn input_search(&self, term: &str) {
        self.list_view.set_search_term(term);
        self.refresh_badge();
    }

    /// "Add" button clicked.
    pub fn click_add(&self) {
        self.list_view.set_selected_id(None);
        self.detail_panel.show(None);
    }

    /// A list row was clicked. Returns whether the row was rendered.
    pub fn select_contact(&self, id: &ContactId) -> bool {
        self.list_view.activate(id)
    }

    /// Form submitted.
    pub fn submit_detail(&self) -> AppResult<SubmitOutcome> {
        Ok(self.detail_panel.submit()?)
    }

    /// Delete button clicked.
    pub fn delete_detail(&self) -> bool {
        self.detail_panel.click_delete()
    }

    /// Cancel button clicked.
    pub fn cancel_detail(&self) -> bool {
        self.detail_panel.click_cancel()
    }

    /// Dark-mode checkbox changed.
    pub fn toggle_dark_mode(&self, enabled: bool) -> AppResult<()> {
        self.theme.apply_and_persist(enabled)?;
        Ok(())
    }

    pub fn badge(&self) -> usize {
        self.badge.get()
    }

    pub fn search_term(&self) -> String {
        self.list_view.search_term()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn store(&self) -> &Rc<ContactStore> {
        &self.store
    }

    pub fn list_view(&self) -> &Rc<ContactListView> {
        &self.list_view
    }

    pub fn detail_panel(&self) -> &Rc<DetailPanel> {
        &self.detail_panel
    }

    /// Renders the whole document.
    pub fn render_page(&self) -> String {
        let body_class = self
            .theme
            .body_class()
            .map(|class| format!(r#" class="{class}""#))
            .unwrap_or_default();
        format!(
            concat!(
                "<body{body_class}><div id=\"app\"><header>",
                "<input type=\"search\" id=\"search\" placeholder=\"Search contacts\" value=\"{search}\">",
                "<button type=\"button\" id=\"add-btn\">Add</button>",
                "<span id=\"badge\">{badge}</span>",
                "<label><input type=\"checkbox\" id=\"dark-toggle\"{dark}> Dark</label>",
                "</header><main><div id=\"contact-list\">{list}</div>{panel}</main></div></body>"
            ),
            body_class = body_class,
            search = escape_html(&self.search_term()),
            badge = self.badge(),
            dark = checked(self.is_dark_mode()),
            list = self.list_view.html(),
            panel = self.detail_panel.html(),
        )
    }

    fn open_existing(&self, id: &ContactId) {
        if let Some(contact) = self.store.get_by_id(id) {
            self.list_view.set_selected_id(Some(id.clone()));
            self.detail_panel.show(Some(&contact));
        }
    }

    fn close_detail(&self) {
        self.detail_panel.hide();
        self.list_view.set_selected_id(None);
    }

    fn refresh_badge(&self) {
        self.badge.set(self.list_view.filtered_count());
    }
}

impl Drop for ContactApp {
    fn drop(&mut self) {
        if let Some(subscription) = self.badge_subscription.get_mut().take() {
            subscription.unsubscribe();
        }
    }
}

fn with_app<T: ?Sized + 'static>(
    weak: &Weak<ContactApp>,
    handler: impl Fn(&ContactApp, &T) + 'static,
) -> impl Fn(&T) + 'static {
    let weak = weak.clone();
    move |arg: &T| {
        if let Some(app) = weak.upgrade() {
            handler(&*app, arg);
        }
    }
}
