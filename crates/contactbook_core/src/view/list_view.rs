//! Searchable contact list view.
//!
//! # Responsibility
//! - Render the store's filtered projection for the held search term.
//! - Mark the VIP and selected items.
//! - Forward item activation to a single selection handler.
//!
//! # Invariants
//! - Re-renders on every store notification for as long as the view lives.
//! - Only ids present in the last render can be activated.

use crate::model::contact::{Contact, ContactId};
use crate::store::{ContactStore, Subscription};
use crate::view::markup::{class_list, escape_html};
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// One rendered row of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub vip: bool,
    pub selected: bool,
}

#[derive(Default)]
struct ListState {
    search_term: String,
    selected_id: Option<ContactId>,
    items: Vec<ListItem>,
    html: String,
}

type SelectHandler = Rc<dyn Fn(&ContactId)>;

pub struct ContactListView {
    store: Rc<ContactStore>,
    state: RefCell<ListState>,
    select_handler: RefCell<Option<SelectHandler>>,
    subscription: Subscription,
}

impl ContactListView {
    /// Creates the view and subscribes it to `store`.
    ///
    /// Nothing is rendered until the first [`render`](Self::render) call or
    /// store notification.
    pub fn new(store: Rc<ContactStore>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let subscription = store.subscribe(move || {
                if let Some(view) = weak.upgrade() {
                    view.render();
                }
            });
            Self {
                store,
                state: RefCell::new(ListState::default()),
                select_handler: RefCell::new(None),
                subscription,
            }
        })
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state.borrow_mut().search_term = term.into();
        self.render();
    }

    pub fn set_selected_id(&self, id: Option<ContactId>) {
        self.state.borrow_mut().selected_id = id;
        self.render();
    }

    /// Replaces the selection handler.
    pub fn on_select(&self, handler: impl Fn(&ContactId) + 'static) {
        *self.select_handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Size of the current filtered projection, queried live from the store.
    pub fn filtered_count(&self) -> usize {
        let term = self.state.borrow().search_term.clone();
        self.store.get_filtered(&term).len()
    }

    pub fn search_term(&self) -> String {
        self.state.borrow().search_term.clone()
    }

    pub fn selected_id(&self) -> Option<ContactId> {
        self.state.borrow().selected_id.clone()
    }

    /// Rows produced by the last render.
    pub fn items(&self) -> Vec<ListItem> {
        self.state.borrow().items.clone()
    }

    /// Markup produced by the last render.
    pub fn html(&self) -> String {
        self.state.borrow().html.clone()
    }

    /// Recomputes the projection from the store and redraws.
    pub fn render(&self) {
        let (term, selected_id) = {
            let state = self.state.borrow();
            (state.search_term.clone(), state.selected_id.clone())
        };
        let contacts = self.store.get_filtered(&term);

        let items: Vec<ListItem> = contacts
            .into_iter()
            .map(|contact| list_item(contact, selected_id.as_ref()))
            .collect();
        let html = items.iter().map(item_markup).collect::<String>();

        debug!(
            "event=list_render module=view status=ok items={} filtered={}",
            items.len(),
            !term.is_empty()
        );

        let mut state = self.state.borrow_mut();
        state.items = items;
        state.html = html;
    }

    /// Simulates a click on the rendered row for `id`.
    ///
    /// Returns `false` when the id is not rendered or no handler is set.
    pub fn activate(&self, id: &ContactId) -> bool {
        let rendered = self.state.borrow().items.iter().any(|item| &item.id == id);
        if !rendered {
            return false;
        }
        let Some(handler) = self.select_handler.borrow().clone() else {
            return false;
        };
        handler(id);
        true
    }
}

impl Drop for ContactListView {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

fn list_item(contact: Contact, selected_id: Option<&ContactId>) -> ListItem {
    let selected = selected_id == Some(&contact.id);
    ListItem {
        id: contact.id,
        name: contact.name,
        email: contact.email,
        vip: contact.vip,
        selected,
    }
}

fn item_markup(item: &ListItem) -> String {
    format!(
        r#"<div class="{}" data-id="{}"><div class="{}">{}</div><div class="contact-email">{}</div></div>"#,
        class_list("contact-item", &[("selected", item.selected)]),
        escape_html(item.id.as_str()),
        class_list("contact-name", &[("vip", item.vip)]),
        escape_html(&item.name),
        escape_html(&item.email),
    )
}
