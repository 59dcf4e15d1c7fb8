//! Create/edit form for a single contact.
//!
//! # Responsibility
//! - Hold a transient draft copied from a contact snapshot (or defaults).
//! - Turn a submit into `ContactStore::add`/`update` and report the result to
//!   the save handler.
//! - Report delete and cancel clicks; deletion itself is the caller's job.
//!
//! # Invariants
//! - The draft is never a live reference into the store.
//! - Hidden panels hold no id and ignore submit/delete clicks.
//! - Submit with a blank (trimmed) name or email changes nothing.

use crate::model::contact::{Contact, ContactFields, ContactId, ContactPatch, ContactStatus};
use crate::store::{ContactStore, StoreResult};
use crate::view::markup::{checked, class_list, escape_html};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Visibility and binding of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMode {
    Hidden,
    Creating,
    Editing(ContactId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Status,
    Vip,
}

/// Field values currently typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub status: ContactStatus,
    pub vip: bool,
}

impl ContactDraft {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            status: contact.status,
            vip: contact.vip,
        }
    }

    /// Required-field check on trimmed name and email.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Converts the draft into store input, trimming text fields.
    pub fn to_fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            status: self.status,
            vip: self.vip,
        }
    }
}

/// What a submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Contact),
    Updated(Contact),
    /// The edited contact disappeared before it could be re-read; no save
    /// event fired.
    Vanished(ContactId),
    /// Required fields were blank.
    Rejected,
    /// Panel was hidden.
    Ignored,
}

struct PanelState {
    mode: PanelMode,
    draft: ContactDraft,
    focused: Option<FormField>,
}

type SaveHandler = Rc<dyn Fn(&Contact)>;
type DeleteHandler = Rc<dyn Fn(&ContactId)>;
type CancelHandler = Rc<dyn Fn()>;

pub struct DetailPanel {
    store: Rc<ContactStore>,
    state: RefCell<PanelState>,
    save_handler: RefCell<Option<SaveHandler>>,
    delete_handler: RefCell<Option<DeleteHandler>>,
    cancel_handler: RefCell<Option<CancelHandler>>,
}

impl DetailPanel {
    /// Creates a hidden panel bound to `store`.
    pub fn new(store: Rc<ContactStore>) -> Rc<Self> {
        Rc::new(Self {
            store,
            state: RefCell::new(PanelState {
                mode: PanelMode::Hidden,
                draft: ContactDraft::default(),
                focused: None,
            }),
            save_handler: RefCell::new(None),
            delete_handler: RefCell::new(None),
            cancel_handler: RefCell::new(None),
        })
    }

    /// Opens the form: `None` for a new contact, `Some` to edit a snapshot.
    ///
    /// Focus moves to the name field.
    pub fn show(&self, contact: Option<&Contact>) {
        let mut state = self.state.borrow_mut();
        match contact {
            Some(contact) => {
                state.mode = PanelMode::Editing(contact.id.clone());
                state.draft = ContactDraft::from_contact(contact);
            }
            None => {
                state.mode = PanelMode::Creating;
                state.draft = ContactDraft::default();
            }
        }
        state.focused = Some(FormField::Name);
    }

    /// Closes the form and discards the draft.
    pub fn hide(&self) {
        let mut state = self.state.borrow_mut();
        state.mode = PanelMode::Hidden;
        state.draft = ContactDraft::default();
        state.focused = None;
    }

    pub fn on_save(&self, handler: impl Fn(&Contact) + 'static) {
        *self.save_handler.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn on_delete(&self, handler: impl Fn(&ContactId) + 'static) {
        *self.delete_handler.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn on_cancel(&self, handler: impl Fn() + 'static) {
        *self.cancel_handler.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn mode(&self) -> PanelMode {
        self.state.borrow().mode.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().mode != PanelMode::Hidden
    }

    /// The delete button is only offered while editing.
    pub fn delete_visible(&self) -> bool {
        matches!(self.state.borrow().mode, PanelMode::Editing(_))
    }

    pub fn draft(&self) -> ContactDraft {
        self.state.borrow().draft.clone()
    }

    pub fn focused_field(&self) -> Option<FormField> {
        self.state.borrow().focused
    }

    pub fn set_name(&self, value: impl Into<String>) {
        self.edit(FormField::Name, |draft| draft.name = value.into());
    }

    pub fn set_email(&self, value: impl Into<String>) {
        self.edit(FormField::Email, |draft| draft.email = value.into());
    }

    pub fn set_status(&self, status: ContactStatus) {
        self.edit(FormField::Status, |draft| draft.status = status);
    }

    pub fn set_vip(&self, vip: bool) {
        self.edit(FormField::Vip, |draft| draft.vip = vip);
    }

    fn edit(&self, field: FormField, apply: impl FnOnce(&mut ContactDraft)) {
        let mut state = self.state.borrow_mut();
        apply(&mut state.draft);
        state.focused = Some(field);
    }

    /// Handles the form submit.
    ///
    /// # Errors
    /// - Propagates store persistence failures; the panel stays open.
    pub fn submit(&self) -> StoreResult<SubmitOutcome> {
        let (mode, draft) = {
            let state = self.state.borrow();
            (state.mode.clone(), state.draft.clone())
        };

        if mode == PanelMode::Hidden {
            return Ok(SubmitOutcome::Ignored);
        }
        if !draft.is_complete() {
            debug!("event=ui_submit module=view status=rejected reason=required_field");
            return Ok(SubmitOutcome::Rejected);
        }

        let fields = draft.to_fields();
        match mode {
            PanelMode::Creating => {
                let contact = self.store.add(fields)?;
                info!("event=ui_submit module=view status=ok op=create id={}", contact.id);
                self.emit_save(&contact);
                Ok(SubmitOutcome::Created(contact))
            }
            PanelMode::Editing(id) => {
                self.store.update(&id, &ContactPatch::from(fields))?;
                match self.store.get_by_id(&id) {
                    Some(contact) => {
                        info!("event=ui_submit module=view status=ok op=update id={id}");
                        self.emit_save(&contact);
                        Ok(SubmitOutcome::Updated(contact))
                    }
                    None => {
                        info!("event=ui_submit module=view status=vanished op=update id={id}");
                        Ok(SubmitOutcome::Vanished(id))
                    }
                }
            }
            PanelMode::Hidden => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Reports the held id to the delete handler. Returns whether it fired.
    pub fn click_delete(&self) -> bool {
        let PanelMode::Editing(id) = self.mode() else {
            return false;
        };
        let Some(handler) = self.delete_handler.borrow().clone() else {
            return false;
        };
        handler(&id);
        true
    }

    /// Reports a cancel click. Returns whether a handler ran.
    pub fn click_cancel(&self) -> bool {
        let Some(handler) = self.cancel_handler.borrow().clone() else {
            return false;
        };
        handler();
        true
    }

    fn emit_save(&self, contact: &Contact) {
        let handler = self.save_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(contact);
        }
    }

    /// Renders the panel container with its inline form.
    pub fn html(&self) -> String {
        let state = self.state.borrow();
        let hidden = state.mode == PanelMode::Hidden;
        let editing = matches!(state.mode, PanelMode::Editing(_));
        let draft = &state.draft;
        let active = draft.status == ContactStatus::Active;

        format!(
            concat!(
                r#"<div id="detail-panel" class="{panel_class}">"#,
                r#"<form id="detail-form">"#,
                r#"<div class="form-group"><label for="name">Name</label>"#,
                r#"<input type="text" id="name" name="name" value="{name}" required{name_focus}></div>"#,
                r#"<div class="form-group"><label for="email">Email</label>"#,
                r#"<input type="email" id="email" name="email" value="{email}" required></div>"#,
                r#"<div class="form-group"><label>Status</label><div class="radio-group">"#,
                r#"<label><input type="radio" name="status" value="active"{active}> Active</label>"#,
                r#"<label><input type="radio" name="status" value="inactive"{inactive}> Inactive</label>"#,
                r#"</div></div>"#,
                r#"<div class="form-group"><label><input type="checkbox" id="vip" name="vip"{vip}> VIP</label></div>"#,
                r#"<div class="form-actions">"#,
                r#"<button type="submit" class="btn-primary">Save</button>"#,
                r#"<button type="button" class="btn-secondary" id="cancel-btn">Cancel</button>"#,
                r#"<button type="button" class="{delete_class}" id="delete-btn">Delete</button>"#,
                r#"</div></form></div>"#
            ),
            panel_class = class_list("detail-panel", &[("hidden", hidden)]),
            name = escape_html(&draft.name),
            name_focus = if state.focused == Some(FormField::Name) {
                " autofocus"
            } else {
                ""
            },
            email = escape_html(&draft.email),
            active = checked(active),
            inactive = checked(!active),
            vip = checked(draft.vip),
            delete_class = class_list("btn-danger", &[("hidden", !editing)]),
        )
    }
}
