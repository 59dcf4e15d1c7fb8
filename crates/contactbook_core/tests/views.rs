use contactbook_core::{
    Contact, ContactFields, ContactId, ContactListView, ContactPatch, ContactStatus,
    ContactStore, DetailPanel, FormField, MemoryStorage, PanelMode, SequentialIdGenerator,
    SubmitOutcome,
};
use std::cell::RefCell;
use std::rc::Rc;

fn store() -> Rc<ContactStore> {
    Rc::new(
        ContactStore::open_with_generator(
            Rc::new(MemoryStorage::new()),
            Box::new(SequentialIdGenerator::new("c")),
        )
        .unwrap(),
    )
}

fn add(store: &ContactStore, name: &str, email: &str) -> Contact {
    store.add(ContactFields::new(name, email)).unwrap()
}

#[test]
fn list_renders_on_store_notification() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    assert!(view.items().is_empty());

    add(&store, "John Doe", "john@test.com");

    let items = view.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "John Doe");
    assert!(view.html().contains(r#"<div class="contact-email">john@test.com</div>"#));
}

#[test]
fn list_applies_search_term_and_counts() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    add(&store, "John Doe", "john@test.com");
    add(&store, "Jane Smith", "jane@test.com");

    view.set_search_term("JANE");
    assert_eq!(view.filtered_count(), 1);
    assert_eq!(view.items()[0].name, "Jane Smith");

    view.set_search_term("");
    assert_eq!(view.filtered_count(), 2);
}

#[test]
fn list_marks_selected_and_vip_items() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    let plain = add(&store, "Plain", "plain@test.com");
    store
        .add(ContactFields::new("Star", "star@test.com").with_vip(true))
        .unwrap();

    view.set_selected_id(Some(plain.id.clone()));

    let items = view.items();
    assert!(items[0].selected && !items[0].vip);
    assert!(!items[1].selected && items[1].vip);
    let html = view.html();
    assert!(html.contains(r#"<div class="contact-item selected" data-id="c-1">"#));
    assert!(html.contains(r#"<div class="contact-name vip">Star</div>"#));
}

#[test]
fn list_escapes_contact_text() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    add(&store, "<script>alert(1)</script>", "a&b@test.com");

    let html = view.html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("a&amp;b@test.com"));
}

#[test]
fn activate_fires_handler_only_for_rendered_ids() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    let john = add(&store, "John", "john@test.com");
    let jane = add(&store, "Jane", "jane@test.com");

    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&selected);
    view.on_select(move |id| sink.borrow_mut().push(id.clone()));

    view.set_search_term("john");
    assert!(view.activate(&john.id));
    assert!(!view.activate(&jane.id));
    assert!(!view.activate(&ContactId::new("missing")));

    assert_eq!(*selected.borrow(), vec![john.id]);
}

#[test]
fn on_select_replaces_previous_handler() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    let john = add(&store, "John", "john@test.com");

    let hits = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&hits);
    view.on_select(move |_| first.borrow_mut().push("first"));
    let second = Rc::clone(&hits);
    view.on_select(move |_| second.borrow_mut().push("second"));

    view.activate(&john.id);
    assert_eq!(*hits.borrow(), vec!["second"]);
}

#[test]
fn dropped_list_view_unsubscribes_from_store() {
    let store = store();
    let view = ContactListView::new(Rc::clone(&store));
    assert_eq!(store.observer_count(), 1);
    drop(view);
    assert_eq!(store.observer_count(), 0);
}

#[test]
fn panel_starts_hidden_and_shows_create_defaults() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    assert!(!panel.is_visible());
    assert!(panel.html().contains(r#"class="detail-panel hidden""#));

    panel.show(None);

    assert_eq!(panel.mode(), PanelMode::Creating);
    assert!(!panel.delete_visible());
    assert_eq!(panel.focused_field(), Some(FormField::Name));
    let draft = panel.draft();
    assert_eq!(draft.name, "");
    assert_eq!(draft.status, ContactStatus::Active);
    assert!(!draft.vip);
    assert!(panel
        .html()
        .contains(r#"class="btn-danger hidden" id="delete-btn""#));
}

#[test]
fn panel_edit_mode_copies_snapshot() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = store
        .add(
            ContactFields::new("Ann", "ann@test.com")
                .with_status(ContactStatus::Inactive)
                .with_vip(true),
        )
        .unwrap();

    panel.show(Some(&contact));
    panel.set_name("Changed in form");

    assert_eq!(panel.mode(), PanelMode::Editing(contact.id.clone()));
    assert!(panel.delete_visible());
    assert_eq!(store.get_by_id(&contact.id).unwrap().name, "Ann");
    let html = panel.html();
    assert!(html.contains(r#"value="inactive" checked"#));
    assert!(html.contains(r#"id="vip" name="vip" checked"#));
}

#[test]
fn submit_in_create_mode_adds_trimmed_contact() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);
    panel.on_save(move |contact| sink.borrow_mut().push(contact.clone()));

    panel.show(None);
    panel.set_name("  New Person ");
    panel.set_email(" new@test.com ");
    panel.set_vip(true);

    let contact = match panel.submit().unwrap() {
        SubmitOutcome::Created(contact) => contact,
        other => panic!("expected created outcome, got {other:?}"),
    };
    assert_eq!(contact.name, "New Person");
    assert_eq!(contact.email, "new@test.com");
    assert!(contact.vip);
    assert_eq!(store.get_all(), vec![contact.clone()]);
    assert_eq!(*saved.borrow(), vec![contact]);
}

#[test]
fn submit_in_edit_mode_updates_and_rereads() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, "Ann", "ann@test.com");
    let saved = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&saved);
    panel.on_save(move |contact| *sink.borrow_mut() = Some(contact.clone()));

    panel.show(Some(&contact));
    panel.set_status(ContactStatus::Inactive);
    let outcome = panel.submit().unwrap();

    let expected = store.get_by_id(&contact.id).unwrap();
    assert_eq!(expected.status, ContactStatus::Inactive);
    assert_eq!(outcome, SubmitOutcome::Updated(expected.clone()));
    assert_eq!(saved.borrow().clone(), Some(expected));
    assert_eq!(store.len(), 1);
}

#[test]
fn submit_with_blank_required_field_is_rejected() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let saved = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&saved);
    panel.on_save(move |_| *sink.borrow_mut() += 1);

    panel.show(None);
    panel.set_name("Someone");
    panel.set_email("   ");

    assert_eq!(panel.submit().unwrap(), SubmitOutcome::Rejected);
    assert!(store.is_empty());
    assert_eq!(*saved.borrow(), 0);
    assert!(panel.is_visible());
}

#[test]
fn submit_while_hidden_is_ignored() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    assert_eq!(panel.submit().unwrap(), SubmitOutcome::Ignored);
    assert!(store.is_empty());
}

#[test]
fn submit_for_vanished_contact_skips_save_event() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, "Ann", "ann@test.com");
    let saved = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&saved);
    panel.on_save(move |_| *sink.borrow_mut() += 1);

    panel.show(Some(&contact));
    store.delete(&contact.id).unwrap();

    assert_eq!(
        panel.submit().unwrap(),
        SubmitOutcome::Vanished(contact.id.clone())
    );
    assert_eq!(*saved.borrow(), 0);
    assert!(store.is_empty());
}

#[test]
fn delete_click_reports_id_without_touching_store() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, "Ann", "ann@test.com");
    let deleted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&deleted);
    panel.on_delete(move |id| sink.borrow_mut().push(id.clone()));

    panel.show(None);
    assert!(!panel.click_delete());

    panel.show(Some(&contact));
    assert!(panel.click_delete());

    assert_eq!(*deleted.borrow(), vec![contact.id.clone()]);
    assert!(store.get_by_id(&contact.id).is_some());
}

#[test]
fn cancel_click_only_invokes_handler() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, "Ann", "ann@test.com");
    let cancelled = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&cancelled);
    panel.on_cancel(move || *sink.borrow_mut() += 1);

    panel.show(Some(&contact));
    panel.set_name("Draft only");
    assert!(panel.click_cancel());

    assert_eq!(*cancelled.borrow(), 1);
    assert_eq!(store.get_by_id(&contact.id).unwrap().name, "Ann");
}

#[test]
fn hide_discards_draft_and_binding() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, "Ann", "ann@test.com");

    panel.show(Some(&contact));
    panel.hide();

    assert_eq!(panel.mode(), PanelMode::Hidden);
    assert_eq!(panel.draft().name, "");
    assert_eq!(panel.focused_field(), None);
}

#[test]
fn panel_escapes_field_values() {
    let store = store();
    let panel = DetailPanel::new(Rc::clone(&store));
    let contact = add(&store, r#""><img src=x>"#, "x@test.com");
    store
        .update(&contact.id, &ContactPatch::default().vip(false))
        .unwrap();

    panel.show(store.get_by_id(&contact.id).as_ref());

    let html = panel.html();
    assert!(!html.contains("<img"));
    assert!(html.contains(r#"value="&quot;&gt;&lt;img src=x&gt;""#));
}
