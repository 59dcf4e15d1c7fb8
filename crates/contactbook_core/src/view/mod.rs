//! Headless view components.
//!
//! # Responsibility
//! - Project store state into renderable rows and markup.
//! - Model user interaction (clicks, typing, submit) as method calls.
//!
//! # Invariants
//! - Views never write durable storage directly.
//! - All contact text in markup is escaped by `markup::escape_html`.

pub mod detail_panel;
pub mod list_view;
pub mod markup;
