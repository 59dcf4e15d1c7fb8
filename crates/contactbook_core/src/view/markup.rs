//! Markup helpers shared by the views.
//!
//! Every contact field interpolated into markup goes through [`escape_html`];
//! the store never escapes on the views' behalf.

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Joins a base class with the modifiers whose flag is set.
pub(crate) fn class_list(base: &str, modifiers: &[(&str, bool)]) -> String {
    let mut classes = base.to_string();
    for (modifier, enabled) in modifiers {
        if *enabled {
            classes.push(' ');
            classes.push_str(modifier);
        }
    }
    classes
}

pub(crate) fn checked(flag: bool) -> &'static str {
    if flag {
        " checked"
    } else {
        ""
    }
}
