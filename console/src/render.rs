//! Text rendering for the console.

use crate::error::Notice;
use ferrand_engine::{markup, KeyValueStore, ListItem};
use std::fmt::Write;

/// Render the list the way a selectable list box shows it.
pub fn list(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "  (no entries)\n".to_string();
    }

    let width = items
        .iter()
        .map(|item| item.id.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "  [{:>width$}] {}", item.id, item.label, width = width);
    }
    out
}

/// Render a notice as a two-line block.
pub fn notice(notice: &Notice) -> String {
    format!("! {}\n  {}\n", notice.title, notice.message)
}

/// Render the store as escaped XML, or `None` if there is nothing to show.
pub fn xml(store: &KeyValueStore, line_break: &str) -> Option<String> {
    markup::render_markup(&store.to_markup(), line_break)
}
