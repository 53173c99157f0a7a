//! Plain-text rendering of the list for the terminal front end.

use crate::types::{Filter, Theme, TodoItem, TodoState};
use std::fmt::Write;

const RULE_WIDTH: usize = 44;

/// Renders the whole widget: header, visible items, footer
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{:<width$}{}", "T O D O", theme_icon(state.theme()), width = RULE_WIDTH - 1);
    let _ = writeln!(out, "{rule}");

    let mut any = false;
    for item in state.visible_items() {
        any = true;
        let _ = writeln!(out, "{}", item_line(item));
    }
    if !any {
        let _ = writeln!(out, "  (nothing to show)");
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{}  {}  clear completed",
        state.items_left_label(),
        filter_bar(state.filter())
    );
    out
}

/// One list row: checkbox, id, text
#[must_use]
pub fn item_line(item: &TodoItem) -> String {
    let check = if item.complete { "x" } else { " " };
    format!(" [{check}] {:>3}  {}", item.id, item.text)
}

/// Filter buttons with the active one bracketed
#[must_use]
pub fn filter_bar(active: Filter) -> String {
    Filter::ALL
        .iter()
        .map(|filter| {
            if *filter == active {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header icon of the theme switch
const fn theme_icon(theme: Theme) -> char {
    match theme {
        Theme::Light => '☀',
        Theme::Dark => '☾',
    }
}
