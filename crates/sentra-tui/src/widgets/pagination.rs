//! Pagination bar — renders a [`PageWindow`] as one line of page buttons.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use sentra_core::PageWindow;

use crate::theme;

/// One-line pagination bar: prev arrow, up to five page buttons with the
/// current page highlighted, next arrow, and a record count.
pub fn bar(window: &PageWindow, total_records: u64) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    if window.is_empty() {
        spans.push(Span::styled("  no records", theme::key_hint()));
        return Line::from(spans);
    }

    let arrow = |enabled: bool| {
        if enabled {
            theme::key_hint_key()
        } else {
            theme::key_hint()
        }
    };

    spans.push(Span::styled("  ◀ ", arrow(window.has_prev)));
    for &page in &window.pages {
        if page == window.current {
            spans.push(Span::styled(
                format!("[{page}]"),
                Style::default()
                    .fg(theme::AMBER)
                    .add_modifier(ratatui::style::Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {page} "), theme::table_row()));
        }
    }
    spans.push(Span::styled(" ▶", arrow(window.has_next)));
    spans.push(Span::styled(
        format!(
            "   page {}/{} · {} records",
            window.current, window.total_pages, total_records
        ),
        theme::key_hint(),
    ));

    Line::from(spans)
}
