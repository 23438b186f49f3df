//! Gunmetal industrial palette and semantic styling for the console.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const STEEL_BLUE: Color = Color::Rgb(95, 158, 209); // #5f9ed1
pub const AMBER: Color = Color::Rgb(255, 191, 71); // #ffbf47
pub const SIGNAL_GREEN: Color = Color::Rgb(92, 213, 115); // #5cd573
pub const ALERT_RED: Color = Color::Rgb(235, 92, 92); // #eb5c5c
pub const WARNING_ORANGE: Color = Color::Rgb(255, 145, 77); // #ff914d
pub const PALE_CYAN: Color = Color::Rgb(141, 221, 227); // #8ddde3

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(198, 203, 212); // #c6cbd4
pub const BORDER_GRAY: Color = Color::Rgb(92, 102, 120); // #5c6678
pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 46, 56); // #2a2e38
pub const BG_DARK: Color = Color::Rgb(28, 31, 38); // #1c1f26

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(STEEL_BLUE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(PALE_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(PALE_CYAN).add_modifier(Modifier::BOLD)
}

/// Form field label.
pub fn field_label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Focused form field value.
pub fn field_active() -> Style {
    Style::default().fg(AMBER)
}

/// Unfocused form field value.
pub fn field_inactive() -> Style {
    Style::default().fg(PALE_CYAN)
}
