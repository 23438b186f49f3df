//! Labeled text-field forms used by the record modals.
//!
//! A form is an ordered list of named inputs with one active field.
//! Screens own the field order and do all parsing/validation on submit;
//! this widget only handles focus movement, text editing, and rendering.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::theme;

pub struct FormField {
    pub label: &'static str,
    pub input: Input,
}

pub struct Form {
    pub fields: Vec<FormField>,
    pub active: usize,
}

impl Form {
    /// Build a form from `(label, initial value)` pairs.
    pub fn new(fields: Vec<(&'static str, String)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(label, value)| FormField {
                    label,
                    input: Input::from(value),
                })
                .collect(),
            active: 0,
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields[idx].input.value()
    }

    pub fn focus_next(&mut self) {
        self.active = (self.active + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.active = (self.active + self.fields.len() - 1) % self.fields.len();
    }

    /// Route an editing key to the active field. Focus keys (Tab, arrows)
    /// are handled by the caller.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.input.handle_event(&crossterm::event::Event::Key(key));
        }
    }

    /// Whether `key` is a focus-movement key for forms.
    pub fn is_focus_key(key: KeyEvent) -> Option<FocusMove> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => Some(FocusMove::Next),
            KeyCode::BackTab | KeyCode::Up => Some(FocusMove::Prev),
            _ => None,
        }
    }

    /// Render one field per row, scrolled so the active field stays
    /// visible, with a block cursor on the active value.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = area.height as usize;
        if rows == 0 {
            return;
        }
        let offset = self.active.saturating_sub(rows.saturating_sub(1));

        let label_width = self
            .fields
            .iter()
            .map(|f| f.label.len())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(idx, field)| {
                let active = idx == self.active;
                let value_style = if active {
                    theme::field_active()
                } else {
                    theme::field_inactive()
                };
                let mut spans = vec![
                    Span::styled(
                        format!(" {:<label_width$} ", field.label),
                        theme::field_label(),
                    ),
                    Span::styled(field.input.value().to_owned(), value_style),
                ];
                if active {
                    spans.push(Span::styled("█", value_style));
                }
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Next,
    Prev,
}
