//! System monitor screen — live device snapshot, header aggregates,
//! per-device alarm drill-down, and the gateway system commands.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use sentra_core::{AlarmDetail, AlarmSeverity, DeviceMonitor, MonitorStats};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::centered_rect;

/// Drill-down overlay lifecycle for one device's alarms.
enum AlarmOverlay {
    Loading { device_id: i64, device_name: String },
    Loaded { device_name: String, alarms: Vec<AlarmDetail> },
    Error { device_name: String, message: String },
}

/// What the path prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathPrompt {
    Import,
    Template,
}

pub struct MonitorScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    rows: Vec<DeviceMonitor>,
    stats: MonitorStats,
    table_state: TableState,
    /// True until the first snapshot lands; drives the throbber.
    loading: bool,
    throbber_state: throbber_widgets_tui::ThrobberState,
    overlay: Option<AlarmOverlay>,
    prompt: Option<(PathPrompt, Input)>,
}

impl MonitorScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            rows: Vec::new(),
            stats: MonitorStats::default(),
            table_state: TableState::default(),
            loading: true,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            overlay: None,
            prompt: None,
        }
    }

    fn selected_row(&self) -> Option<&DeviceMonitor> {
        self.rows.get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, idx: usize) {
        if self.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(self.rows.len() - 1)));
        }
    }

    // ── Key handling ────────────────────────────────────────────────

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        let (kind, input) = self.prompt.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                None
            }
            KeyCode::Enter => {
                let value = input.value().trim().to_owned();
                let kind = *kind;
                self.prompt = None;
                if value.is_empty() {
                    return Some(Action::Notify(Notification::error("Path cannot be empty")));
                }
                match kind {
                    PathPrompt::Import => Some(Action::ImportConfig(value.into())),
                    PathPrompt::Template => Some(Action::DownloadTemplate(value.into())),
                }
            }
            _ => {
                input.handle_event(&crossterm::event::Event::Key(key));
                None
            }
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.overlay = None;
                None
            }
            _ => None,
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let selected = self.table_state.selected().unwrap_or(0);
                self.select(selected + 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let selected = self.table_state.selected().unwrap_or(0);
                self.table_state.select(Some(selected.saturating_sub(1)));
                None
            }
            KeyCode::Enter => {
                let row = self.selected_row()?;
                if row.current_alarm_count == 0 {
                    return Some(Action::Notify(Notification::info(format!(
                        "{} has no active alarms",
                        row.name
                    ))));
                }
                let device_id = row.id;
                let device_name = row.name.clone();
                self.overlay = Some(AlarmOverlay::Loading {
                    device_id,
                    device_name,
                });
                Some(Action::LoadAlarms(device_id))
            }
            KeyCode::Char('r') => Some(Action::ReloadMonitor),
            KeyCode::Char('P') => Some(Action::PauseCollection),
            KeyCode::Char('F') => Some(Action::FlushQueue),
            KeyCode::Char('C') => Some(Action::ShowConfirm(ConfirmAction::ClearData)),
            KeyCode::Char('I') => {
                self.prompt = Some((PathPrompt::Import, Input::default()));
                None
            }
            KeyCode::Char('T') => {
                self.prompt = Some((
                    PathPrompt::Template,
                    Input::from(String::from("sentra-template.xlsx")),
                ));
                None
            }
            _ => None,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" devices ", theme::key_hint()),
            Span::styled(
                self.stats.total_devices.to_string(),
                Style::default().fg(theme::PALE_CYAN),
            ),
            Span::styled("   online ", theme::key_hint()),
            Span::styled(
                self.stats.online_devices.to_string(),
                Style::default().fg(theme::SIGNAL_GREEN),
            ),
            Span::styled("   alarming ", theme::key_hint()),
            Span::styled(
                self.stats.alarm_devices.to_string(),
                Style::default().fg(theme::ALERT_RED),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" System Monitor ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        self.render_stats(frame, layout[0]);

        if self.loading {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("loading snapshot\u{2026}")
                .style(Style::default().fg(theme::PALE_CYAN));
            let mut state = self.throbber_state.clone();
            frame.render_stateful_widget(throbber, layout[1], &mut state);
        } else if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  no devices",
                    theme::key_hint(),
                ))),
                layout[1],
            );
        } else {
            let header = Row::new(
                ["Name", "Code", "Status", "Points", "Alarms", "Last seen"].map(Cell::from),
            )
            .style(theme::table_header());

            let rows: Vec<Row> = self
                .rows
                .iter()
                .map(|r| {
                    let (status, status_style) = if r.is_online() {
                        ("online", Style::default().fg(theme::SIGNAL_GREEN))
                    } else {
                        ("offline", Style::default().fg(theme::ALERT_RED))
                    };
                    let alarm_style = if r.current_alarm_count > 0 {
                        Style::default().fg(theme::ALERT_RED)
                    } else {
                        theme::table_row()
                    };
                    Row::new(vec![
                        Cell::from(r.name.clone()),
                        Cell::from(r.code.clone()),
                        Cell::from(Span::styled(status, status_style)),
                        Cell::from(r.total_points.to_string()),
                        Cell::from(Span::styled(
                            r.current_alarm_count.to_string(),
                            alarm_style,
                        )),
                        Cell::from(
                            r.last_communication_time
                                .format("%Y-%m-%d %H:%M:%S")
                                .to_string(),
                        ),
                    ])
                    .style(theme::table_row())
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Min(14),
                    Constraint::Length(8),
                    Constraint::Length(8),
                    Constraint::Length(7),
                    Constraint::Length(7),
                    Constraint::Length(20),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[1], &mut state);
        }

        if let Some((kind, input)) = &self.prompt {
            let label = match kind {
                PathPrompt::Import => " import file: ",
                PathPrompt::Template => " save template to: ",
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(label, theme::key_hint_key()),
                    Span::styled(input.value().to_owned(), theme::field_active()),
                    Span::styled("█", theme::field_active()),
                ])),
                layout[2],
            );
        } else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " Enter alarms  r refresh  P pause  F flush  C clear  I import  T template",
                    theme::key_hint(),
                ))),
                layout[2],
            );
        }
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, overlay: &AlarmOverlay) {
        let dialog = centered_rect(area, 70, 14);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let name = match overlay {
            AlarmOverlay::Loading { device_name, .. }
            | AlarmOverlay::Loaded { device_name, .. }
            | AlarmOverlay::Error { device_name, .. } => device_name,
        };

        let block = Block::default()
            .title(format!(" Alarms — {name} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ALERT_RED));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        match overlay {
            AlarmOverlay::Loading { .. } => {
                let throbber = throbber_widgets_tui::Throbber::default()
                    .label("loading alarms\u{2026}")
                    .style(Style::default().fg(theme::PALE_CYAN));
                let mut state = self.throbber_state.clone();
                frame.render_stateful_widget(throbber, inner, &mut state);
            }
            AlarmOverlay::Error { message, .. } => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        format!(" {message}"),
                        Style::default().fg(theme::ALERT_RED),
                    ))),
                    inner,
                );
            }
            AlarmOverlay::Loaded { alarms, .. } => {
                if alarms.is_empty() {
                    frame.render_widget(
                        Paragraph::new(Line::from(Span::styled(
                            "  no active alarms",
                            theme::key_hint(),
                        ))),
                        inner,
                    );
                    return;
                }
                let header = Row::new(
                    ["Point", "Description", "Value", "Level", "Condition"].map(Cell::from),
                )
                .style(theme::table_header());
                let rows: Vec<Row> = alarms
                    .iter()
                    .map(|a| {
                        let level_style = match AlarmSeverity::from_wire(&a.level) {
                            AlarmSeverity::High => Style::default().fg(theme::ALERT_RED),
                            AlarmSeverity::Medium => {
                                Style::default().fg(theme::WARNING_ORANGE)
                            }
                            AlarmSeverity::Low => Style::default().fg(theme::AMBER),
                        };
                        Row::new(vec![
                            Cell::from(a.point.clone()),
                            Cell::from(a.description.clone()),
                            Cell::from(a.current_value.clone()),
                            Cell::from(Span::styled(a.level.clone(), level_style)),
                            Cell::from(a.condition.clone()),
                        ])
                        .style(theme::table_row())
                    })
                    .collect();
                let table = Table::new(
                    rows,
                    [
                        Constraint::Min(10),
                        Constraint::Min(16),
                        Constraint::Length(10),
                        Constraint::Length(7),
                        Constraint::Min(10),
                    ],
                )
                .header(header);
                frame.render_widget(table, inner);
            }
        }
    }
}

impl Component for MonitorScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.overlay.is_some() {
            return Ok(self.handle_overlay_key(key));
        }
        if self.prompt.is_some() {
            return Ok(self.handle_prompt_key(key));
        }
        Ok(self.handle_table_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.throbber_state.calc_next();
            }
            Action::MonitorLoaded { rows, stats } => {
                self.rows.clone_from(rows);
                self.stats = *stats;
                self.loading = false;
                let selected = self.table_state.selected().unwrap_or(0);
                self.select(selected);
            }
            Action::AlarmsLoaded { device_id, result } => {
                // Only adopt the response the overlay is still waiting for.
                if let Some(AlarmOverlay::Loading {
                    device_id: waiting,
                    device_name,
                }) = &self.overlay
                {
                    if waiting == device_id {
                        let device_name = device_name.clone();
                        self.overlay = Some(match result {
                            Ok(alarms) => AlarmOverlay::Loaded {
                                device_name,
                                alarms: alarms.clone(),
                            },
                            Err(message) => AlarmOverlay::Error {
                                device_name,
                                message: message.clone(),
                            },
                        });
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_table(frame, area);
        if let Some(overlay) = &self.overlay {
            self.render_overlay(frame, area, overlay);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn modal_active(&self) -> bool {
        self.overlay.is_some() || self.prompt.is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::{KeyCode, KeyEvent};

    use sentra_core::{DeviceMonitor, MonitorStats};

    use crate::action::Action;
    use crate::component::Component;

    use super::{AlarmOverlay, MonitorScreen};

    fn row(id: i64, alarms: u32) -> DeviceMonitor {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("dev{id}"),
            "code": format!("D{id:02}"),
            "totalPoints": 4,
            "currentAlarmCount": alarms,
            "status": "在线",
            "lastCommunicationTime": "2024-06-15T10:30:00Z"
        }))
        .unwrap()
    }

    fn load(screen: &mut MonitorScreen, rows: Vec<DeviceMonitor>) {
        let stats = MonitorStats::from_rows(&rows);
        screen
            .update(&Action::MonitorLoaded { rows, stats })
            .unwrap();
    }

    #[test]
    fn drilldown_only_opens_for_alarming_devices() {
        let mut screen = MonitorScreen::new();
        load(&mut screen, vec![row(1, 0)]);

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert!(screen.overlay.is_none());

        load(&mut screen, vec![row(2, 3)]);
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::LoadAlarms(2))));
        assert!(matches!(
            screen.overlay,
            Some(AlarmOverlay::Loading { device_id: 2, .. })
        ));
    }

    #[test]
    fn alarm_response_for_a_different_device_is_ignored() {
        let mut screen = MonitorScreen::new();
        load(&mut screen, vec![row(2, 3)]);
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();

        screen
            .update(&Action::AlarmsLoaded {
                device_id: 99,
                result: Ok(Vec::new()),
            })
            .unwrap();
        assert!(matches!(
            screen.overlay,
            Some(AlarmOverlay::Loading { device_id: 2, .. })
        ));

        screen
            .update(&Action::AlarmsLoaded {
                device_id: 2,
                result: Err("gateway unreachable".into()),
            })
            .unwrap();
        assert!(matches!(screen.overlay, Some(AlarmOverlay::Error { .. })));
    }

    #[test]
    fn clear_data_is_gated_behind_confirmation() {
        let mut screen = MonitorScreen::new();
        load(&mut screen, vec![row(1, 0)]);
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('C')))
            .unwrap();
        assert!(matches!(action, Some(Action::ShowConfirm(_))));
    }
}
