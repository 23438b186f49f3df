//! Device configuration screen — device table plus the device form,
//! collection rule list, and rule form modals.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
};
use tokio::sync::mpsc::UnboundedSender;

use sentra_core::{CollectionRule, Device, Parity};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::modal::ModalMode;
use crate::theme;
use crate::widgets::centered_rect;
use crate::widgets::form::{FocusMove, Form};

// ── Device form ──────────────────────────────────────────────────────

/// Field order in the device form. Indexes into `Form::fields`.
mod device_field {
    pub const NAME: usize = 0;
    pub const CODE: usize = 1;
    pub const TABLE: usize = 2;
    pub const INTERFACE: usize = 3;
    pub const ADDRESS: usize = 4;
    pub const BAUD_RATE: usize = 5;
    pub const DATA_BITS: usize = 6;
    pub const STOP_BITS: usize = 7;
    pub const PARITY: usize = 8;
    pub const PROTOCOL: usize = 9;
    pub const UNIT_ID: usize = 10;
    pub const READ_TIMEOUT: usize = 11;
    pub const WRITE_TIMEOUT: usize = 12;
}

struct DeviceForm {
    form: Form,
    mode: ModalMode,
    /// Retained so an edit round-trips the record id and run state.
    id: Option<String>,
    status: bool,
}

impl DeviceForm {
    fn new(mode: ModalMode, seed: Option<&Device>) -> Self {
        let s = |f: fn(&Device) -> String| seed.map(f).unwrap_or_default();
        Self {
            form: Form::new(vec![
                ("Name", s(|d| d.name.clone())),
                ("Code", s(|d| d.code.clone())),
                ("Table", s(|d| d.table.clone())),
                (
                    "Interface",
                    seed.map_or_else(|| "RS485".into(), |d| d.interface_type.clone()),
                ),
                ("Address", s(|d| d.address.clone())),
                (
                    "Baud rate",
                    seed.map_or_else(|| "9600".into(), |d| d.baud_rate.to_string()),
                ),
                (
                    "Data bits",
                    seed.map_or_else(|| "8".into(), |d| d.data_bits.to_string()),
                ),
                (
                    "Stop bits",
                    seed.map_or_else(|| "1".into(), |d| d.stop_bits.to_string()),
                ),
                (
                    "Parity (N/E/O)",
                    seed.map_or_else(|| "N".into(), |d| d.parity.clone()),
                ),
                (
                    "Protocol",
                    seed.map_or_else(|| "Modbus".into(), |d| d.protocol_type.clone()),
                ),
                ("Unit id", s(|d| d.device_address.clone())),
                (
                    "Read timeout (ms)",
                    seed.map_or_else(|| "1000".into(), |d| d.read_timeout.to_string()),
                ),
                (
                    "Write timeout (ms)",
                    seed.map_or_else(|| "1000".into(), |d| d.write_timeout.to_string()),
                ),
            ]),
            mode,
            id: seed.and_then(|d| d.id.clone()),
            status: seed.is_some_and(|d| d.status),
        }
    }

    /// Parse the form into a record, or an operator-facing error.
    fn build(&self) -> std::result::Result<Device, String> {
        let text = |idx: usize| self.form.value(idx).trim().to_owned();
        let number = |idx: usize, label: &str| {
            self.form
                .value(idx)
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("{label} must be a number"))
        };

        let name = text(device_field::NAME);
        if name.is_empty() {
            return Err("Name cannot be empty".into());
        }
        let code = text(device_field::CODE);
        if code.is_empty() {
            return Err("Code cannot be empty".into());
        }

        Ok(Device {
            id: self.id.clone(),
            status: self.status,
            name,
            code,
            table: text(device_field::TABLE),
            interface_type: text(device_field::INTERFACE),
            address: text(device_field::ADDRESS),
            baud_rate: number(device_field::BAUD_RATE, "Baud rate")?,
            data_bits: number(device_field::DATA_BITS, "Data bits")?,
            stop_bits: number(device_field::STOP_BITS, "Stop bits")?,
            parity: text(device_field::PARITY),
            protocol_type: text(device_field::PROTOCOL),
            device_address: text(device_field::UNIT_ID),
            read_timeout: number(device_field::READ_TIMEOUT, "Read timeout")?,
            write_timeout: number(device_field::WRITE_TIMEOUT, "Write timeout")?,
        })
    }
}

// ── Rule modals ──────────────────────────────────────────────────────

struct RuleList {
    rules: Vec<CollectionRule>,
    table_state: TableState,
    device_id: String,
    device_name: String,
}

mod rule_field {
    pub const DESCRIPTION: usize = 0;
    pub const FUNC_CODE: usize = 1;
    pub const START_POINT: usize = 2;
    pub const END_POINT: usize = 3;
}

struct RuleForm {
    form: Form,
    mode: ModalMode,
    id: Option<String>,
    device_id: Option<String>,
}

impl RuleForm {
    fn new(mode: ModalMode, seed: Option<&CollectionRule>, device_id: Option<String>) -> Self {
        Self {
            form: Form::new(vec![
                (
                    "Description",
                    seed.map(|r| r.description.clone()).unwrap_or_default(),
                ),
                (
                    "Function code",
                    seed.map_or_else(|| "3".into(), |r| r.rule_func_code.to_string()),
                ),
                (
                    "Start point",
                    seed.map(|r| r.start_point.clone()).unwrap_or_default(),
                ),
                (
                    "End point",
                    seed.map(|r| r.end_point.clone()).unwrap_or_default(),
                ),
            ]),
            mode,
            id: seed.and_then(|r| r.id.clone()),
            device_id: seed.and_then(|r| r.device_id.clone()).or(device_id),
        }
    }

    fn build(&self) -> std::result::Result<CollectionRule, String> {
        let description = self.form.value(rule_field::DESCRIPTION).trim().to_owned();
        if description.is_empty() {
            return Err("Description cannot be empty".into());
        }
        let rule_func_code = self
            .form
            .value(rule_field::FUNC_CODE)
            .trim()
            .parse::<u8>()
            .map_err(|_| "Function code must be a number".to_owned())?;

        Ok(CollectionRule {
            id: self.id.clone(),
            description,
            rule_func_code,
            start_point: self.form.value(rule_field::START_POINT).trim().to_owned(),
            end_point: self.form.value(rule_field::END_POINT).trim().to_owned(),
            device_id: self.device_id.clone(),
        })
    }
}

// ── Screen ───────────────────────────────────────────────────────────

pub struct DevicesScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    devices: Vec<Device>,
    table_state: TableState,
    device_form: Option<DeviceForm>,
    rule_list: Option<RuleList>,
    rule_form: Option<RuleForm>,
}

impl DevicesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            devices: Vec::new(),
            table_state: TableState::default(),
            device_form: None,
            rule_list: None,
            rule_form: None,
        }
    }

    fn selected_device(&self) -> Option<&Device> {
        self.devices.get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, idx: usize) {
        if self.devices.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(self.devices.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let len = self.devices.len() as i64;
        if len == 0 {
            return;
        }
        let cur = self.table_state.selected().unwrap_or(0) as i64;
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        self.select(((cur + delta).clamp(0, len - 1)) as usize);
    }

    // ── Key handling per layer ──────────────────────────────────────

    fn handle_device_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.device_form.as_mut()?;
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => match form.build() {
                Ok(device) => Some(Action::SaveDevice(Box::new(device))),
                Err(msg) => Some(Action::Notify(Notification::error(msg))),
            },
            _ => {
                if let Some(mv) = Form::is_focus_key(key) {
                    match mv {
                        FocusMove::Next => form.form.focus_next(),
                        FocusMove::Prev => form.form.focus_prev(),
                    }
                } else {
                    form.form.handle_key(key);
                }
                None
            }
        }
    }

    fn handle_rule_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.rule_form.as_mut()?;
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => match form.build() {
                Ok(rule) => Some(Action::SaveRule(Box::new(rule))),
                Err(msg) => Some(Action::Notify(Notification::error(msg))),
            },
            _ => {
                if let Some(mv) = Form::is_focus_key(key) {
                    match mv {
                        FocusMove::Next => form.form.focus_next(),
                        FocusMove::Prev => form.form.focus_prev(),
                    }
                } else {
                    form.form.handle_key(key);
                }
                None
            }
        }
    }

    fn handle_rule_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        let list = self.rule_list.as_mut()?;
        let len = list.rules.len();
        let selected = list.table_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    list.table_state.select(Some((selected + 1).min(len - 1)));
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                list.table_state.select(Some(selected.saturating_sub(1)));
                None
            }
            KeyCode::Char('a') => Some(Action::OpenRuleForm(ModalMode::Create, None)),
            KeyCode::Char('e') | KeyCode::Enter => {
                let rule = list.rules.get(selected)?;
                rule.id.clone().map(Action::EditRule)
            }
            KeyCode::Char('d') => {
                let rule = list.rules.get(selected)?;
                let id = rule.id.clone()?;
                Some(Action::RequestDeleteRule {
                    id,
                    description: rule.description.clone(),
                })
            }
            _ => None,
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => {
                self.move_selection(1);
                None
            }
            (_, KeyCode::Char('k') | KeyCode::Up) => {
                self.move_selection(-1);
                None
            }
            (_, KeyCode::Char('g')) => {
                self.select(0);
                None
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                self.select(self.devices.len().saturating_sub(1));
                None
            }
            (_, KeyCode::Char('a')) => Some(Action::OpenDeviceForm(ModalMode::Create, None)),
            (_, KeyCode::Char('e') | KeyCode::Enter) => {
                // Edit always re-fetches by id so the form never seeds
                // from a stale list row.
                let device = self.selected_device()?;
                device.id.clone().map(Action::EditDevice)
            }
            (_, KeyCode::Char('d')) => {
                let device = self.selected_device()?;
                let id = device.id.clone()?;
                Some(Action::RequestDeleteDevice {
                    id,
                    name: device.name.clone(),
                })
            }
            (_, KeyCode::Char('s')) => {
                let device = self.selected_device()?;
                let id = device.id.clone()?;
                Some(Action::ToggleDeviceStatus {
                    id,
                    name: device.name.clone(),
                    start: !device.status,
                })
            }
            (_, KeyCode::Char('r')) => {
                let device = self.selected_device()?;
                let id = device.id.clone()?;
                if let Some(tx) = &self.action_tx {
                    let _ = tx.send(Action::SelectDevice(Some(id.clone())));
                }
                self.rule_list = Some(RuleList {
                    rules: Vec::new(),
                    table_state: TableState::default(),
                    device_id: id,
                    device_name: device.name.clone(),
                });
                Some(Action::OpenRuleList)
            }
            (KeyModifiers::SHIFT, KeyCode::Char('R')) => Some(Action::ReloadDevices),
            _ => None,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Devices ")
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

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if self.devices.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  no devices",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let header = Row::new(
                ["Name", "Code", "State", "Interface", "Address", "Baud", "Parity", "Unit"]
                    .map(Cell::from),
            )
            .style(theme::table_header());

            let rows: Vec<Row> = self
                .devices
                .iter()
                .map(|d| {
                    let (state, state_style) = if d.status {
                        ("running", Style::default().fg(theme::SIGNAL_GREEN))
                    } else {
                        ("stopped", Style::default().fg(theme::ALERT_RED))
                    };
                    Row::new(vec![
                        Cell::from(d.name.clone()),
                        Cell::from(d.code.clone()),
                        Cell::from(Span::styled(state, state_style)),
                        Cell::from(d.interface_type.clone()),
                        Cell::from(d.address.clone()),
                        Cell::from(d.baud_rate.to_string()),
                        Cell::from(Parity::from_wire(&d.parity).label()),
                        Cell::from(d.device_address.clone()),
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
                    Constraint::Length(10),
                    Constraint::Min(12),
                    Constraint::Length(7),
                    Constraint::Length(7),
                    Constraint::Length(5),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " a add  e edit  d delete  s start/stop  r rules  R reload",
                theme::key_hint(),
            ))),
            layout[1],
        );
    }

    fn render_device_form(&self, frame: &mut Frame, area: Rect, form: &DeviceForm) {
        let dialog = centered_rect(area, 52, 17);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let block = Block::default()
            .title(format!(" {} Device ", form.mode.title_verb()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        form.form.render(frame, layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Tab next field  Enter save  Esc cancel",
                theme::key_hint(),
            ))),
            layout[1],
        );
    }

    fn render_rule_list(&self, frame: &mut Frame, area: Rect, list: &RuleList) {
        let dialog = centered_rect(area, 64, 16);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let block = Block::default()
            .title(format!(" Collection Rules — {} ", list.device_name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if list.rules.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  no collection rules",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let header = Row::new(["Description", "Func", "Start", "End"].map(Cell::from))
                .style(theme::table_header());
            let rows: Vec<Row> = list
                .rules
                .iter()
                .map(|r| {
                    Row::new(vec![
                        Cell::from(r.description.clone()),
                        Cell::from(r.rule_func_code.to_string()),
                        Cell::from(r.start_point.clone()),
                        Cell::from(r.end_point.clone()),
                    ])
                    .style(theme::table_row())
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Min(20),
                    Constraint::Length(6),
                    Constraint::Length(12),
                    Constraint::Length(12),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());
            let mut state = list.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " a add  e edit  d delete  Esc close",
                theme::key_hint(),
            ))),
            layout[1],
        );
    }

    fn render_rule_form(&self, frame: &mut Frame, area: Rect, form: &RuleForm) {
        let dialog = centered_rect(area, 46, 8);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let block = Block::default()
            .title(format!(" {} Rule ", form.mode.title_verb()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        form.form.render(frame, layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Tab next field  Enter save  Esc cancel",
                theme::key_hint(),
            ))),
            layout[1],
        );
    }
}

impl Component for DevicesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Topmost layer wins: rule form, then device form, then list, then table.
        if self.rule_form.is_some() {
            return Ok(self.handle_rule_form_key(key));
        }
        if self.device_form.is_some() {
            return Ok(self.handle_device_form_key(key));
        }
        if self.rule_list.is_some() {
            return Ok(self.handle_rule_list_key(key));
        }
        Ok(self.handle_table_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesLoaded(devices) => {
                self.devices.clone_from(devices);
                let selected = self.table_state.selected().unwrap_or(0);
                self.select(selected);
            }
            Action::OpenDeviceForm(mode, seed) => {
                self.device_form = Some(DeviceForm::new(*mode, seed.as_deref()));
            }
            Action::OpenRuleForm(mode, seed) => {
                let device_id = self.rule_list.as_ref().map(|l| l.device_id.clone());
                self.rule_form = Some(RuleForm::new(*mode, seed.as_deref(), device_id));
            }
            Action::RulesLoaded(rules) => {
                if let Some(list) = self.rule_list.as_mut() {
                    list.rules.clone_from(rules);
                    let selected = list.table_state.selected().unwrap_or(0);
                    if list.rules.is_empty() {
                        list.table_state.select(None);
                    } else {
                        list.table_state
                            .select(Some(selected.min(list.rules.len() - 1)));
                    }
                }
            }
            Action::CloseModal => {
                // Mirrors the modal stack: the rule form closes back to the
                // list when it was opened from it.
                if self.rule_form.is_some() {
                    self.rule_form = None;
                } else if self.device_form.is_some() {
                    self.device_form = None;
                } else {
                    self.rule_list = None;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_table(frame, area);

        if let Some(list) = &self.rule_list {
            if self.rule_form.is_none() {
                self.render_rule_list(frame, area, list);
            }
        }
        if let Some(form) = &self.device_form {
            self.render_device_form(frame, area, form);
        }
        if let Some(form) = &self.rule_form {
            self.render_rule_form(frame, area, form);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn modal_active(&self) -> bool {
        self.device_form.is_some() || self.rule_list.is_some() || self.rule_form.is_some()
    }
}
