//! Point configuration screen — paged point table, mark search, and the
//! point form modal.

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

use sentra_core::{AlarmLevel, Device, PageIntent, PageWindow, Point, Priority};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::modal::ModalMode;
use crate::theme;
use crate::widgets::centered_rect;
use crate::widgets::form::{FocusMove, Form};
use crate::widgets::pagination;

/// Field order in the point form.
mod point_field {
    pub const TAG: usize = 0;
    pub const FUNCTION_CODE: usize = 1;
    pub const ADDRESS: usize = 2;
    pub const DATA_TYPE: usize = 3;
    pub const DESCRIPTION: usize = 4;
    pub const UNIT: usize = 5;
    pub const MULTIPLIER: usize = 6;
    pub const LUA_EXPRESSION: usize = 7;
    pub const ALARM_FLAG: usize = 8;
    pub const ALARM_LEVEL: usize = 9;
    pub const PRIORITY: usize = 10;
    pub const ENDIANNESS: usize = 11;
    pub const BIT_MODE: usize = 12;
    pub const START_BIT: usize = 13;
    pub const END_BIT: usize = 14;
    pub const STORAGE: usize = 15;
    pub const OFFSET: usize = 16;
    pub const STORE: usize = 17;
}

struct PointForm {
    form: Form,
    mode: ModalMode,
    id: Option<String>,
    device_id: Option<String>,
}

impl PointForm {
    fn new(mode: ModalMode, seed: Option<&Point>, device_id: Option<String>) -> Self {
        let opt = |f: fn(&Point) -> Option<String>| {
            seed.and_then(f).unwrap_or_default()
        };
        let opt_num = |f: fn(&Point) -> Option<i64>| {
            seed.and_then(f).map(|v| v.to_string()).unwrap_or_default()
        };
        Self {
            form: Form::new(vec![
                ("Tag", seed.map(|p| p.tag.clone()).unwrap_or_default()),
                (
                    "Function code",
                    seed.map_or_else(|| "3".into(), |p| p.function_code.clone()),
                ),
                ("Address", seed.map(|p| p.address.clone()).unwrap_or_default()),
                (
                    "Data type",
                    seed.map_or_else(|| "uint16".into(), |p| p.data_type.clone()),
                ),
                (
                    "Description",
                    seed.map(|p| p.description.clone()).unwrap_or_default(),
                ),
                ("Unit", opt(|p| p.unit.clone())),
                (
                    "Multiplier",
                    seed.map_or_else(|| "1".into(), |p| p.multiplier.to_string()),
                ),
                ("Lua expression", opt(|p| p.lua_expression.clone())),
                ("Alarm flag (y/n)", {
                    let flagged = seed.and_then(|p| p.alarm_flag.as_deref()) == Some("true");
                    if flagged { "y".into() } else { "n".into() }
                }),
                ("Alarm level", opt(|p| p.alarm_level.clone())),
                ("Priority (1-3)", opt_num(|p| p.priority)),
                ("Endianness (BIG/LITTLE)", opt(|p| p.endianness.clone())),
                (
                    "Bit mode (single/multiple/whole)",
                    opt(|p| p.bit_calculation.clone()),
                ),
                (
                    "Start bit",
                    seed.and_then(|p| p.start_bit)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                ),
                (
                    "End bit",
                    seed.and_then(|p| p.end_bit)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                ),
                ("Storage (direct/transformed)", opt(|p| p.storage_method.clone())),
                ("Offset", opt_num(|p| p.offset)),
                ("Store", opt_num(|p| p.store)),
            ]),
            mode,
            id: seed.and_then(|p| p.id.clone()),
            device_id: seed.and_then(|p| p.device_id.clone()).or(device_id),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn build(&self) -> std::result::Result<Point, String> {
        let text = |idx: usize| self.form.value(idx).trim().to_owned();
        let opt_text = |idx: usize| {
            let v = text(idx);
            (!v.is_empty()).then_some(v)
        };
        let opt_u32 = |idx: usize, label: &str| -> std::result::Result<Option<u32>, String> {
            match opt_text(idx) {
                None => Ok(None),
                Some(v) => v
                    .parse::<u32>()
                    .map(Some)
                    .map_err(|_| format!("{label} must be a number")),
            }
        };
        let opt_i64 = |idx: usize, label: &str| -> std::result::Result<Option<i64>, String> {
            match opt_text(idx) {
                None => Ok(None),
                Some(v) => v
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| format!("{label} must be a number")),
            }
        };

        let tag = text(point_field::TAG);
        if tag.is_empty() {
            return Err("Tag cannot be empty".into());
        }
        let address = text(point_field::ADDRESS);
        if address.is_empty() {
            return Err("Address cannot be empty".into());
        }
        let multiplier = {
            let v = text(point_field::MULTIPLIER);
            if v.is_empty() {
                1.0
            } else {
                v.parse::<f64>()
                    .map_err(|_| "Multiplier must be a number".to_owned())?
            }
        };

        let alarm_flag = matches!(
            self.form.value(point_field::ALARM_FLAG).trim(),
            "y" | "Y" | "true"
        );

        Ok(Point {
            id: self.id.clone(),
            function_code: text(point_field::FUNCTION_CODE),
            address,
            data_type: text(point_field::DATA_TYPE),
            tag,
            lua_expression: opt_text(point_field::LUA_EXPRESSION),
            description: text(point_field::DESCRIPTION),
            alarm_flag: Some(if alarm_flag { "true" } else { "false" }.to_owned()),
            // Level only applies to watched points.
            alarm_level: if alarm_flag {
                opt_text(point_field::ALARM_LEVEL)
            } else {
                None
            },
            multiplier,
            unit: opt_text(point_field::UNIT),
            priority: opt_i64(point_field::PRIORITY, "Priority")?,
            endianness: opt_text(point_field::ENDIANNESS),
            bit_calculation: opt_text(point_field::BIT_MODE),
            start_bit: opt_u32(point_field::START_BIT, "Start bit")?,
            end_bit: opt_u32(point_field::END_BIT, "End bit")?,
            storage_method: opt_text(point_field::STORAGE),
            offset: opt_i64(point_field::OFFSET, "Offset")?,
            store: opt_i64(point_field::STORE, "Store")?,
            device_id: self.device_id.clone(),
        })
    }
}

/// What the bottom input line is collecting, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    MarkSearch,
    GotoPage,
}

/// Overlay for picking the device that scopes the point list.
struct DeviceSelector {
    /// `(id, label)` rows; a `None` id clears the filter.
    entries: Vec<(Option<String>, String)>,
    selected: usize,
}

impl DeviceSelector {
    fn from_devices(devices: &[Device]) -> Self {
        let mut entries = vec![(None, String::from("All devices"))];
        entries.extend(devices.iter().filter_map(|d| {
            let id = d.id.clone()?;
            Some((Some(id), format!("{} ({})", d.name, d.code)))
        }));
        Self {
            entries,
            selected: 0,
        }
    }
}

pub struct PointsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    points: Vec<Point>,
    current_page: u32,
    page_size: u32,
    total_count: u64,
    table_state: TableState,
    /// Active mark filter, shown in the header.
    mark: String,
    selected_device: Option<String>,
    /// Display name for the active device filter.
    selected_device_name: Option<String>,
    /// Device roster for the scope selector, refreshed on every device load.
    devices: Vec<Device>,
    selector: Option<DeviceSelector>,
    prompt: Option<(PromptKind, Input)>,
    form: Option<PointForm>,
}

impl PointsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            points: Vec::new(),
            current_page: 1,
            page_size: sentra_core::view::DEFAULT_PAGE_SIZE,
            total_count: 0,
            table_state: TableState::default(),
            mark: String::new(),
            selected_device: None,
            selected_device_name: None,
            devices: Vec::new(),
            selector: None,
            prompt: None,
            form: None,
        }
    }

    fn window(&self) -> PageWindow {
        PageWindow::compute(self.current_page, self.page_size, self.total_count)
    }

    /// Resolve a navigation intent locally and raise it for the reload.
    ///
    /// The page counter is written here, by the user's own navigation —
    /// never from a fetch result.
    fn navigate(&mut self, intent: PageIntent) -> Option<Action> {
        let page = intent.resolve(&self.window())?;
        self.current_page = page;
        Some(Action::PointPageIntent(intent))
    }

    fn selected_point(&self) -> Option<&Point> {
        self.points.get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, idx: usize) {
        if self.points.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(self.points.len() - 1)));
        }
    }

    // ── Key handling ────────────────────────────────────────────────

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => match form.build() {
                Ok(point) => Some(Action::SavePoint(Box::new(point))),
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
                match kind {
                    PromptKind::MarkSearch => Some(Action::SetDeviceMark(value)),
                    PromptKind::GotoPage => match value.parse::<u32>() {
                        Ok(page) => self.navigate(PageIntent::Goto(page)),
                        Err(_) => Some(Action::Notify(Notification::error(
                            "Page must be a number",
                        ))),
                    },
                }
            }
            _ => {
                input.handle_event(&crossterm::event::Event::Key(key));
                None
            }
        }
    }

    fn handle_selector_key(&mut self, key: KeyEvent) -> Option<Action> {
        let selector = self.selector.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.selector = None;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                selector.selected = (selector.selected + 1).min(selector.entries.len() - 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                selector.selected = selector.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                let (id, _) = selector.entries.get(selector.selected)?.clone();
                self.selector = None;
                Some(Action::SelectDevice(id))
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
            KeyCode::Char('h') | KeyCode::Left => self.navigate(PageIntent::Prev),
            KeyCode::Char('l') | KeyCode::Right => self.navigate(PageIntent::Next),
            KeyCode::Char('g') => {
                self.prompt = Some((PromptKind::GotoPage, Input::default()));
                None
            }
            KeyCode::Char('/') => {
                self.prompt = Some((
                    PromptKind::MarkSearch,
                    Input::from(self.mark.clone()),
                ));
                None
            }
            KeyCode::Char('s') => {
                self.selector = Some(DeviceSelector::from_devices(&self.devices));
                None
            }
            KeyCode::Char('a') => Some(Action::OpenPointForm(ModalMode::Create, None)),
            KeyCode::Char('e') | KeyCode::Enter => {
                // Edit always re-fetches by id so the form never seeds
                // from a stale list row.
                let point = self.selected_point()?;
                point.id.clone().map(Action::EditPoint)
            }
            KeyCode::Char('d') => {
                let point = self.selected_point()?;
                let id = point.id.clone()?;
                Some(Action::RequestDeletePoint {
                    id,
                    tag: point.tag.clone(),
                })
            }
            KeyCode::Char('R') => Some(Action::ReloadPoints),
            _ => None,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let mut title = String::from(" Points");
        if let Some(name) = &self.selected_device_name {
            title.push_str(&format!(" — device: {name}"));
        }
        if !self.mark.is_empty() {
            title.push_str(&format!(" — mark: {}", self.mark));
        }
        title.push(' ');

        let block = Block::default()
            .title(title)
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
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        if self.points.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  no points",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let header = Row::new(
                ["Tag", "Func", "Address", "Type", "Mult", "Unit", "Alarm", "Prio"]
                    .map(Cell::from),
            )
            .style(theme::table_header());

            let rows: Vec<Row> = self
                .points
                .iter()
                .map(|p| {
                    let level = AlarmLevel::from_wire(p.alarm_level.as_deref());
                    let alarm_style = match level {
                        AlarmLevel::Serious | AlarmLevel::High => {
                            Style::default().fg(theme::ALERT_RED)
                        }
                        AlarmLevel::Middle => Style::default().fg(theme::WARNING_ORANGE),
                        AlarmLevel::Low => Style::default().fg(theme::AMBER),
                        AlarmLevel::None => theme::key_hint(),
                    };
                    Row::new(vec![
                        Cell::from(p.tag.clone()),
                        Cell::from(p.function_code.clone()),
                        Cell::from(p.address.clone()),
                        Cell::from(p.data_type.clone()),
                        Cell::from(format!("{}", p.multiplier)),
                        Cell::from(p.unit.clone().unwrap_or_default()),
                        Cell::from(Span::styled(level.label(), alarm_style)),
                        Cell::from(Priority::from_wire(p.priority).label()),
                    ])
                    .style(theme::table_row())
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Min(12),
                    Constraint::Length(5),
                    Constraint::Min(8),
                    Constraint::Length(8),
                    Constraint::Length(6),
                    Constraint::Length(6),
                    Constraint::Length(11),
                    Constraint::Length(8),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        frame.render_widget(
            Paragraph::new(pagination::bar(&self.window(), self.total_count)),
            layout[1],
        );

        if let Some((kind, input)) = &self.prompt {
            let label = match kind {
                PromptKind::MarkSearch => " mark: ",
                PromptKind::GotoPage => " page: ",
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
                    " a add  e edit  d delete  s device  ←/→ page  g goto  / mark  R reload",
                    theme::key_hint(),
                ))),
                layout[2],
            );
        }
    }

    fn render_selector(&self, frame: &mut Frame, area: Rect, selector: &DeviceSelector) {
        #[allow(clippy::cast_possible_truncation)]
        let height = (selector.entries.len() as u16 + 2).min(14);
        let dialog = centered_rect(area, 40, height);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let block = Block::default()
            .title(" Scope to device ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let rows: Vec<Row> = selector
            .entries
            .iter()
            .map(|(_, label)| Row::new(vec![Cell::from(label.clone())]).style(theme::table_row()))
            .collect();
        let table = Table::new(rows, [Constraint::Min(10)])
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        state.select(Some(selector.selected));
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &PointForm) {
        let dialog = centered_rect(area, 58, 22);
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog,
        );

        let block = Block::default()
            .title(format!(" {} Point ", form.mode.title_verb()))
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

impl Component for PointsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }
        if self.selector.is_some() {
            return Ok(self.handle_selector_key(key));
        }
        if self.prompt.is_some() {
            return Ok(self.handle_prompt_key(key));
        }
        Ok(self.handle_table_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // A load result only carries rows and the authoritative total;
            // the page counter is written by navigation actions alone.
            Action::PointsLoaded(page) => {
                self.points.clone_from(&page.points);
                self.total_count = page.total_count;
                let selected = self.table_state.selected().unwrap_or(0);
                self.select(selected);
            }
            Action::DevicesLoaded(devices) => {
                self.devices.clone_from(devices);
            }
            Action::SetDeviceMark(mark) => {
                self.mark.clone_from(mark);
                self.current_page = 1;
            }
            Action::SelectDevice(device_id) => {
                if self.selected_device != *device_id {
                    self.selected_device.clone_from(device_id);
                    self.current_page = 1;
                }
                self.selected_device_name = device_id.as_ref().map(|id| {
                    self.devices
                        .iter()
                        .find(|d| d.id.as_deref() == Some(id))
                        .map_or_else(|| id.clone(), |d| d.name.clone())
                });
            }
            Action::OpenPointForm(mode, seed) => {
                self.form = Some(PointForm::new(
                    *mode,
                    seed.as_deref(),
                    self.selected_device.clone(),
                ));
            }
            Action::CloseModal => {
                self.form = None;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_table(frame, area);
        if let Some(selector) = &self.selector {
            self.render_selector(frame, area, selector);
        }
        if let Some(form) = &self.form {
            self.render_form(frame, area, form);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn modal_active(&self) -> bool {
        self.form.is_some() || self.selector.is_some() || self.prompt.is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::{KeyCode, KeyEvent};

    use sentra_core::{Device, PageIntent, Point, PointPage};

    use crate::action::Action;
    use crate::component::Component;
    use crate::modal::ModalMode;

    use super::PointsScreen;

    fn point(id: &str, tag: &str) -> Point {
        Point {
            id: Some(id.into()),
            function_code: "3".into(),
            address: "40001".into(),
            data_type: "uint16".into(),
            tag: tag.into(),
            lua_expression: None,
            description: String::new(),
            alarm_flag: Some("true".into()),
            alarm_level: Some("high".into()),
            multiplier: 0.1,
            unit: Some("kPa".into()),
            priority: Some(3),
            endianness: None,
            bit_calculation: None,
            start_bit: None,
            end_bit: None,
            storage_method: None,
            offset: None,
            store: None,
            device_id: Some("d1".into()),
        }
    }

    fn device(id: &str, name: &str) -> Device {
        Device {
            id: Some(id.into()),
            status: true,
            name: name.into(),
            code: "D01".into(),
            table: "t_d01".into(),
            interface_type: "RS485".into(),
            address: "/dev/ttyS0".into(),
            baud_rate: 9600,
            stop_bits: 1,
            data_bits: 8,
            parity: "N".into(),
            protocol_type: "Modbus".into(),
            device_address: "1".into(),
            write_timeout: 1000,
            read_timeout: 1000,
        }
    }

    fn page(points: Vec<Point>, total: u64, current: u32) -> PointPage {
        PointPage {
            total_count: total,
            page: Some(current),
            page_size: Some(20),
            total_pages: None,
            points,
        }
    }

    #[test]
    fn page_navigation_emits_intents() {
        let mut screen = PointsScreen::new();
        screen
            .update(&Action::PointsLoaded(page(vec![point("p1", "t1")], 45, 2)))
            .unwrap();

        let next = screen
            .handle_key_event(KeyEvent::from(KeyCode::Right))
            .unwrap();
        assert!(matches!(
            next,
            Some(Action::PointPageIntent(PageIntent::Next))
        ));
        assert_eq!(screen.current_page, 2);

        let prev = screen
            .handle_key_event(KeyEvent::from(KeyCode::Left))
            .unwrap();
        assert!(matches!(
            prev,
            Some(Action::PointPageIntent(PageIntent::Prev))
        ));
        assert_eq!(screen.current_page, 1);

        // Already on the first page: no intent, no page change.
        let noop = screen
            .handle_key_event(KeyEvent::from(KeyCode::Left))
            .unwrap();
        assert!(noop.is_none());
        assert_eq!(screen.current_page, 1);
    }

    #[test]
    fn load_result_never_moves_the_page_counter() {
        let mut screen = PointsScreen::new();
        screen
            .update(&Action::PointsLoaded(page(vec![point("p1", "t1")], 100, 1)))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Right))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Right))
            .unwrap();
        assert_eq!(screen.current_page, 3);

        // A gateway that always echoes page 1 must not drag us back.
        screen
            .update(&Action::PointsLoaded(page(vec![point("p41", "t41")], 100, 1)))
            .unwrap();
        assert_eq!(screen.current_page, 3);
        assert_eq!(screen.window().current, 3);
    }

    #[test]
    fn goto_prompt_parses_a_page_number() {
        let mut screen = PointsScreen::new();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('g')))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('3')))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::PointPageIntent(PageIntent::Goto(3)))
        ));
        assert!(!screen.modal_active());
    }

    #[test]
    fn mark_prompt_submits_filter() {
        let mut screen = PointsScreen::new();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('/')))
            .unwrap();
        for c in "D01".chars() {
            screen
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)))
                .unwrap();
        }
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        match action {
            Some(Action::SetDeviceMark(mark)) => assert_eq!(mark, "D01"),
            other => panic!("expected SetDeviceMark, got {other:?}"),
        }
    }

    #[test]
    fn edit_key_requests_a_fresh_fetch_by_id() {
        let mut screen = PointsScreen::new();
        screen
            .update(&Action::PointsLoaded(page(vec![point("p1", "t1")], 1, 1)))
            .unwrap();

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('e')))
            .unwrap();
        match action {
            Some(Action::EditPoint(id)) => assert_eq!(id, "p1"),
            other => panic!("expected EditPoint, got {other:?}"),
        }
        assert!(!screen.modal_active());
    }

    #[test]
    fn device_selector_scopes_and_clears_the_filter() {
        let mut screen = PointsScreen::new();
        screen
            .update(&Action::DevicesLoaded(vec![device("dev-1", "PLC-1")]))
            .unwrap();

        // Pick the device entry (row 1; row 0 is "All devices").
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('s')))
            .unwrap();
        assert!(screen.modal_active());
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('j')))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        match action {
            Some(Action::SelectDevice(Some(id))) => assert_eq!(id, "dev-1"),
            other => panic!("expected SelectDevice, got {other:?}"),
        }
        assert!(!screen.modal_active());

        // Scope change lands back on page 1 and shows the device name.
        screen
            .update(&Action::SelectDevice(Some("dev-1".into())))
            .unwrap();
        assert_eq!(screen.selected_device_name.as_deref(), Some("PLC-1"));
        assert_eq!(screen.current_page, 1);

        // The first entry clears the filter again.
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('s')))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::SelectDevice(None))));
    }

    #[test]
    fn form_submit_keeps_alarm_level_only_when_flagged() {
        let mut screen = PointsScreen::new();
        screen
            .update(&Action::OpenPointForm(
                ModalMode::Edit,
                Some(Box::new(point("p1", "t1"))),
            ))
            .unwrap();

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        match action {
            Some(Action::SavePoint(p)) => {
                assert_eq!(p.id.as_deref(), Some("p1"));
                assert_eq!(p.alarm_level.as_deref(), Some("high"));
                assert_eq!(p.device_id.as_deref(), Some("d1"));
            }
            other => panic!("expected SavePoint, got {other:?}"),
        }

        // Unflag the alarm: the level must be dropped.
        screen
            .update(&Action::OpenPointForm(
                ModalMode::Edit,
                Some(Box::new(point("p1", "t1"))),
            ))
            .unwrap();
        if let Some(form) = screen.form.as_mut() {
            form.form.active = super::point_field::ALARM_FLAG;
            form.form.handle_key(KeyEvent::from(KeyCode::Backspace));
            form.form.handle_key(KeyEvent::from(KeyCode::Char('n')));
        }
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        match action {
            Some(Action::SavePoint(p)) => {
                assert_eq!(p.alarm_flag.as_deref(), Some("false"));
                assert_eq!(p.alarm_level, None);
            }
            other => panic!("expected SavePoint, got {other:?}"),
        }
    }
}
