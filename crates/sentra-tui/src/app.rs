//! Application core — event loop, tab management, action dispatch.
//!
//! Every mutation flows through the action queue, so side effects keep a
//! strict order: a successful save closes its modal, then raises the
//! toast, then triggers the list reload. A failed load leaves the last
//! good rows visible and only raises an error toast.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use sentra_core::{Console, CoreError, Tab, View, ViewState};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::modal::{Modal, ModalMode, ModalStack};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered_rect;

/// Monitor snapshot refresh period while the monitor tab is visible,
/// counted in 250ms ticks.
const MONITOR_REFRESH_TICKS: u32 = 20;

/// Top-level application state and event loop.
pub struct App {
    /// Navigation state shared by every loader.
    view: ViewState,
    /// All screen components, keyed by tab.
    screens: HashMap<Tab, Box<dyn Component>>,
    running: bool,
    /// Gateway address, shown in the status bar.
    gateway_label: String,
    console: Console,
    /// Modal mutual-exclusion gate.
    modals: ModalStack,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    monitor_ticks: u32,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(console: Console, gateway_label: String, page_size: u32) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<Tab, Box<dyn Component>> = create_screens().into_iter().collect();

        let view = ViewState {
            page_size,
            ..ViewState::default()
        };

        Self {
            view,
            screens,
            running: true,
            gateway_label,
            console,
            modals: ModalStack::new(),
            pending_confirm: None,
            notification: None,
            monitor_ticks: 0,
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("console event loop started");

        // Devices are the landing tab; load them immediately.
        self.action_tx.send(Action::ReloadDevices)?;

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions in arrival order.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("console event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else is delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Confirmation dialog captures all input.
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        // An open modal owns the keyboard; tab switching waits.
        let modal_active = self
            .screens
            .get(&self.view.active_tab)
            .is_some_and(|s| s.modal_active());
        if modal_active {
            if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
                return screen.handle_key_event(key);
            }
            return Ok(None);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = c as u8 - b'0';
                if let Some(tab) = Tab::from_number(n) {
                    return Ok(Some(Action::SwitchTab(tab)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchTab(self.view.active_tab.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchTab(self.view.active_tab.prev())));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action — update app state and propagate to screens.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render | Action::Resize(_, _) => {}

            Action::Tick => {
                // Auto-dismiss notifications after 3 seconds.
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
                // Periodic snapshot refresh while the monitor is visible.
                if self.view.active_tab == Tab::SystemMonitor {
                    self.monitor_ticks += 1;
                    if self.monitor_ticks >= MONITOR_REFRESH_TICKS {
                        self.monitor_ticks = 0;
                        self.action_tx.send(Action::ReloadMonitor)?;
                    }
                }
                if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
                    let _ = screen.update(action);
                }
            }

            Action::SwitchTab(target) => {
                if *target != self.view.active_tab {
                    debug!("switching tab: {} → {}", self.view.active_tab, target);
                    if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
                        screen.set_focused(false);
                    }
                    self.view.switch_tab(*target);
                    self.monitor_ticks = 0;
                    if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
                        screen.set_focused(true);
                    }
                    // Arriving at a tab refreshes its data; page position
                    // is deliberately preserved.
                    self.action_tx.send(match target {
                        Tab::DeviceConfig => Action::ReloadDevices,
                        Tab::PointConfig => Action::ReloadPoints,
                        Tab::SystemMonitor => Action::ReloadMonitor,
                    })?;
                }
            }

            // ── Loads ─────────────────────────────────────────────────
            Action::ReloadDevices => self.load_devices(),
            Action::ReloadPoints => self.load_points(),
            Action::ReloadRules => self.load_rules(),
            Action::ReloadMonitor => self.load_monitor(),
            Action::LoadAlarms(device_id) => self.load_alarms(*device_id),

            Action::PointPageIntent(intent) => {
                if self.view.navigate_points(*intent) {
                    self.action_tx.send(Action::ReloadPoints)?;
                }
            }

            Action::SetDeviceMark(mark) => {
                // New search restarts at page 1.
                self.view.set_device_mark(mark.clone());
                self.forward_to_all(action)?;
                self.action_tx.send(Action::ReloadPoints)?;
            }

            Action::SelectDevice(device_id) => {
                // A scope change restarts the point list at page 1 and
                // refreshes it; re-selecting the current scope is a no-op.
                if self.view.selected_device != *device_id {
                    self.view.select_device(device_id.clone());
                    self.forward_to_all(action)?;
                    self.action_tx.send(Action::ReloadPoints)?;
                }
            }

            // ── Edit intents ──────────────────────────────────────────
            Action::EditDevice(id) => self.edit_device(id.clone()),
            Action::EditPoint(id) => self.edit_point(id.clone()),
            Action::EditRule(id) => self.edit_rule(id.clone()),

            // ── Load results (already generation-checked) ─────────────
            Action::PointsLoaded(page) => {
                self.view.record_point_total(page.total_count);
                self.forward_to_all(action)?;
            }
            Action::DevicesLoaded(_)
            | Action::RulesLoaded(_)
            | Action::MonitorLoaded { .. }
            | Action::AlarmsLoaded { .. } => {
                self.forward_to_all(action)?;
            }

            // ── Modal lifecycle ───────────────────────────────────────
            Action::OpenDeviceForm(mode, _) => {
                if self.modals.open(Modal::DeviceForm(*mode)) {
                    self.forward_to_active(action)?;
                }
            }
            Action::OpenPointForm(mode, _) => {
                if self.modals.open(Modal::PointForm(*mode)) {
                    self.forward_to_active(action)?;
                }
            }
            Action::OpenRuleList => {
                if self.modals.open(Modal::RuleList) {
                    self.forward_to_active(action)?;
                    self.action_tx.send(Action::ReloadRules)?;
                }
            }
            Action::OpenRuleForm(mode, _) => {
                let modal = Modal::RuleForm {
                    mode: *mode,
                    over_list: false,
                };
                if self.modals.open(modal) {
                    self.forward_to_active(action)?;
                }
            }
            Action::CloseModal => {
                self.modals.close();
                self.forward_to_all(action)?;
            }

            // ── Writes ────────────────────────────────────────────────
            Action::SaveDevice(device) => {
                let console = self.console.clone();
                let device = device.clone();
                self.run_command(
                    async move { console.save_device(&device).await },
                    vec![
                        Action::CloseModal,
                        Action::Notify(Notification::success("Device saved")),
                        Action::ReloadDevices,
                    ],
                );
            }
            Action::SavePoint(point) => {
                let console = self.console.clone();
                let point = point.clone();
                self.run_command(
                    async move { console.save_point(&point).await },
                    vec![
                        Action::CloseModal,
                        Action::Notify(Notification::success("Point saved")),
                        Action::ReloadPoints,
                    ],
                );
            }
            Action::SaveRule(rule) => {
                let console = self.console.clone();
                let rule = rule.clone();
                self.run_command(
                    async move { console.save_rule(&rule).await },
                    vec![
                        Action::CloseModal,
                        Action::Notify(Notification::success("Rule saved")),
                        Action::ReloadRules,
                    ],
                );
            }
            Action::ToggleDeviceStatus { id, name, start } => {
                let console = self.console.clone();
                let id = id.clone();
                let start = *start;
                let message = if start {
                    format!("Device {name} started")
                } else {
                    format!("Device {name} stopped")
                };
                self.run_command(
                    async move { console.set_device_status(&id, start).await },
                    vec![
                        Action::Notify(Notification::success(message)),
                        Action::ReloadDevices,
                    ],
                );
            }

            // ── Destructive commands → confirmation dialog ────────────
            Action::RequestDeleteDevice { id, name } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::DeleteDevice {
                        id: id.clone(),
                        name: name.clone(),
                    }))?;
            }
            Action::RequestDeletePoint { id, tag } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::DeletePoint {
                        id: id.clone(),
                        tag: tag.clone(),
                    }))?;
            }
            Action::RequestDeleteRule { id, description } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::DeleteRule {
                        id: id.clone(),
                        description: description.clone(),
                    }))?;
            }
            Action::RequestClearData => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::ClearData))?;
            }

            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            // ── System commands ───────────────────────────────────────
            Action::PauseCollection => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.system_pause().await },
                    vec![Action::Notify(Notification::success("Collection paused"))],
                );
            }
            Action::FlushQueue => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.system_flush().await },
                    vec![Action::Notify(Notification::success("Queue flushed"))],
                );
            }
            Action::ImportConfig(path) => {
                let console = self.console.clone();
                let path = path.clone();
                self.run_command(
                    async move { console.import_config(&path).await },
                    vec![
                        Action::Notify(Notification::success("Config imported")),
                        Action::ReloadDevices,
                        Action::ReloadPoints,
                    ],
                );
            }
            Action::DownloadTemplate(path) => {
                let console = self.console.clone();
                let dest = path.clone();
                let message = format!("Template saved to {}", path.display());
                self.run_command(
                    async move { console.download_template(&dest).await },
                    vec![Action::Notify(Notification::success(message))],
                );
            }

            // ── Notifications ─────────────────────────────────────────
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }
            Action::DismissNotification => {
                self.notification = None;
            }
        }

        Ok(())
    }

    fn forward_to_all(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn forward_to_active(&mut self, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.view.active_tab) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Loaders ───────────────────────────────────────────────────────
    //
    // Each loader tags its request with a fresh generation and discards
    // the response if a newer request for the same view was issued while
    // it was in flight. A failed load keeps the stale rows visible.

    fn load_devices(&self) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let generation = console.begin_request(View::Devices);
        tokio::spawn(async move {
            let result = console.list_devices().await;
            if !console.is_current(View::Devices, generation) {
                return;
            }
            match result {
                Ok(devices) => {
                    let _ = tx.send(Action::DevicesLoaded(devices));
                }
                Err(e) => {
                    warn!(error = %e, "device load failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn load_points(&self) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let query = self.view.point_query();
        let generation = console.begin_request(View::Points);
        tokio::spawn(async move {
            let result = console.list_points(&query).await;
            if !console.is_current(View::Points, generation) {
                return;
            }
            match result {
                Ok(page) => {
                    let _ = tx.send(Action::PointsLoaded(page));
                }
                Err(e) => {
                    warn!(error = %e, "point load failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn load_rules(&self) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let device_id = self.view.selected_device.clone();
        let generation = console.begin_request(View::Rules);
        tokio::spawn(async move {
            let result = console.list_rules(device_id.as_deref()).await;
            if !console.is_current(View::Rules, generation) {
                return;
            }
            match result {
                Ok(rules) => {
                    let _ = tx.send(Action::RulesLoaded(rules));
                }
                Err(e) => {
                    warn!(error = %e, "rule load failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn load_monitor(&self) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let generation = console.begin_request(View::Monitor);
        tokio::spawn(async move {
            let result = console.monitor_snapshot().await;
            if !console.is_current(View::Monitor, generation) {
                return;
            }
            match result {
                Ok((rows, stats)) => {
                    let _ = tx.send(Action::MonitorLoaded { rows, stats });
                }
                Err(e) => {
                    warn!(error = %e, "monitor load failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn load_alarms(&self, device_id: i64) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let generation = console.begin_request(View::Alarms);
        tokio::spawn(async move {
            let result = console.device_alarms(device_id).await;
            if !console.is_current(View::Alarms, generation) {
                return;
            }
            // Errors land in the overlay, not the toast.
            let _ = tx.send(Action::AlarmsLoaded {
                device_id,
                result: result.map_err(|e| e.to_string()),
            });
        });
    }

    // ── Edit fetches ──────────────────────────────────────────────────
    //
    // Editing re-fetches the record by id so the form opens on the
    // gateway's current state, never a cached list row. On failure only
    // an error toast is raised and no modal opens.

    fn edit_device(&self, id: String) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match console.get_device(&id).await {
                Ok(device) => {
                    let _ = tx.send(Action::OpenDeviceForm(
                        ModalMode::Edit,
                        Some(Box::new(device)),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "device fetch failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn edit_point(&self, id: String) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match console.get_point(&id).await {
                Ok(point) => {
                    let _ = tx.send(Action::OpenPointForm(
                        ModalMode::Edit,
                        Some(Box::new(point)),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "point fetch failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn edit_rule(&self, id: String) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match console.get_rule(&id).await {
                Ok(rule) => {
                    let _ = tx.send(Action::OpenRuleForm(
                        ModalMode::Edit,
                        Some(Box::new(rule)),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "rule fetch failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    // ── Command execution ─────────────────────────────────────────────

    /// Spawn a write. On success the follow-up actions are queued in
    /// order; on failure only an error toast is raised, leaving any open
    /// modal up for correction.
    fn run_command<Fut>(&self, fut: Fut, on_success: Vec<Action>)
    where
        Fut: Future<Output = std::result::Result<(), CoreError>> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match fut.await {
                Ok(()) => {
                    for action in on_success {
                        let _ = tx.send(action);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "command failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn execute_confirm(&self, confirm: ConfirmAction) {
        match confirm {
            ConfirmAction::DeleteDevice { id, name } => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.delete_device(&id).await },
                    vec![
                        Action::Notify(Notification::success(format!("Deleted {name}"))),
                        Action::ReloadDevices,
                    ],
                );
            }
            ConfirmAction::DeletePoint { id, tag } => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.delete_point(&id).await },
                    vec![
                        Action::Notify(Notification::success(format!("Deleted {tag}"))),
                        Action::ReloadPoints,
                    ],
                );
            }
            ConfirmAction::DeleteRule { id, description } => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.delete_rule(&id).await },
                    vec![
                        Action::Notify(Notification::success(format!(
                            "Deleted {description}"
                        ))),
                        Action::ReloadRules,
                    ],
                );
            }
            ConfirmAction::ClearData => {
                let console = self.console.clone();
                self.run_command(
                    async move { console.data_clear().await },
                    vec![Action::Notify(Notification::success("Data cleared"))],
                );
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.view.active_tab) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays on top (order matters: last = topmost).
        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|&tab| {
                let style = if tab == self.view.active_tab {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", tab.number(), tab.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                Tab::ALL
                    .iter()
                    .position(|&t| t == self.view.active_tab)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(&self.gateway_label, Style::default().fg(theme::PALE_CYAN)),
            Span::styled(
                " │ 1-3 tabs  Tab cycle  q quit",
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = centered_rect(area, 54, 5);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::WARNING_ORANGE));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    #[allow(clippy::unused_self)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        use crate::action::NotificationLevel;

        let msg_len = notif.message.len() as u16;
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SIGNAL_GREEN, "✓"),
            NotificationLevel::Error => (theme::ALERT_RED, "✗"),
            NotificationLevel::Info => (theme::PALE_CYAN, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use sentra_core::{Console, Tab, TransportConfig};

    use super::App;
    use crate::action::{Action, ConfirmAction};
    use crate::modal::ModalMode;

    fn app() -> App {
        let url = "http://127.0.0.1:9".parse().unwrap();
        let console = Console::new(
            url,
            &TransportConfig {
                timeout: Duration::from_secs(1),
            },
        )
        .unwrap();
        App::new(console, "http://127.0.0.1:9/".into(), 20)
    }

    #[test]
    fn destructive_request_raises_a_confirm_dialog_first() {
        let mut app = app();
        app.process_action(&Action::RequestDeleteDevice {
            id: "dev-1".into(),
            name: "PLC-1".into(),
        })
        .unwrap();

        // The request queues a dialog instead of executing anything.
        let queued = app.action_rx.try_recv().unwrap();
        assert!(matches!(
            queued,
            Action::ShowConfirm(ConfirmAction::DeleteDevice { .. })
        ));
        assert!(app.pending_confirm.is_none());

        app.process_action(&queued).unwrap();
        assert!(app.pending_confirm.is_some());

        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
        assert!(app.action_rx.try_recv().is_err());
    }

    #[test]
    fn tab_switch_triggers_the_matching_loader() {
        let mut app = app();
        app.process_action(&Action::SwitchTab(Tab::SystemMonitor))
            .unwrap();
        assert_eq!(app.view.active_tab, Tab::SystemMonitor);

        let queued = app.action_rx.try_recv().unwrap();
        assert!(matches!(queued, Action::ReloadMonitor));
    }

    #[tokio::test]
    async fn edit_fetches_the_record_before_opening_the_form() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/devices/dev-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "dev-7",
                "status": true,
                "name": "PLC-7",
                "code": "D07",
                "table": "t_d07",
                "interfaceType": "RS485",
                "address": "/dev/ttyS1",
                "baudRate": 19200,
                "stopBits": 1,
                "dataBits": 8,
                "parity": "N",
                "protocolType": "Modbus",
                "deviceAddress": "7",
                "writeTimeout": 1000,
                "readTimeout": 1000
            })))
            .mount(&server)
            .await;

        let url = server.uri().parse().unwrap();
        let console = Console::new(
            url,
            &TransportConfig {
                timeout: Duration::from_secs(1),
            },
        )
        .unwrap();
        let mut app = App::new(console, server.uri(), 20);

        app.process_action(&Action::EditDevice("dev-7".into()))
            .unwrap();

        // The form only opens once the gateway's current record is in hand.
        match app.action_rx.recv().await.unwrap() {
            Action::OpenDeviceForm(ModalMode::Edit, Some(device)) => {
                assert_eq!(device.name, "PLC-7");
                assert_eq!(device.baud_rate, 19200);
            }
            other => panic!("expected OpenDeviceForm, got {other:?}"),
        }

        // A failed fetch raises a toast and opens nothing.
        app.process_action(&Action::EditDevice("missing".into()))
            .unwrap();
        let queued = app.action_rx.recv().await.unwrap();
        assert!(matches!(queued, Action::Notify(_)));
    }

    #[test]
    fn device_scope_change_reloads_points_once() {
        let mut app = app();

        app.process_action(&Action::SelectDevice(Some("dev-1".into())))
            .unwrap();
        let queued = app.action_rx.try_recv().unwrap();
        assert!(matches!(queued, Action::ReloadPoints));

        // Re-selecting the active scope is a no-op.
        app.process_action(&Action::SelectDevice(Some("dev-1".into())))
            .unwrap();
        assert!(app.action_rx.try_recv().is_err());

        // Clearing the scope is a change and reloads again.
        app.process_action(&Action::SelectDevice(None)).unwrap();
        let queued = app.action_rx.try_recv().unwrap();
        assert!(matches!(queued, Action::ReloadPoints));
    }
}
