//! Single-owner UI state.
//!
//! All navigation state lives in one [`ViewState`] struct owned by the
//! application loop. Mutation goes through named methods invoked from
//! user actions only — fetch callbacks never write here, so a slow
//! response can never silently reset navigation.

use std::fmt;

use sentra_api::PointQuery;

use crate::pagination::{PageIntent, PageWindow};

/// Fixed page size for the point list.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// The three primary console views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    DeviceConfig,
    PointConfig,
    SystemMonitor,
}

impl Tab {
    /// All tabs in bar order.
    pub const ALL: [Tab; 3] = [Self::DeviceConfig, Self::PointConfig, Self::SystemMonitor];

    /// Numeric key (1-3) for this tab.
    pub fn number(self) -> u8 {
        match self {
            Self::DeviceConfig => 1,
            Self::PointConfig => 2,
            Self::SystemMonitor => 3,
        }
    }

    /// Tab from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::DeviceConfig),
            2 => Some(Self::PointConfig),
            3 => Some(Self::SystemMonitor),
            _ => None,
        }
    }

    /// Next tab in bar order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous tab in bar order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DeviceConfig => "Devices",
            Self::PointConfig => "Points",
            Self::SystemMonitor => "Monitor",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Process-wide navigation state, re-read by every loader.
///
/// Page counters are 1-indexed and independent per view. Switching tabs
/// deliberately does NOT reset the point page — prior position persists.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub active_tab: Tab,
    pub device_page: u32,
    pub point_page: u32,
    pub page_size: u32,
    /// Last-known total point count, feeding the pagination window.
    pub total_points: u64,
    /// Device id threaded through point/rule queries and forms.
    pub selected_device: Option<String>,
    /// Free-text mark filter for the point list.
    pub device_mark: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            device_page: 1,
            point_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_points: 0,
            selected_device: None,
            device_mark: String::new(),
        }
    }
}

impl ViewState {
    /// Switch the active tab. Page positions persist across switches.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// The pagination window for the point list.
    pub fn point_window(&self) -> PageWindow {
        PageWindow::compute(self.point_page, self.page_size, self.total_points)
    }

    /// Apply a point-list navigation intent. Returns `true` when the page
    /// actually changed and a reload should be triggered.
    pub fn navigate_points(&mut self, intent: PageIntent) -> bool {
        let window = self.point_window();
        match intent.resolve(&window) {
            Some(page) => {
                self.point_page = page;
                true
            }
            None => false,
        }
    }

    /// Record the authoritative total after a successful point list fetch.
    pub fn record_point_total(&mut self, total: u64) {
        self.total_points = total;
    }

    /// Select (or clear) the device scoping point and rule queries.
    /// Changing the scope restarts the point list at page 1.
    pub fn select_device(&mut self, device_id: Option<String>) {
        if self.selected_device != device_id {
            self.selected_device = device_id;
            self.point_page = 1;
        }
    }

    /// Update the mark filter. A new search always restarts at page 1.
    pub fn set_device_mark(&mut self, mark: String) {
        self.device_mark = mark;
        self.point_page = 1;
    }

    /// The point list query for the current navigation state.
    pub fn point_query(&self) -> PointQuery {
        PointQuery {
            page: self.point_page,
            page_size: self.page_size,
            device_id: self.selected_device.clone(),
            device_mark: (!self.device_mark.is_empty()).then(|| self.device_mark.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Tab, ViewState};
    use crate::pagination::PageIntent;

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(Tab::DeviceConfig.next(), Tab::PointConfig);
        assert_eq!(Tab::SystemMonitor.next(), Tab::DeviceConfig);
        assert_eq!(Tab::DeviceConfig.prev(), Tab::SystemMonitor);
    }

    #[test]
    fn tab_switch_keeps_point_page() {
        let mut state = ViewState::default();
        state.record_point_total(100);
        assert!(state.navigate_points(PageIntent::Goto(4)));
        state.switch_tab(Tab::SystemMonitor);
        state.switch_tab(Tab::PointConfig);
        assert_eq!(state.point_page, 4);
    }

    #[test]
    fn navigation_noop_does_not_trigger_reload() {
        let mut state = ViewState::default();
        state.record_point_total(45);
        assert!(!state.navigate_points(PageIntent::Prev)); // already page 1
        assert!(state.navigate_points(PageIntent::Next));
        assert_eq!(state.point_page, 2);
        assert!(state.navigate_points(PageIntent::Next));
        assert!(!state.navigate_points(PageIntent::Next)); // page 3 is last
        assert_eq!(state.point_page, 3);
    }

    #[test]
    fn mark_search_resets_to_first_page() {
        let mut state = ViewState::default();
        state.record_point_total(100);
        assert!(state.navigate_points(PageIntent::Goto(5)));
        state.set_device_mark("D01".into());
        assert_eq!(state.point_page, 1);
    }

    #[test]
    fn device_scope_change_resets_to_first_page() {
        let mut state = ViewState::default();
        state.record_point_total(100);
        assert!(state.navigate_points(PageIntent::Goto(4)));

        state.select_device(Some("dev-1".into()));
        assert_eq!(state.point_page, 1);

        // Re-selecting the same scope keeps the position.
        assert!(state.navigate_points(PageIntent::Goto(3)));
        state.select_device(Some("dev-1".into()));
        assert_eq!(state.point_page, 3);

        // Clearing the scope is a change too.
        state.select_device(None);
        assert_eq!(state.point_page, 1);
    }

    #[test]
    fn point_query_reflects_state() {
        let mut state = ViewState::default();
        state.select_device(Some("dev-1".into()));
        state.set_device_mark("mark".into());
        let q = state.point_query();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 20);
        assert_eq!(q.device_id.as_deref(), Some("dev-1"));
        assert_eq!(q.device_mark.as_deref(), Some("mark"));

        state.set_device_mark(String::new());
        assert_eq!(state.point_query().device_mark, None);
    }
}
