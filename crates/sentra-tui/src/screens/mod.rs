//! Screen implementations. Each tab is a top-level Component.

pub mod devices;
pub mod monitor;
pub mod points;

use sentra_core::Tab;

use crate::component::Component;

/// Create the screen component for every tab, in bar order.
pub fn create_screens() -> Vec<(Tab, Box<dyn Component>)> {
    vec![
        (Tab::DeviceConfig, Box::new(devices::DevicesScreen::new())),
        (Tab::PointConfig, Box::new(points::PointsScreen::new())),
        (Tab::SystemMonitor, Box::new(monitor::MonitorScreen::new())),
    ]
}
