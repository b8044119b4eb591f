use dockhand_core::config::DockBarConfig;
use dockhand_core::dockbar::{DockBar, placement};
use dockhand_core::{Monitor, log_warn};

use crate::bar_window::BarWindow;

/// A configured dock bar bound to a concrete monitor.
#[derive(Debug, Clone)]
pub(super) struct ResolvedBar {
    pub config: DockBarConfig,
    pub monitor: Monitor,
}

impl ResolvedBar {
    /// Requested `(width, height)` in logical pixels. The dimension along
    /// the edge spans the monitor.
    pub fn size(&self) -> (i32, i32) {
        let span = self.monitor.bounds.scale(1.0 / self.monitor.dpi_scale);
        if self.config.edge.is_horizontal() {
            (span.width, self.config.thickness)
        } else {
            (self.config.thickness, span.height)
        }
    }

    /// The window to create before negotiation starts.
    pub fn window(&self, index: usize) -> BarWindow {
        let thickness = placement::to_physical(self.config.thickness, self.monitor.dpi_scale);
        BarWindow {
            title: format!("Dockhand Bar {index}"),
            bounds: placement::candidate(self.config.edge, thickness, self.monitor.bounds),
        }
    }

    /// The coordinator's record for the realized window.
    pub fn dock_bar(&self, hwnd: usize) -> DockBar {
        let (width, height) = self.size();
        let mut bar = DockBar::new(
            hwnd,
            self.monitor.device_name.clone(),
            self.config.edge,
            width,
            height,
        );
        bar.requires_screen_edge = self.config.requires_screen_edge;
        bar
    }
}

/// Binds each configured bar to its monitor. A missing index falls back
/// to the primary monitor.
pub(super) fn resolve(configs: &[DockBarConfig], monitors: &[Monitor]) -> Vec<ResolvedBar> {
    let primary = monitors
        .iter()
        .find(|m| m.primary)
        .or_else(|| monitors.first());
    configs
        .iter()
        .filter_map(|config| {
            let monitor = match config.monitor {
                Some(index) => monitors.get(index).or_else(|| {
                    log_warn!("Dock bar monitor {index} not found; using the primary monitor");
                    primary
                }),
                None => primary,
            }?;
            Some(ResolvedBar {
                config: config.clone(),
                monitor: monitor.clone(),
            })
        })
        .collect()
}
