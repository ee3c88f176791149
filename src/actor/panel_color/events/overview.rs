use tracing::debug;

use crate::actor::panel_color::{PanelColor, Phase, Timer};

pub struct OverviewEventHandler;

impl OverviewEventHandler {
    pub fn handle_showing(controller: &mut PanelColor) {
        controller.timers.cancel(Timer::Settle);
        controller.set_phase(Phase::OverviewVisible);
        // A sample taken before the overview covered the windows is worthless.
        controller.generations.advance();
        controller.apply_theme_color();
    }

    pub fn handle_hiding(controller: &mut PanelColor) {
        controller.timers.cancel(Timer::Settle);
        controller.set_phase(Phase::OverviewClosing);
        controller.generations.advance();
        controller.apply_theme_color();
    }

    pub fn handle_hidden(controller: &mut PanelColor) {
        match (controller.maximized_window(), controller.last_window_color) {
            (Some(window), Some(color)) => {
                debug!(window = ?window.id, %color, "restoring last window color");
                controller.style.apply(color, true);
            }
            _ => controller.apply_theme_color(),
        }

        controller.set_phase(Phase::Settling);
        let settle = controller.config.settings.settle();
        controller.timers.start(Timer::Settle, settle);
    }

    pub fn handle_settled(controller: &mut PanelColor) {
        controller.set_phase(Phase::Idle);
        controller.update_panel();
    }
}
