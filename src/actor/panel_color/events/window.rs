use tracing::trace;

use crate::actor::panel_color::PanelColor;
use crate::model::WindowId;
use crate::sys::shell::WindowSignal;

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_focus_changed(controller: &mut PanelColor) {
        if let Some(window) = controller.shell.focus_window() {
            controller.track_window(window);
        }
        controller.schedule_update_with_follow_up();
    }

    pub fn handle_window_created(controller: &mut PanelColor, window: WindowId) {
        controller.track_window(window);
    }

    pub fn handle_window_signal(controller: &mut PanelColor, window: WindowId, signal: WindowSignal) {
        if !controller.windows.contains(window) {
            trace!(?window, ?signal, "signal from untracked window");
            return;
        }
        match signal {
            WindowSignal::MaximizedHorizontally | WindowSignal::MaximizedVertically => {
                controller.schedule_update_with_follow_up();
            }
            // Resizing a window that is not maximized rarely changes the panel.
            WindowSignal::SizeChanged => controller.schedule_update(),
            WindowSignal::Unmanaging => {
                // Drop the handles first so nothing touches the dead window.
                controller.windows.untrack(&*controller.shell, window);
                controller.schedule_update_with_follow_up();
            }
        }
    }
}
