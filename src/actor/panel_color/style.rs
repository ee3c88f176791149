use std::sync::Arc;
use std::time::Duration;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::model::Rgb;
use crate::sys::shell::{PanelSection, PanelSink};

pub const LIGHT_CLASS: &str = "adaptive-panel-light";
pub const DARK_CLASS: &str = "adaptive-panel-dark";

const FOREGROUND_ON_LIGHT: &str = "#3D3D3D";
const FOREGROUND_ON_DARK: &str = "#f2f2f2";

/// What the panel looks like for one background color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub background: Rgb,
    pub foreground: &'static str,
    pub class: &'static str,
    pub stale_class: &'static str,
    pub transition: Duration,
}

impl Appearance {
    pub fn new(background: Rgb, transition: Duration) -> Self {
        let (foreground, class, stale_class) = if background.is_light() {
            (FOREGROUND_ON_LIGHT, LIGHT_CLASS, DARK_CLASS)
        } else {
            (FOREGROUND_ON_DARK, DARK_CLASS, LIGHT_CLASS)
        };
        Self {
            background,
            foreground,
            class,
            stale_class,
            transition,
        }
    }

    pub fn panel_style(&self) -> String {
        format!(
            "background-color: {}; color: {}; transition-duration: {}ms;",
            self.background,
            self.foreground,
            self.transition.as_millis()
        )
    }

    pub fn child_style(&self) -> String { format!("color: {};", self.foreground) }
}

/// Writes panel styles and remembers the background so it can be restored
/// when something else in the shell wipes the panel style.
pub struct PanelStyle {
    sink: Arc<dyn PanelSink>,
    transition: Duration,
    current_background: Option<Rgb>,
    applying: bool,
}

impl PanelStyle {
    pub fn new(sink: Arc<dyn PanelSink>, transition: Duration) -> Self {
        Self {
            sink,
            transition,
            current_background: None,
            applying: false,
        }
    }

    pub fn apply(&mut self, background: Rgb, instant: bool) {
        let transition = if instant { Duration::ZERO } else { self.transition };
        let appearance = Appearance::new(background, transition);

        self.applying = true;
        self.sink.set_style(Some(&appearance.panel_style()));
        self.sink.remove_class(appearance.stale_class);
        self.sink.add_class(appearance.class);
        self.applying = false;

        // Section children do not inherit the panel's color.
        self.set_child_styles(Some(&appearance.child_style()));

        self.current_background = Some(background);
    }

    /// Reapplies the current background if the panel style lost it. Returns
    /// whether anything was written.
    pub fn handle_style_changed(&mut self) -> bool {
        if self.applying {
            return false;
        }
        let Some(background) = self.current_background else {
            return false;
        };
        if self.sink.style().is_some_and(|s| s.contains("background-color")) {
            return false;
        }

        debug!(%background, "panel style was cleared externally; reapplying");
        self.apply(background, true);
        true
    }

    pub fn reset(&mut self) {
        self.current_background = None;
        self.sink.set_style(None);
        self.sink.remove_class(LIGHT_CLASS);
        self.sink.remove_class(DARK_CLASS);
        self.set_child_styles(None);
    }

    pub fn current_background(&self) -> Option<Rgb> { self.current_background }

    pub fn set_transition(&mut self, transition: Duration) { self.transition = transition; }

    fn set_child_styles(&self, style: Option<&str>) {
        for section in PanelSection::iter() {
            for child in self.sink.children(section) {
                self.sink.set_child_style(section, child, style);
            }
        }
    }
}
