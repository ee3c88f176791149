//! Interfaces to the parts of the desktop the controller does not own.
//!
//! Subscriptions take a panel color `Sender`; the host delivers the matching
//! `Event` through it until the subscription is disconnected.

use std::future::Future;
use std::pin::Pin;

use strum::{EnumIter, IntoStaticStr};

use crate::actor::panel_color::error::{SamplingError, ShellError};
use crate::actor::panel_color::Sender;
use crate::model::{ColorScheme, MonitorIndex, NormalizedColor, Point, Rect, WindowId, WindowSnapshot};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle returned by every `connect*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Display-level notifications.
///
/// | signal                   | event delivered                 |
/// |--------------------------|---------------------------------|
/// | `FocusWindow`            | `Event::FocusWindowChanged`     |
/// | `WindowCreated`          | `Event::WindowCreated`          |
/// | `Restacked`              | `Event::Restacked`              |
/// | `ActiveWorkspaceChanged` | `Event::ActiveWorkspaceChanged` |
/// | `OverviewShowing`        | `Event::OverviewShowing`        |
/// | `OverviewHiding`         | `Event::OverviewHiding`         |
/// | `OverviewHidden`         | `Event::OverviewHidden`         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ShellSignal {
    FocusWindow,
    WindowCreated,
    Restacked,
    ActiveWorkspaceChanged,
    OverviewShowing,
    OverviewHiding,
    OverviewHidden,
}

/// Per-window notifications, delivered as `Event::Window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum WindowSignal {
    MaximizedHorizontally,
    MaximizedVertically,
    SizeChanged,
    Unmanaging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    User,
    LockScreen,
    UnlockDialog,
}

impl SessionMode {
    /// Pixels must never be read while the session is locked.
    pub fn is_secure(self) -> bool {
        matches!(self, SessionMode::LockScreen | SessionMode::UnlockDialog)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Monitor {
    pub index: MonitorIndex,
    pub geometry: Rect,
}

pub trait Shell: Send + Sync {
    fn connect(&self, signal: ShellSignal, events: Sender) -> SubscriptionId;
    fn disconnect(&self, id: SubscriptionId);

    fn connect_window(
        &self,
        window: WindowId,
        signal: WindowSignal,
        events: Sender,
    ) -> Result<SubscriptionId, ShellError>;
    fn disconnect_window(&self, window: WindowId, id: SubscriptionId) -> Result<(), ShellError>;

    /// Live windows on the active workspace.
    fn windows(&self) -> Vec<WindowSnapshot>;
    /// Every window currently managed, on any workspace.
    fn window_actors(&self) -> Vec<WindowId>;
    fn focus_window(&self) -> Option<WindowId>;

    fn primary_monitor(&self) -> Monitor;
    fn panel_height(&self) -> i32;
    fn overview_visible(&self) -> bool;
    fn session_mode(&self) -> SessionMode;
}

/// The desktop's light/dark preference. Dropping it releases the handle.
pub trait SettingsStore: Send + Sync {
    fn color_scheme(&self) -> ColorScheme;
    /// Delivers `Event::ColorSchemeChanged`.
    fn connect_changed(&self, events: Sender) -> SubscriptionId;
    fn disconnect(&self, id: SubscriptionId);
}

pub trait PixelSampler: Send + Sync {
    fn pick_color(&self, at: Point) -> BoxFuture<'static, Result<NormalizedColor, SamplingError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PanelSection {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildId(pub u64);

/// The panel actor being painted.
pub trait PanelSink: Send + Sync {
    fn set_style(&self, style: Option<&str>);
    fn style(&self) -> Option<String>;
    fn add_class(&self, name: &str);
    fn remove_class(&self, name: &str);

    /// Direct children of a layout section; empty when the section is absent.
    fn children(&self, section: PanelSection) -> Vec<ChildId>;
    fn set_child_style(&self, section: PanelSection, child: ChildId, style: Option<&str>);

    /// Delivers `Event::PanelStyleChanged`.
    fn connect_style_changed(&self, events: Sender) -> SubscriptionId;
    fn disconnect(&self, id: SubscriptionId);
}
