/// Opaque handle to a window managed by the shell.
///
/// The controller never assumes the window still exists; the shell reports
/// only live windows and refuses operations on dead ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    #[default]
    Normal,
    Dialog,
    ModalDialog,
    Dock,
    Desktop,
    Utility,
    Splashscreen,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// The attributes of a window the controller looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub monitor: MonitorIndex,
    pub minimized: bool,
    pub window_type: WindowType,
    pub maximized_horizontally: bool,
    pub maximized_vertically: bool,
    /// Higher is closer to the top of the stack.
    pub stack_position: u32,
}

impl WindowSnapshot {
    pub fn is_maximized(&self) -> bool {
        self.maximized_horizontally && self.maximized_vertically
    }

    fn drives_panel_on(&self, primary: MonitorIndex) -> bool {
        self.monitor == primary
            && !self.minimized
            && self.window_type == WindowType::Normal
            && self.is_maximized()
    }
}

/// Finds the window whose content the panel should follow: the topmost normal,
/// unminimized window maximized in both axes on the primary monitor.
pub fn find_maximized_window(
    windows: &[WindowSnapshot],
    primary: MonitorIndex,
) -> Option<WindowSnapshot> {
    windows
        .iter()
        .filter(|w| w.drives_panel_on(primary))
        .max_by_key(|w| w.stack_position)
        .copied()
}
