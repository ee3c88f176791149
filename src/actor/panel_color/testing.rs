use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::error::{SamplingError, ShellError};
use super::{Collaborators, PanelColor, Sender};
use crate::common::collections::{HashMap, HashSet};
use crate::common::config::Config;
use crate::model::{
    ColorScheme, MonitorIndex, NormalizedColor, Point, Rect, WindowId, WindowSnapshot, WindowType,
};
use crate::sys::shell::{
    BoxFuture, ChildId, Monitor, PanelSection, PanelSink, PixelSampler, SessionMode,
    SettingsStore, Shell, ShellSignal, SubscriptionId, WindowSignal,
};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

fn next_subscription() -> SubscriptionId {
    SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
}

pub fn maximized_window(id: u64, stack_position: u32) -> WindowSnapshot {
    WindowSnapshot {
        id: WindowId(id),
        monitor: MonitorIndex(0),
        minimized: false,
        window_type: WindowType::Normal,
        maximized_horizontally: true,
        maximized_vertically: true,
        stack_position,
    }
}

#[derive(Default)]
struct ShellState {
    windows: Vec<WindowSnapshot>,
    actors: Vec<WindowId>,
    focus: Option<WindowId>,
    overview_visible: bool,
    session_mode: SessionMode,
    connections: HashMap<SubscriptionId, ShellSignal>,
    window_connections: HashMap<SubscriptionId, (WindowId, WindowSignal)>,
    dead: HashSet<WindowId>,
}

pub struct FakeShell {
    state: Mutex<ShellState>,
    monitor: Monitor,
    panel_height: i32,
}

impl FakeShell {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ShellState::default()),
            monitor: Monitor {
                index: MonitorIndex(0),
                geometry: Rect::new(0, 0, 1920, 1080),
            },
            panel_height: 32,
        }
    }

    pub fn set_windows(&self, windows: Vec<WindowSnapshot>) {
        let mut state = self.state.lock();
        state.actors = windows.iter().map(|w| w.id).collect();
        state.windows = windows;
    }

    pub fn set_focus(&self, window: Option<WindowId>) { self.state.lock().focus = window; }

    pub fn set_overview_visible(&self, visible: bool) {
        self.state.lock().overview_visible = visible;
    }

    pub fn set_session_mode(&self, mode: SessionMode) { self.state.lock().session_mode = mode; }

    /// The compositor drops a destroyed window's handlers on its own.
    pub fn destroy_window(&self, window: WindowId) {
        let mut state = self.state.lock();
        state.dead.insert(window);
        state.windows.retain(|w| w.id != window);
        state.actors.retain(|w| *w != window);
        state.window_connections.retain(|_, (w, _)| *w != window);
    }

    pub fn subscription_count(&self) -> usize { self.state.lock().connections.len() }

    pub fn window_subscription_count(&self) -> usize {
        self.state.lock().window_connections.len()
    }

    pub fn is_tracked(&self, window: WindowId) -> bool {
        self.state.lock().window_connections.values().any(|(w, _)| *w == window)
    }
}

impl Shell for FakeShell {
    fn connect(&self, signal: ShellSignal, _events: Sender) -> SubscriptionId {
        let id = next_subscription();
        self.state.lock().connections.insert(id, signal);
        id
    }

    fn disconnect(&self, id: SubscriptionId) { self.state.lock().connections.remove(&id); }

    fn connect_window(
        &self,
        window: WindowId,
        signal: WindowSignal,
        _events: Sender,
    ) -> Result<SubscriptionId, ShellError> {
        let mut state = self.state.lock();
        if state.dead.contains(&window) {
            return Err(ShellError::WindowGone(window));
        }
        let id = next_subscription();
        state.window_connections.insert(id, (window, signal));
        Ok(id)
    }

    fn disconnect_window(&self, window: WindowId, id: SubscriptionId) -> Result<(), ShellError> {
        let mut state = self.state.lock();
        if state.dead.contains(&window) {
            return Err(ShellError::WindowGone(window));
        }
        state.window_connections.remove(&id);
        Ok(())
    }

    fn windows(&self) -> Vec<WindowSnapshot> { self.state.lock().windows.clone() }

    fn window_actors(&self) -> Vec<WindowId> { self.state.lock().actors.clone() }

    fn focus_window(&self) -> Option<WindowId> { self.state.lock().focus }

    fn primary_monitor(&self) -> Monitor { self.monitor }

    fn panel_height(&self) -> i32 { self.panel_height }

    fn overview_visible(&self) -> bool { self.state.lock().overview_visible }

    fn session_mode(&self) -> SessionMode { self.state.lock().session_mode }
}

#[derive(Default)]
pub struct FakeSettings {
    scheme: Mutex<ColorScheme>,
    subscriptions: Mutex<HashSet<SubscriptionId>>,
}

impl FakeSettings {
    pub fn set_scheme(&self, scheme: ColorScheme) { *self.scheme.lock() = scheme; }

    pub fn subscription_count(&self) -> usize { self.subscriptions.lock().len() }
}

impl SettingsStore for FakeSettings {
    fn color_scheme(&self) -> ColorScheme { *self.scheme.lock() }

    fn connect_changed(&self, _events: Sender) -> SubscriptionId {
        let id = next_subscription();
        self.subscriptions.lock().insert(id);
        id
    }

    fn disconnect(&self, id: SubscriptionId) { self.subscriptions.lock().remove(&id); }
}

pub struct FakeSampler {
    colors: Mutex<HashMap<i32, NormalizedColor>>,
    fallback: Mutex<NormalizedColor>,
    failure: Mutex<Option<SamplingError>>,
    requests: Mutex<Vec<Point>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeSampler {
    pub fn new() -> Self {
        Self {
            colors: Mutex::new(HashMap::default()),
            fallback: Mutex::new(NormalizedColor::new(0.0, 0.0, 0.0)),
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn set_color(&self, color: NormalizedColor) {
        self.colors.lock().clear();
        *self.fallback.lock() = color;
    }

    pub fn set_color_at(&self, x: i32, color: NormalizedColor) {
        self.colors.lock().insert(x, color);
    }

    pub fn fail_with(&self, err: SamplingError) { *self.failure.lock() = Some(err); }

    /// Requests block until [`Self::open_gate`] is called.
    pub fn close_gate(&self) { *self.gate.lock() = Some(Arc::new(Semaphore::new(0))); }

    pub fn open_gate(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.add_permits(Semaphore::MAX_PERMITS);
        }
    }

    pub fn requests(&self) -> Vec<Point> { self.requests.lock().clone() }

    pub fn request_count(&self) -> usize { self.requests.lock().len() }
}

impl PixelSampler for FakeSampler {
    fn pick_color(&self, at: Point) -> BoxFuture<'static, Result<NormalizedColor, SamplingError>> {
        self.requests.lock().push(at);
        let result = match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(self.colors.lock().get(&at.x).copied().unwrap_or(*self.fallback.lock())),
        };
        let gate = self.gate.lock().clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _permit = gate.acquire().await;
            }
            result
        })
    }
}

#[derive(Default)]
struct PanelState {
    style: Option<String>,
    classes: BTreeSet<String>,
    children: Vec<(PanelSection, ChildId)>,
    child_styles: HashMap<ChildId, Option<String>>,
    styles_written: Vec<Option<String>>,
    subscriptions: HashSet<SubscriptionId>,
}

#[derive(Default)]
pub struct FakePanel {
    state: Mutex<PanelState>,
}

impl FakePanel {
    pub fn with_children(sections: &[(PanelSection, u64)]) -> Self {
        let panel = Self::default();
        {
            let mut state = panel.state.lock();
            let mut next = 1;
            for &(section, count) in sections {
                for _ in 0..count {
                    state.children.push((section, ChildId(next)));
                    next += 1;
                }
            }
        }
        panel
    }

    pub fn classes(&self) -> Vec<String> { self.state.lock().classes.iter().cloned().collect() }

    pub fn child_styles(&self) -> Vec<Option<String>> {
        let state = self.state.lock();
        state
            .children
            .iter()
            .map(|(_, child)| state.child_styles.get(child).cloned().flatten())
            .collect()
    }

    /// Every `set_style` call so far, oldest first.
    pub fn styles_written(&self) -> Vec<Option<String>> { self.state.lock().styles_written.clone() }

    pub fn backgrounds_written(&self) -> Vec<String> {
        self.styles_written()
            .into_iter()
            .flatten()
            .filter_map(|s| {
                let rest = s.strip_prefix("background-color: ")?;
                Some(rest.split(';').next()?.to_string())
            })
            .collect()
    }

    pub fn subscription_count(&self) -> usize { self.state.lock().subscriptions.len() }
}

impl PanelSink for FakePanel {
    fn set_style(&self, style: Option<&str>) {
        let style = style.map(str::to_string);
        let mut state = self.state.lock();
        state.style = style.clone();
        state.styles_written.push(style);
    }

    fn style(&self) -> Option<String> { self.state.lock().style.clone() }

    fn add_class(&self, name: &str) { self.state.lock().classes.insert(name.to_string()); }

    fn remove_class(&self, name: &str) { self.state.lock().classes.remove(name); }

    fn children(&self, section: PanelSection) -> Vec<ChildId> {
        let state = self.state.lock();
        state.children.iter().filter(|(s, _)| *s == section).map(|(_, c)| *c).collect()
    }

    fn set_child_style(&self, _section: PanelSection, child: ChildId, style: Option<&str>) {
        self.state.lock().child_styles.insert(child, style.map(str::to_string));
    }

    fn connect_style_changed(&self, _events: Sender) -> SubscriptionId {
        let id = next_subscription();
        self.state.lock().subscriptions.insert(id);
        id
    }

    fn disconnect(&self, id: SubscriptionId) { self.state.lock().subscriptions.remove(&id); }
}

pub struct Harness {
    pub shell: Arc<FakeShell>,
    pub settings: Arc<FakeSettings>,
    pub sampler: Arc<FakeSampler>,
    pub panel: Arc<FakePanel>,
    pub tx: Sender,
    pub controller: PanelColor,
}

impl Harness {
    pub fn new() -> Self { Self::with_config(Config::default()) }

    pub fn with_config(config: Config) -> Self {
        let shell = Arc::new(FakeShell::new());
        let settings = Arc::new(FakeSettings::default());
        let sampler = Arc::new(FakeSampler::new());
        let panel = Arc::new(FakePanel::with_children(&[
            (PanelSection::Start, 1),
            (PanelSection::Center, 1),
            (PanelSection::End, 2),
        ]));
        let collaborators = Collaborators {
            shell: shell.clone(),
            settings: settings.clone(),
            sampler: sampler.clone(),
            panel: panel.clone(),
        };
        let (controller, tx) = PanelColor::with_channel(config, collaborators);
        Self {
            shell,
            settings,
            sampler,
            panel,
            tx,
            controller,
        }
    }

    /// Drives the actor loop until `duration` of tokio time has passed.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while let Ok(keep_going) = tokio::time::timeout_at(deadline, self.controller.step()).await {
            if !keep_going {
                break;
            }
        }
    }

    pub async fn run_for_ms(&mut self, ms: u64) { self.run_for(Duration::from_millis(ms)).await }
}
