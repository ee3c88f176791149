//! The panel color controller.
//!
//! Window, overview and session events are coalesced by named timers into
//! calls to [`PanelColor::update_panel`], which either samples the maximized
//! window's colors or falls back to the theme color. Sampling runs on its own
//! task and is invalidated by the generation counter whenever a newer update
//! starts.

use std::sync::Arc;
use std::time::Duration;

use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, trace, warn};

use crate::actor;
use crate::common::config::Config;
use crate::model::window::find_maximized_window;
use crate::model::{Generation, GenerationCounter, GenerationToken, Rgb, WindowId, WindowSnapshot};
use crate::sys::shell::{
    PanelSink, PixelSampler, SettingsStore, Shell, ShellSignal, SubscriptionId, WindowSignal,
};
use crate::sys::timer::Timers;

pub mod error;
mod events;
pub mod registry;
pub mod sampler;
pub mod style;
#[cfg(test)]
pub(crate) mod testing;

use error::SamplingError;
use events::{OverviewEventHandler, WindowEventHandler};
use registry::WindowRegistry;
use sampler::{ColorSampler, probe_points};
use style::PanelStyle;

#[derive(Debug)]
pub enum Event {
    FocusWindowChanged,
    WindowCreated(WindowId),
    Restacked,
    ActiveWorkspaceChanged,
    ColorSchemeChanged,
    OverviewShowing,
    OverviewHiding,
    OverviewHidden,
    PanelStyleChanged,
    Window(WindowId, WindowSignal),
    Sampled {
        generation: Generation,
        result: Result<Rgb, SamplingError>,
    },
    ConfigUpdated(Box<Config>),
    /// Tears everything down and stops the actor.
    Disable,
}

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    Debounce,
    FollowUp,
    FollowUpLate,
    Settle,
    Poll,
}

/// Where the controller stands relative to the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    OverviewVisible,
    OverviewClosing,
    /// The overview just closed; sampling waits for rendering to settle.
    Settling,
}

/// The external pieces the controller drives.
#[derive(Clone)]
pub struct Collaborators {
    pub shell: Arc<dyn Shell>,
    pub settings: Arc<dyn SettingsStore>,
    pub sampler: Arc<dyn PixelSampler>,
    pub panel: Arc<dyn PanelSink>,
}

#[derive(Debug, Clone, Copy)]
enum Subscription {
    Shell(SubscriptionId),
    Settings(SubscriptionId),
    Panel(SubscriptionId),
}

pub struct PanelColor {
    config: Config,
    rx: Receiver,
    events_tx: Sender,
    shell: Arc<dyn Shell>,
    settings: Option<Arc<dyn SettingsStore>>,
    panel: Arc<dyn PanelSink>,
    sampler: ColorSampler,
    style: PanelStyle,
    windows: WindowRegistry,
    timers: Timers<Timer>,
    generations: GenerationCounter,
    subscriptions: Vec<Subscription>,
    phase: Phase,
    last_window_color: Option<Rgb>,
    enabled: bool,
}

impl PanelColor {
    pub fn new(
        config: Config,
        collaborators: Collaborators,
        events_tx: Sender,
        rx: Receiver,
    ) -> Self {
        let Collaborators { shell, settings, sampler, panel } = collaborators;
        Self {
            sampler: ColorSampler::new(sampler, events_tx.clone()),
            style: PanelStyle::new(panel.clone(), config.settings.transition()),
            config,
            rx,
            events_tx,
            shell,
            settings: Some(settings),
            panel,
            windows: WindowRegistry::new(),
            timers: Timers::new(),
            generations: GenerationCounter::new(),
            subscriptions: Vec::new(),
            phase: Phase::Idle,
            last_window_color: None,
            enabled: false,
        }
    }

    /// Creates the actor on a fresh channel and returns it with its sender.
    pub fn with_channel(config: Config, collaborators: Collaborators) -> (Self, Sender) {
        let (events_tx, rx) = actor::channel();
        (Self::new(config, collaborators, events_tx.clone(), rx), events_tx)
    }

    pub async fn run(mut self) {
        self.enable();
        while self.step().await {}
        self.disable();
    }

    /// Handles one event or timer expiry. Returns false once the actor should
    /// stop.
    async fn step(&mut self) -> bool {
        tokio::select! {
            maybe = self.rx.recv() => match maybe {
                Some((span, event)) => {
                    let stop = matches!(event, Event::Disable);
                    span.in_scope(|| self.handle_event(event));
                    !stop
                }
                None => false,
            },
            Some(timer) = self.timers.expired() => {
                self.handle_timer(timer);
                true
            }
        }
    }

    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        let Some(settings) = self.settings.clone() else {
            warn!("panel color controller cannot be enabled again after disable");
            return;
        };
        info!("enabling adaptive panel color");
        self.enabled = true;

        let id = settings.connect_changed(self.events_tx.clone());
        self.subscriptions.push(Subscription::Settings(id));
        for signal in ShellSignal::iter() {
            let id = self.shell.connect(signal, self.events_tx.clone());
            self.subscriptions.push(Subscription::Shell(id));
        }
        let id = self.panel.connect_style_changed(self.events_tx.clone());
        self.subscriptions.push(Subscription::Panel(id));

        for window in self.shell.window_actors() {
            self.track_window(window);
        }

        self.schedule_update();
        self.timers.start(Timer::Poll, self.config.settings.poll_interval());
    }

    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        info!("disabling adaptive panel color");
        self.enabled = false;

        // Any sampling still in flight now resolves to nothing.
        self.generations.advance();
        self.timers.cancel_all();

        for subscription in self.subscriptions.drain(..) {
            match subscription {
                Subscription::Shell(id) => self.shell.disconnect(id),
                Subscription::Panel(id) => self.panel.disconnect(id),
                Subscription::Settings(id) => {
                    if let Some(settings) = &self.settings {
                        settings.disconnect(id);
                    }
                }
            }
        }
        self.windows.untrack_all(&*self.shell);

        self.style.reset();
        self.last_window_color = None;
        self.phase = Phase::Idle;
        self.settings = None;
    }

    #[instrument(name = "panel_color::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        if !self.enabled && !matches!(event, Event::ConfigUpdated(_) | Event::Disable) {
            trace!("controller disabled; dropping event");
            return;
        }
        match event {
            Event::FocusWindowChanged => WindowEventHandler::handle_focus_changed(self),
            Event::WindowCreated(window) => WindowEventHandler::handle_window_created(self, window),
            Event::Window(window, signal) => {
                WindowEventHandler::handle_window_signal(self, window, signal)
            }
            Event::Restacked | Event::ActiveWorkspaceChanged | Event::ColorSchemeChanged => {
                self.schedule_update()
            }
            Event::OverviewShowing => OverviewEventHandler::handle_showing(self),
            Event::OverviewHiding => OverviewEventHandler::handle_hiding(self),
            Event::OverviewHidden => OverviewEventHandler::handle_hidden(self),
            Event::PanelStyleChanged => {
                self.style.handle_style_changed();
            }
            Event::Sampled { generation, result } => self.handle_sampled(generation, result),
            Event::ConfigUpdated(config) => self.handle_config_updated(config),
            Event::Disable => self.disable(),
        }
    }

    fn handle_timer(&mut self, timer: Timer) {
        trace!(?timer, "timer fired");
        match timer {
            Timer::Debounce | Timer::FollowUp | Timer::FollowUpLate => self.update_panel(),
            Timer::Settle => OverviewEventHandler::handle_settled(self),
            Timer::Poll => {
                self.timers.start(Timer::Poll, self.config.settings.poll_interval());
                if self.may_poll() {
                    self.update_panel();
                }
            }
        }
    }

    pub fn schedule_update(&mut self) { self.schedule_update_after(self.config.settings.debounce()); }

    /// Restarts the debounce timer; the update runs once `delay` passes without
    /// another call.
    pub fn schedule_update_after(&mut self, delay: Duration) {
        self.timers.start(Timer::Debounce, delay);
    }

    /// Like [`Self::schedule_update`], plus two later resamples for
    /// applications that repaint after the compositor reports the new size.
    pub fn schedule_update_with_follow_up(&mut self) {
        self.schedule_update();
        let [early, late] = self.config.settings.follow_ups();
        self.timers.start(Timer::FollowUp, early);
        self.timers.start(Timer::FollowUpLate, late);
    }

    /// Decides between sampling and the theme color for the current state.
    pub fn update_panel(&mut self) {
        let token = self.generations.advance();

        if self.session_is_secure() || self.overview_obscures_windows() {
            self.apply_theme_color();
            return;
        }

        if self.phase == Phase::Settling {
            trace!("settling after overview; skipping update");
            return;
        }

        match self.maximized_window() {
            Some(window) => self.start_sampling(token, window),
            None => self.apply_theme_color(),
        }
    }

    fn start_sampling(&mut self, token: GenerationToken, window: WindowSnapshot) {
        let monitor = self.shell.primary_monitor();
        let points = probe_points(
            monitor.geometry,
            self.shell.panel_height(),
            self.config.settings.probe_margin,
        );
        debug!(window = ?window.id, generation = token.generation().get(), "sampling panel color");
        self.sampler.spawn(token, points);
    }

    fn handle_sampled(&mut self, generation: Generation, result: Result<Rgb, SamplingError>) {
        if !self.generations.is_current(generation) {
            trace!(generation = generation.get(), "discarding stale sample");
            return;
        }
        if self.session_is_secure() {
            self.apply_theme_color();
            return;
        }
        match result {
            Ok(color) => {
                debug!(%color, "applying sampled color");
                self.last_window_color = Some(color);
                self.style.apply(color, false);
            }
            Err(err) => {
                debug!(%err, "pick_color failed; falling back to theme color");
                self.apply_theme_color();
            }
        }
    }

    fn handle_config_updated(&mut self, config: Box<Config>) {
        self.config = *config;
        self.style.set_transition(self.config.settings.transition());
        if self.timers.is_pending(Timer::Poll) {
            self.timers.start(Timer::Poll, self.config.settings.poll_interval());
        }
        debug!("updated panel color configuration");
    }

    pub fn apply_theme_color(&mut self) {
        let scheme = self.settings.as_ref().map(|s| s.color_scheme()).unwrap_or_default();
        self.style.apply(scheme.fallback_color(), false);
    }

    fn track_window(&mut self, window: WindowId) {
        if self.windows.track(&*self.shell, window, &self.events_tx) {
            trace!(?window, "tracking window");
        }
    }

    fn maximized_window(&self) -> Option<WindowSnapshot> {
        let primary = self.shell.primary_monitor().index;
        find_maximized_window(&self.shell.windows(), primary)
    }

    fn session_is_secure(&self) -> bool { self.shell.session_mode().is_secure() }

    fn overview_obscures_windows(&self) -> bool {
        matches!(self.phase, Phase::OverviewVisible | Phase::OverviewClosing)
            || self.shell.overview_visible()
    }

    fn may_poll(&self) -> bool {
        self.phase == Phase::Idle
            && !self.shell.overview_visible()
            && self.maximized_window().is_some()
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase change");
            self.phase = phase;
        }
    }

    pub fn phase(&self) -> Phase { self.phase }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn last_window_color(&self) -> Option<Rgb> { self.last_window_color }

    pub fn current_background(&self) -> Option<Rgb> { self.style.current_background() }
}
