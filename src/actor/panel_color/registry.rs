use strum::IntoEnumIterator;
use tracing::trace;

use super::Sender;
use crate::common::collections::HashMap;
use crate::model::WindowId;
use crate::sys::shell::{Shell, SubscriptionId, WindowSignal};

/// Per-window subscriptions held by the controller.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, Vec<SubscriptionId>>,
}

impl WindowRegistry {
    pub fn new() -> Self { Self::default() }

    /// Subscribes to every [`WindowSignal`] of `window`. Returns false if the
    /// window was already tracked or vanished while subscribing.
    pub fn track(&mut self, shell: &dyn Shell, window: WindowId, events: &Sender) -> bool {
        if self.windows.contains_key(&window) {
            return false;
        }

        let mut ids = Vec::with_capacity(4);
        for signal in WindowSignal::iter() {
            match shell.connect_window(window, signal, events.clone()) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    let signal: &'static str = signal.into();
                    trace!(%err, signal, "window vanished while tracking");
                    release(shell, window, ids);
                    return false;
                }
            }
        }

        self.windows.insert(window, ids);
        true
    }

    pub fn untrack(&mut self, shell: &dyn Shell, window: WindowId) -> bool {
        match self.windows.remove(&window) {
            Some(ids) => {
                release(shell, window, ids);
                true
            }
            None => false,
        }
    }

    pub fn untrack_all(&mut self, shell: &dyn Shell) {
        for (window, ids) in self.windows.drain() {
            release(shell, window, ids);
        }
    }

    pub fn contains(&self, window: WindowId) -> bool { self.windows.contains_key(&window) }

    pub fn len(&self) -> usize { self.windows.len() }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }
}

fn release(shell: &dyn Shell, window: WindowId, ids: Vec<SubscriptionId>) {
    for id in ids {
        if let Err(err) = shell.disconnect_window(window, id) {
            trace!(%err, "ignoring stale window subscription");
        }
    }
}
