//! Named one-shot timers on top of a `DelayQueue`.
//!
//! Each name holds at most one pending deadline. Starting a name that is
//! already pending replaces the old deadline.

use std::hash::Hash;
use std::time::Duration;

use tokio_stream::StreamExt;
use tokio_util::time::DelayQueue;
use tokio_util::time::delay_queue::Key;

use crate::common::collections::HashMap;

#[derive(Debug)]
pub struct Timers<K> {
    queue: DelayQueue<K>,
    pending: HashMap<K, Key>,
}

impl<K: Copy + Eq + Hash> Default for Timers<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Copy + Eq + Hash> Timers<K> {
    pub fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
            pending: HashMap::default(),
        }
    }

    pub fn start(&mut self, name: K, after: Duration) {
        self.cancel(name);
        let key = self.queue.insert(name, after);
        self.pending.insert(name, key);
    }

    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self, name: K) -> bool {
        match self.pending.remove(&name) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }

    pub fn is_pending(&self, name: K) -> bool { self.pending.contains_key(&name) }

    pub fn len(&self) -> usize { self.pending.len() }

    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    /// Waits for the next deadline. Resolves to `None` right away when nothing
    /// is pending.
    pub async fn expired(&mut self) -> Option<K> {
        let expired = self.queue.next().await?;
        let name = expired.into_inner();
        self.pending.remove(&name);
        Some(name)
    }
}
