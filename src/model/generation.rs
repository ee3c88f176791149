use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A value of the shared counter captured when some async work started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 { self.0 }
}

/// Monotonic counter shared between the controller and the tasks it spawns.
///
/// Every call to [`GenerationCounter::advance`] invalidates the tokens handed
/// out before it. Work holding an older token must discard its result.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter(Arc<AtomicU64>);

impl GenerationCounter {
    pub fn new() -> Self { Self::default() }

    pub fn advance(&self) -> GenerationToken {
        let generation = Generation(self.0.fetch_add(1, Ordering::SeqCst).wrapping_add(1));
        GenerationToken { generation, counter: self.clone() }
    }

    pub fn current(&self) -> Generation { Generation(self.0.load(Ordering::SeqCst)) }

    pub fn is_current(&self, generation: Generation) -> bool { self.current() == generation }
}

/// Cancellation token for one sampling run.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    generation: Generation,
    counter: GenerationCounter,
}

impl GenerationToken {
    pub fn generation(&self) -> Generation { self.generation }

    pub fn is_current(&self) -> bool { self.counter.is_current(self.generation) }
}
