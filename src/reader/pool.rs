//! Element Pools
//!
//! Free lists of start and end elements. Checking an element out moves
//! it out of the list, so the reader owns it exclusively until it is
//! released; callers only ever see borrows of it.

use super::events::{EndElement, StartElement};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Idle elements kept per variant
pub const MAX_IDLE: usize = 1024;

/// Reusable store of start and end elements for one owner
#[derive(Debug, Default)]
pub struct ElementPool {
    starts: Vec<StartElement>,
    ends: Vec<EndElement>,
}

impl ElementPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an idle start element, or allocate one.
    ///
    /// The element keeps whatever the previous user left in it; parsing
    /// overwrites it in place.
    pub fn checkout_start(&mut self) -> StartElement {
        self.starts.pop().unwrap_or_else(|| {
            log::trace!("start element pool empty, allocating");
            StartElement::default()
        })
    }

    /// Take an idle end element, or allocate one
    pub fn checkout_end(&mut self) -> EndElement {
        self.ends.pop().unwrap_or_else(|| {
            log::trace!("end element pool empty, allocating");
            EndElement::default()
        })
    }

    /// Return a start element; dropped once `MAX_IDLE` are idle
    pub fn release_start(&mut self, start: StartElement) {
        if self.starts.len() < MAX_IDLE {
            self.starts.push(start);
        }
    }

    /// Return an end element; dropped once `MAX_IDLE` are idle
    pub fn release_end(&mut self, end: EndElement) {
        if self.ends.len() < MAX_IDLE {
            self.ends.push(end);
        }
    }

    /// Idle start elements
    pub fn idle_starts(&self) -> usize {
        self.starts.len()
    }

    /// Idle end elements
    pub fn idle_ends(&self) -> usize {
        self.ends.len()
    }
}

/// Thread-safe pool shared between readers.
///
/// Cloning yields another handle to the same free lists.
#[derive(Debug, Clone, Default)]
pub struct SharedPool {
    inner: Arc<Mutex<ElementPool>>,
}

impl SharedPool {
    /// Create an empty shared pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide pool
    pub fn global() -> &'static SharedPool {
        static GLOBAL: OnceLock<SharedPool> = OnceLock::new();
        GLOBAL.get_or_init(SharedPool::new)
    }

    // Free lists stay consistent across a panic; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, ElementPool> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take an idle start element, or allocate one
    pub fn checkout_start(&self) -> StartElement {
        self.lock().checkout_start()
    }

    /// Take an idle end element, or allocate one
    pub fn checkout_end(&self) -> EndElement {
        self.lock().checkout_end()
    }

    /// Return a start element to the shared lists
    pub fn release_start(&self, start: StartElement) {
        self.lock().release_start(start)
    }

    /// Return an end element to the shared lists
    pub fn release_end(&self, end: EndElement) {
        self.lock().release_end(end)
    }

    /// Idle start elements across all handles
    pub fn idle_starts(&self) -> usize {
        self.lock().idle_starts()
    }

    /// Idle end elements across all handles
    pub fn idle_ends(&self) -> usize {
        self.lock().idle_ends()
    }
}

/// Pool used by a reader: its own, or a shared one
#[derive(Debug)]
pub(crate) enum PoolHandle {
    Local(ElementPool),
    Shared(SharedPool),
}

impl PoolHandle {
    pub(crate) fn checkout_start(&mut self) -> StartElement {
        match self {
            PoolHandle::Local(pool) => pool.checkout_start(),
            PoolHandle::Shared(pool) => pool.checkout_start(),
        }
    }

    pub(crate) fn checkout_end(&mut self) -> EndElement {
        match self {
            PoolHandle::Local(pool) => pool.checkout_end(),
            PoolHandle::Shared(pool) => pool.checkout_end(),
        }
    }

    pub(crate) fn release_start(&mut self, start: StartElement) {
        match self {
            PoolHandle::Local(pool) => pool.release_start(start),
            PoolHandle::Shared(pool) => pool.release_start(start),
        }
    }

    pub(crate) fn release_end(&mut self, end: EndElement) {
        match self {
            PoolHandle::Local(pool) => pool.release_end(end),
            PoolHandle::Shared(pool) => pool.release_end(end),
        }
    }

    pub(crate) fn idle(&self) -> (usize, usize) {
        match self {
            PoolHandle::Local(pool) => (pool.idle_starts(), pool.idle_ends()),
            PoolHandle::Shared(pool) => (pool.idle_starts(), pool.idle_ends()),
        }
    }
}
