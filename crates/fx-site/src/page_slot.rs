//! Latest rendered page, ordered by when each render started.
//!
//! Every render takes a [`Ticket`] before it starts. Tickets are handed out
//! in increasing order, and [`PageSlot::publish`] only replaces the stored
//! value with one from a later ticket. A slow render started before a newer
//! one can therefore never overwrite it, regardless of which finishes first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Generation number taken when a render starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Published<T> {
    generation: u64,
    value: Arc<T>,
}

/// Holds the most recently started render that has finished.
#[derive(Debug)]
pub struct PageSlot<T> {
    next_generation: AtomicU64,
    current: RwLock<Option<Published<T>>>,
}

impl<T> Default for PageSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_generation: AtomicU64::new(1),
            current: RwLock::new(None),
        }
    }

    /// Stamp a render that is about to start.
    pub fn begin(&self) -> Ticket {
        Ticket(self.next_generation.fetch_add(1, Ordering::Relaxed))
    }

    /// Store `value` unless a render with a later ticket was already published.
    ///
    /// Returns `true` if `value` is now current.
    pub fn publish(&self, ticket: Ticket, value: Arc<T>) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|published| published.generation > ticket.0)
        {
            tracing::debug!(generation = ticket.0, "Discarding stale render");
            return false;
        }
        *current = Some(Published {
            generation: ticket.0,
            value,
        });
        true
    }

    /// Most recently published value.
    #[must_use]
    pub fn current(&self) -> Option<Arc<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|published| Arc::clone(&published.value))
    }
}
