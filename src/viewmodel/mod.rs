//! Per-screen state holders.
//!
//! Each holder owns one [`StateStore`]: a single state value plus a
//! `tokio::sync::watch` channel that presentation code subscribes to. Holders
//! run repository/store calls and publish the outcome; they never render.
//!
//! Overlapping actions on the same holder are sequenced with tickets. Only the
//! most recently started action may publish its result, so a slow response
//! can no longer overwrite a newer one.

mod details;
mod library;
mod search;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

pub use details::DetailsViewModel;
pub use library::LibraryViewModel;
pub use search::{SearchState, SearchViewModel};

/// Identifies one started action on a [`StateStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct StateStore<S> {
    tx: watch::Sender<S>,
    latest: AtomicU64,
}

impl<S: Clone + Send + Sync + 'static> StateStore<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            latest: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes on every published change.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Publish unconditionally.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Start an action; any ticket handed out earlier becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Publish only if no newer action has started. Returns whether it published.
    pub fn update_if_current(&self, ticket: Ticket, f: impl FnOnce(&mut S)) -> bool {
        self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            f(state);
            true
        })
    }
}
