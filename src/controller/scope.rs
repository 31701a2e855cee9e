//! Per-request cancellation.
//!
//! Every request a controller issues takes a [`CancelToken`] from the
//! controller's [`RequestScope`] before it starts and checks it before touching
//! state with the response. Leaving a view, or switching the id a view watches,
//! cancels every token handed out so far. Work that is claimed in one place
//! and started in another takes a [`Ticket`] at claim time and redeems it
//! when it starts, so a cancel in between still reaches it.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestScope {
    generation: AtomicU64,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken<'_> {
        self.redeem(self.ticket())
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::Acquire))
    }

    /// A token that is cancelled if the scope was cancelled since `ticket`
    pub fn redeem(&self, ticket: Ticket) -> CancelToken<'_> {
        CancelToken {
            scope: self,
            generation: ticket.0,
        }
    }

    /// Cancel every outstanding token
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// The generation of a [`RequestScope`] at the time it was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy)]
pub struct CancelToken<'a> {
    scope: &'a RequestScope,
    generation: u64,
}

impl CancelToken<'_> {
    pub fn is_cancelled(&self) -> bool {
        self.scope.generation.load(Ordering::Acquire) != self.generation
    }
}
