//! Request tickets.
//!
//! Nothing in flight is cancelled. Instead each request is stamped with the
//! generation current when it was issued, and a result is applied only if no
//! newer request or input change has happened since.

/// Monotonic generation counter for one kind of request.
#[derive(Debug, Default)]
pub struct Generation(u64);

/// Stamp carried by an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    /// Starts a new request, superseding every earlier ticket.
    pub fn issue(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    /// Supersedes every outstanding ticket without starting a request.
    pub fn invalidate(&mut self) {
        self.0 += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}
