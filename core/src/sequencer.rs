/// Identifies one outgoing chat request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Orders responses by request issue order.
///
/// A response is applied only when its ticket is newer than the last one
/// applied, so a slow early request cannot overwrite what a later one drew.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns `true` and records the ticket if it may be applied.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Makes every ticket issued so far stale.
    pub fn invalidate(&mut self) {
        self.applied = self.issued;
    }
}
