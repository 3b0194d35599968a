// Last-writer-wins ordering for overlapping polls.
//
// Polls are issued on a fixed timer regardless of whether the previous one has completed, so
// replies may arrive out of order. Each request gets a ticket; a reply is applied only if its
// ticket is newer than the ticket of the latest reply applied so far. Older replies describe a
// state the server has already moved past and are dropped.

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestTicket(u64);

pub struct RequestSequencer {
    next: u64,
    latest_applied: Option<RequestTicket>,
}

impl RequestTicket {
    pub fn seq(self) -> u64 { self.0 }
}

impl RequestSequencer {
    pub fn new() -> Self { RequestSequencer { next: 0, latest_applied: None } }

    pub fn issue(&mut self) -> RequestTicket {
        let ticket = RequestTicket(self.next);
        self.next += 1;
        ticket
    }

    // Returns whether the reply for `ticket` should be applied. Accepting a ticket makes all
    // earlier tickets stale.
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 >= self.next {
            log::warn!("Ignoring reply for ticket {} that was never issued", ticket.0);
            return false;
        }
        if self.latest_applied.is_some_and(|latest| ticket <= latest) {
            return false;
        }
        self.latest_applied = Some(ticket);
        true
    }

    pub fn num_issued(&self) -> u64 { self.next }
}

impl Default for RequestSequencer {
    fn default() -> Self { Self::new() }
}
