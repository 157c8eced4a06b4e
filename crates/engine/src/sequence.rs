/// Independently refreshed pieces of the observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Transactions,
    Monthly,
    Categories,
    Accounts,
}

/// Ticket handed out when a request for a slice is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slice: Slice,
    pub seq: u64,
}

/// Monotonic request counters, one per slice.
///
/// A response is applied only if its ticket is still the newest issued for
/// its slice, so an older response landing after a newer one is dropped
/// instead of overwriting it.
#[derive(Debug, Default)]
pub struct Sequencer {
    transactions: u64,
    monthly: u64,
    categories: u64,
    accounts: u64,
}

impl Sequencer {
    pub fn issue(&mut self, slice: Slice) -> Ticket {
        let counter = self.counter_mut(slice);
        *counter += 1;
        Ticket {
            slice,
            seq: *counter,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest(ticket.slice) == ticket.seq
    }

    pub fn latest(&self, slice: Slice) -> u64 {
        match slice {
            Slice::Transactions => self.transactions,
            Slice::Monthly => self.monthly,
            Slice::Categories => self.categories,
            Slice::Accounts => self.accounts,
        }
    }

    fn counter_mut(&mut self, slice: Slice) -> &mut u64 {
        match slice {
            Slice::Transactions => &mut self.transactions,
            Slice::Monthly => &mut self.monthly,
            Slice::Categories => &mut self.categories,
            Slice::Accounts => &mut self.accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_newest_ticket_is_current() {
        let mut seq = Sequencer::default();
        let first = seq.issue(Slice::Transactions);
        let second = seq.issue(Slice::Transactions);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn slices_are_independent() {
        let mut seq = Sequencer::default();
        let monthly = seq.issue(Slice::Monthly);
        let _ = seq.issue(Slice::Transactions);
        let _ = seq.issue(Slice::Categories);
        assert!(seq.is_current(monthly));
        assert_eq!(seq.latest(Slice::Accounts), 0);
    }

    #[test]
    fn tickets_match_on_slice_and_seq() {
        let mut seq = Sequencer::default();
        let transactions = seq.issue(Slice::Transactions);
        let categories = seq.issue(Slice::Categories);
        assert_eq!(transactions.seq, categories.seq);
        assert_ne!(transactions, categories);
        assert_eq!(
            transactions,
            Ticket {
                slice: Slice::Transactions,
                seq: 1
            }
        );
    }
}
