//! Session-unique identifiers for bookings and invoices.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::{Timestamp, Uuid};

/// Produces identifiers that never repeat within one process.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Time-ordered UUIDv7 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string()
    }
}

/// Counts up from a starting value; deterministic ids for tests and demos.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_do_not_collide() {
        let ids = UuidIds;
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::starting_at(10);
        assert_eq!(ids.next_id(), "10");
        assert_eq!(ids.next_id(), "11");
    }
}
