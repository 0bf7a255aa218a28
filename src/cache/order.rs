//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted so the oldest can be evicted.

use std::collections::VecDeque;

// == Insertion Order ==
/// FIFO tracker of inserted keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = earliest inserted
/// - Back = most recently inserted
///
/// Each push is stamped with a sequence number. Deleting or replacing a key
/// does not touch the queue; the stale slot is skipped when it reaches the
/// front, and the queue is compacted once stale slots dominate. Finding the
/// oldest live key is amortized O(1).
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Keys with the sequence number they were pushed under
    queue: VecDeque<(u64, String)>,
    /// Next sequence number to hand out
    next_sequence: u64,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Records `key` as the newest insertion and returns its sequence number.
    pub fn push(&mut self, key: &str) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push_back((sequence, key.to_string()));
        sequence
    }

    // == Pop Oldest ==
    /// Removes and returns the earliest-inserted key that is still live.
    ///
    /// `is_live(key, sequence)` tells whether the slot still describes the
    /// current entry for that key. Stale slots are dropped along the way.
    pub fn pop_oldest<F>(&mut self, mut is_live: F) -> Option<String>
    where
        F: FnMut(&str, u64) -> bool,
    {
        while let Some((sequence, key)) = self.queue.pop_front() {
            if is_live(&key, sequence) {
                return Some(key);
            }
        }
        None
    }

    // == Compact ==
    /// Drops stale slots once they outnumber live entries.
    pub fn compact_if_needed<F>(&mut self, live_entries: usize, mut is_live: F)
    where
        F: FnMut(&str, u64) -> bool,
    {
        if self.queue.len() > live_entries.saturating_mul(2).max(16) {
            self.queue.retain(|(sequence, key)| is_live(key, *sequence));
        }
    }

    // == Clear ==
    /// Forgets every tracked key.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    // == Length ==
    /// Returns the number of slots, live or stale.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    // == Is Empty ==
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
