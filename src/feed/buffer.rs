use std::collections::VecDeque;

use super::types::BlockedEvent;

pub const BUFFER_CAPACITY: usize = 500;

/// Bounded newest-first store of blocked events.
///
/// All mutation goes through `insert`, which prepends and evicts in one step,
/// so a reader holding the same lock never sees the buffer above capacity.
#[derive(Debug)]
pub struct EventBuffer {
    events: VecDeque<BlockedEvent>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Prepends `event`. Returns the evicted oldest event, if any.
    pub fn insert(&mut self, event: BlockedEvent) -> Option<BlockedEvent> {
        self.events.push_front(event);
        if self.events.len() > self.capacity {
            self.events.pop_back()
        } else {
            None
        }
    }

    /// Newest-first prefix of at most `limit` events.
    pub fn recent(&self, limit: usize) -> Vec<BlockedEvent> {
        self.events.iter().take(limit).cloned().collect()
    }

    pub fn front(&self) -> Option<&BlockedEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockedEvent> {
        self.events.iter()
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}
