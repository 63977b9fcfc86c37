//! Stable min-priority frontier.

use std::collections::BinaryHeap;

use crate::core::NodeId;

use super::types::FrontierEntry;

/// Binary heap with an insertion counter as secondary key, so ties pop
/// first-in first-out and searches are deterministic.
#[derive(Debug, Default)]
pub(super) struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    pub fn push(&mut self, node: NodeId, priority: f64) {
        self.heap.push(FrontierEntry {
            priority,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }
}
