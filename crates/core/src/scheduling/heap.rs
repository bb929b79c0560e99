// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary min-heap of scheduled items keyed by next occurrence
//!
//! `std::collections::BinaryHeap` cannot re-key its root in place or remove
//! an arbitrary entry, both of which the scheduler needs, so the heap is
//! kept by hand over a dense `Vec`.

use super::scheduled::ScheduledEvent;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A scheduled event paired with its next occurrence
#[derive(Clone)]
pub struct ScheduledItem {
    pub scheduled: Arc<ScheduledEvent>,
    pub occurrence: DateTime<Utc>,
}

impl ScheduledItem {
    pub fn new(scheduled: Arc<ScheduledEvent>, occurrence: DateTime<Utc>) -> Self {
        Self {
            scheduled,
            occurrence,
        }
    }
}

impl std::fmt::Debug for ScheduledItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledItem")
            .field("event", &self.scheduled.label())
            .field("occurrence", &self.occurrence)
            .finish()
    }
}

/// Min-heap where `items[(i - 1) / 2].occurrence <= items[i].occurrence`
#[derive(Debug, Default)]
pub struct ScheduleHeap {
    items: Vec<ScheduledItem>,
}

impl ScheduleHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ScheduledItem) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub fn peek(&self) -> Option<&ScheduledItem> {
        self.items.first()
    }

    pub fn pop(&mut self) -> Option<ScheduledItem> {
        self.remove_at(0)
    }

    /// Mutable access to the root; follow a key change with
    /// [`reprioritize_head`](Self::reprioritize_head)
    pub fn head_mut(&mut self) -> Option<&mut ScheduledItem> {
        self.items.first_mut()
    }

    /// Restore the heap after the root's occurrence changed in place
    pub fn reprioritize_head(&mut self) {
        if !self.items.is_empty() {
            self.sift_down(0);
        }
    }

    /// Remove the item wrapping `scheduled`, compared by identity
    pub fn remove(&mut self, scheduled: &Arc<ScheduledEvent>) -> Option<ScheduledItem> {
        let index = self.position(scheduled)?;
        self.remove_at(index)
    }

    pub fn contains(&self, scheduled: &Arc<ScheduledEvent>) -> bool {
        self.position(scheduled).is_some()
    }

    pub fn next_occurrence(&self) -> Option<DateTime<Utc>> {
        self.peek().map(|item| item.occurrence)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, scheduled: &Arc<ScheduledEvent>) -> Option<usize> {
        self.items
            .iter()
            .position(|item| Arc::ptr_eq(&item.scheduled, scheduled))
    }

    /// Move the last item into `index`, then sift it both ways
    fn remove_at(&mut self, index: usize) -> Option<ScheduledItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.swap_remove(index);
        if index < self.items.len() {
            let index = self.sift_up(index);
            self.sift_down(index);
        }
        Some(removed)
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[parent].occurrence <= self.items[index].occurrence {
                break;
            }
            self.items.swap(parent, index);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.items[left].occurrence < self.items[smallest].occurrence {
                smallest = left;
            }
            if right < len && self.items[right].occurrence < self.items[smallest].occurrence {
                smallest = right;
            }
            if smallest == index {
                return;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_valid(&self) -> bool {
        (1..self.items.len())
            .all(|i| self.items[(i - 1) / 2].occurrence <= self.items[i].occurrence)
    }
}

#[cfg(test)]
#[path = "heap_tests.rs"]
mod tests;
