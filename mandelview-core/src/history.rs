use std::collections::VecDeque;

use crate::view::View;

/// Default number of views kept for undo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Bounded undo stack of views.
///
/// When full, pushing drops the oldest entry so the most recent navigation
/// is always recoverable.
#[derive(Debug, Clone)]
pub struct ViewHistory {
    entries: VecDeque<View>,
    capacity: usize,
}

impl ViewHistory {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, view: View) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(view);
    }

    pub fn pop(&mut self) -> Option<View> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
