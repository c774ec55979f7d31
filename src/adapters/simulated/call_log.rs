use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Most recent calls kept by a simulated collaborator.
pub const CALL_LOG_CAPACITY: usize = 256;

/// Bounded record of calls; the oldest entry is dropped once full.
#[derive(Debug)]
pub(super) struct CallLog<T> {
    entries: Mutex<VecDeque<T>>,
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T: Clone> CallLog<T> {
    pub(super) fn record(&self, entry: T) {
        let mut entries = self.locked();
        if entries.len() == CALL_LOG_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub(super) fn snapshot(&self) -> Vec<T> {
        self.locked().iter().cloned().collect()
    }

    pub(super) fn len(&self) -> usize {
        self.locked().len()
    }

    fn locked(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
