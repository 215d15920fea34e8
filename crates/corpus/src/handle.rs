//! Shared handle to the current corpus snapshot.
//!
//! Requests call [`CorpusHandle::snapshot`] once and work against that
//! `Arc<CorpusIndex>` until they finish. A rebuild installs a new index with
//! [`CorpusHandle::swap`]; requests already in flight keep their old snapshot.

use crate::index::CorpusIndex;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Atomically swappable pointer to an immutable [`CorpusIndex`].
#[derive(Debug, Default)]
pub struct CorpusHandle {
    current: RwLock<Arc<CorpusIndex>>,
}

impl CorpusHandle {
    pub fn new(index: CorpusIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index as of now. Cheap: clones an `Arc` under a short read lock.
    pub fn snapshot(&self) -> Arc<CorpusIndex> {
        // The lock only guards a pointer assignment, so a poisoned lock still
        // holds a consistent value.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Install a new index and return the previous one.
    pub fn swap(&self, index: CorpusIndex) -> Arc<CorpusIndex> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        info!(
            previous = guard.len(),
            next = next.len(),
            "Corpus snapshot swapped"
        );
        std::mem::replace(&mut *guard, next)
    }
}
