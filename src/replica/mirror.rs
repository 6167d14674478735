//! The replica's local copy of the principal's records.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::store::Record;

/// Snapshot of the mirror handed out to readers.
pub type Snapshot = Arc<Vec<Record>>;

/// Local mirror of the principal's record set.
///
/// The mirror is never patched in place. Each successful sync swaps in a new
/// `Arc<Vec<Record>>` under the lock, and readers clone the current `Arc` and release
/// the lock straight away, so a reader holds either the whole old set or the whole new
/// one.
pub struct Mirror {
    current: Mutex<Snapshot>,
}

impl Mirror {
    /// Creates an empty mirror.
    pub fn new() -> Self {
        Mirror {
            current: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Returns the current contents.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&*self.current.lock())
    }

    /// Replaces the whole mirror and returns the new snapshot.
    pub fn replace(&self, records: Vec<Record>) -> Snapshot {
        let next = Arc::new(records);
        *self.current.lock() = Arc::clone(&next);
        next
    }

    pub fn len(&self) -> usize {
        self.current.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}
