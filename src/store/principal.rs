//! The authoritative in-memory user store.
//!
//! The record collection, the id allocator and the dirty flag live behind a single
//! exclusive lock, so a flag reset is never observed out of step with the records it
//! describes.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::StoreError;
use crate::store::record::{Record, RecordId, RecordInput};

struct Inner {
    records: BTreeMap<RecordId, Record>,
    next_id: RecordId,
    dirty: bool,
}

/// The principal's record collection plus its "changed since last check" flag.
///
/// Every successful mutation sets the dirty flag. [`check_and_reset`] reads and clears
/// it in one step.
///
/// # Flag hazard
///
/// `check_and_reset` consumes the signal. A caller that sees `true` and never fetches
/// the records has lost that change notification for every other caller too. A manual
/// check can therefore mask a pending automatic sync; use [`peek`] for diagnostics.
///
/// [`check_and_reset`]: PrincipalStore::check_and_reset
/// [`peek`]: PrincipalStore::peek
pub struct PrincipalStore {
    inner: Mutex<Inner>,
}

impl PrincipalStore {
    /// Creates an empty store. The first record gets id 1 and the flag starts clear.
    pub fn new() -> Self {
        PrincipalStore {
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
                dirty: false,
            }),
        }
    }

    /// Returns every record, ordered by id.
    pub fn list(&self) -> Vec<Record> {
        self.inner.lock().records.values().cloned().collect()
    }

    /// Stores a new record under a freshly allocated id.
    pub fn create(&self, input: RecordInput) -> Record {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let record = Record::from_input(id, input);
        inner.records.insert(id, record.clone());
        inner.dirty = true;

        debug!(id, "Created user");
        record
    }

    /// Replaces name and username of an existing record.
    pub fn update(&self, id: RecordId, input: RecordInput) -> Result<Record, StoreError> {
        let mut inner = self.inner.lock();
        let Some(record) = inner.records.get_mut(&id) else {
            return Err(StoreError::NotFound(id));
        };

        record.name = input.name;
        record.username = input.username;
        let updated = record.clone();
        inner.dirty = true;

        debug!(id, "Updated user");
        Ok(updated)
    }

    /// Removes a record. Its id is never handed out again.
    pub fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.records.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        inner.dirty = true;

        debug!(id, "Deleted user");
        Ok(())
    }

    /// Returns the dirty flag and clears it, atomically.
    pub fn check_and_reset(&self) -> bool {
        let mut inner = self.inner.lock();
        std::mem::replace(&mut inner.dirty, false)
    }

    /// Returns the dirty flag without clearing it.
    pub fn peek(&self) -> bool {
        self.inner.lock().dirty
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PrincipalStore {
    fn default() -> Self {
        Self::new()
    }
}
