//! Lifetime holders.
//!
//! A holder keeps one target callable reachable while an origin-side storage
//! location refers to it, the same role a JNI global reference plays. The
//! table is keyed by slab token; a [`Holder`] releases its entry when dropped,
//! so every acquire is paired with exactly one release.

use parking_lot::Mutex;
use slab::Slab;
use std::sync::Arc;

use crate::value::ObjectRef;

#[derive(Debug)]
struct HolderEntry {
    object: ObjectRef,
    owner: String,
}

/// Shared table of live holders.
#[derive(Debug, Clone, Default)]
pub struct HolderTable {
    entries: Arc<Mutex<Slab<HolderEntry>>>,
}

impl HolderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `object` on behalf of the storage location `owner`.
    pub fn acquire(&self, object: ObjectRef, owner: &str) -> Holder {
        let token = self.entries.lock().insert(HolderEntry {
            object,
            owner: owner.to_string(),
        });
        log::debug!("Acquired holder #{} for {} ({})", token, object, owner);
        Holder {
            table: self.clone(),
            token,
            object,
        }
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_live(&self, token: usize) -> bool {
        self.entries.lock().contains(token)
    }

    /// Objects currently pinned, in token order.
    pub fn live_objects(&self) -> Vec<ObjectRef> {
        self.entries.lock().iter().map(|(_, entry)| entry.object).collect()
    }

    /// Owners of the live holders, in token order.
    pub fn owners(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(_, entry)| entry.owner.clone())
            .collect()
    }

    fn release(&self, token: usize) {
        match self.entries.lock().try_remove(token) {
            Some(entry) => {
                log::debug!("Released holder #{} for {} ({})", token, entry.object, entry.owner)
            }
            None => log::warn!("Holder #{} released twice", token),
        }
    }
}

/// One acquired holder. Dropping it releases the table entry.
#[derive(Debug)]
pub struct Holder {
    table: HolderTable,
    token: usize,
    object: ObjectRef,
}

impl Holder {
    pub fn token(&self) -> usize {
        self.token
    }

    pub fn object(&self) -> ObjectRef {
        self.object
    }
}

impl Drop for Holder {
    fn drop(&mut self) {
        self.table.release(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_pairs() {
        let table = HolderTable::new();
        let a = table.acquire(ObjectRef(1), "M.a");
        let b = table.acquire(ObjectRef(2), "M.b");
        assert_eq!(table.live_count(), 2);
        assert_eq!(table.live_objects(), vec![ObjectRef(1), ObjectRef(2)]);

        let token = a.token();
        drop(a);
        assert!(!table.is_live(token));
        assert_eq!(table.owners(), vec!["M.b".to_string()]);

        drop(b);
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn test_tokens_are_reused_after_release() {
        let table = HolderTable::new();
        let first = table.acquire(ObjectRef(1), "M.a");
        let token = first.token();
        drop(first);
        let second = table.acquire(ObjectRef(9), "M.a");
        assert_eq!(second.token(), token);
        assert_eq!(second.object(), ObjectRef(9));
    }
}
