use std::collections::BTreeSet;
use std::sync::atomic::Ordering;

use chrono::Utc;
use tokio::sync::RwLockWriteGuard;
use tracing::{debug, warn};

use super::{Filter, Snapshot, Store};
use crate::error::{DictError, Result};
use crate::model::{Entry, EntryDraft, ObjectId, User};

/// An atomic unit of work against the [`Store`].
///
/// Holds the store's write lock from `begin` until `commit`, `abort` or
/// drop. Writes are staged and only become visible on a successful commit;
/// any other exit discards them.
pub struct Transaction<'a> {
    store: &'a Store,
    committed: RwLockWriteGuard<'a, Snapshot>,
    inserted: Vec<Entry>,
    removed: BTreeSet<ObjectId>,
    users: Vec<User>,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(super) fn new(store: &'a Store, committed: RwLockWriteGuard<'a, Snapshot>) -> Self {
        debug!("transaction started");
        Transaction {
            store,
            committed,
            inserted: Vec::new(),
            removed: BTreeSet::new(),
            users: Vec::new(),
            finished: false,
        }
    }

    /// Committed entries plus this unit's staged writes.
    pub fn find(&self, filter: &Filter) -> Vec<Entry> {
        if filter.is_empty() {
            return Vec::new();
        }

        self.store.counters.reads.fetch_add(1, Ordering::Relaxed);

        let mut found: Vec<Entry> = self
            .committed
            .find(filter)
            .into_iter()
            .filter(|e| !self.removed.contains(&e.id))
            .collect();
        found.extend(self.inserted.iter().filter(|e| filter.matches(e)).cloned());
        found
    }

    pub fn find_one(&self, filter: &Filter) -> Option<Entry> {
        self.find(filter).into_iter().next()
    }

    pub fn find_user(&self, id: &ObjectId) -> Option<User> {
        self.store.counters.reads.fetch_add(1, Ordering::Relaxed);
        self.users
            .iter()
            .find(|u| &u.id == id)
            .or_else(|| self.committed.users.get(id))
            .cloned()
    }

    /// Validates every draft, then stages them all. If any draft is
    /// rejected nothing is staged.
    pub fn insert_many(&mut self, drafts: Vec<EntryDraft>) -> Result<Vec<Entry>> {
        let now = Utc::now();
        let mut accepted = Vec::with_capacity(drafts.len());
        let mut rejected = Vec::new();

        for draft in drafts {
            match draft.validate(now) {
                Ok(e) => accepted.push(e),
                Err(fields) => rejected.extend(fields),
            }
        }

        if !rejected.is_empty() {
            return Err(DictError::StorageValidation(rejected));
        }

        self.inserted.extend(accepted.iter().cloned());
        Ok(accepted)
    }

    /// Stages removal of every entry in `node`. Returns how many go.
    pub fn delete_by_definition_node(&mut self, node: &ObjectId) -> usize {
        let filter = Filter::by_node(node.clone());

        let before = self.inserted.len();
        self.inserted.retain(|e| &e.definition_node != node);
        let mut count = before - self.inserted.len();

        for e in self.committed.find(&filter) {
            if self.removed.insert(e.id) {
                count += 1;
            }
        }

        count
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }

    pub fn is_dirty(&self) -> bool {
        !self.inserted.is_empty() || !self.removed.is_empty() || !self.users.is_empty()
    }

    /// Persists and publishes the staged writes. On failure the committed
    /// state is left exactly as it was and the unit is rolled back.
    pub async fn commit(mut self) -> Result<()> {
        if !self.is_dirty() {
            self.finished = true;
            debug!("transaction committed (no changes)");
            return Ok(());
        }

        let mut next = (*self.committed).clone();
        for id in &self.removed {
            next.remove_entry(id);
        }
        for e in self.inserted.drain(..) {
            next.insert_entry(e);
        }
        for u in self.users.drain(..) {
            next.users.insert(u.id.clone(), u);
        }

        self.store.persist(&next).await?;

        *self.committed = next;
        self.finished = true;
        self.store.counters.commits.fetch_add(1, Ordering::Relaxed);
        debug!(removed = self.removed.len(), "transaction committed");
        Ok(())
    }

    pub fn abort(mut self) {
        self.rollback("aborted");
    }

    fn rollback(&mut self, how: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.inserted.clear();
        self.removed.clear();
        self.users.clear();
        self.store.counters.aborts.fetch_add(1, Ordering::Relaxed);
        debug!(how, "transaction rolled back");
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if self.is_dirty() {
                warn!("transaction dropped with staged writes");
            }
            self.rollback("dropped");
        }
    }
}
