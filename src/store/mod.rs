//! Entry store
//!
//! Entries and users live in one in-memory snapshot guarded by an async
//! `RwLock`. Reads share the lock. Writes go through a [`Transaction`],
//! which holds the write guard until it commits or is dropped, so every
//! atomic unit sees a stable view and units never interleave.
//!
//! When opened with a path the snapshot is mirrored to a JSON document,
//! rewritten atomically on each commit.

mod file;
mod hash;
mod transaction;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::Result;
use crate::model::{Entry, Language, ObjectId, User};

use file::Document;
use hash::term_key;

pub use transaction::Transaction;

/// Conjunction of optional field constraints.
///
/// An empty filter matches nothing; `find` short-circuits on it.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub id: Option<ObjectId>,
    pub index: Option<String>,
    pub index_pattern: Option<Regex>,
    pub language: Option<Language>,
    pub mirror: Option<String>,
    pub mirror_language: Option<Language>,
    pub definition_node: Option<ObjectId>,
}

impl Filter {
    pub fn by_id(id: ObjectId) -> Self {
        Filter {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_node(node: ObjectId) -> Self {
        Filter {
            definition_node: Some(node),
            ..Default::default()
        }
    }

    pub fn term(index: impl Into<String>, language: Language) -> Self {
        Filter {
            index: Some(index.into()),
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn matching(pattern: Regex) -> Self {
        Filter {
            index_pattern: Some(pattern),
            ..Default::default()
        }
    }

    pub fn with_mirror(mut self, mirror: impl Into<String>, language: Language) -> Self {
        self.mirror = Some(mirror.into());
        self.mirror_language = Some(language);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.index.is_none()
            && self.index_pattern.is_none()
            && self.language.is_none()
            && self.mirror.is_none()
            && self.mirror_language.is_none()
            && self.definition_node.is_none()
    }

    pub fn matches(&self, e: &Entry) -> bool {
        self.id.as_ref().map_or(true, |v| &e.id == v)
            && self.index.as_ref().map_or(true, |v| &e.index == v)
            && self.index_pattern.as_ref().map_or(true, |re| re.is_match(&e.index))
            && self.language.map_or(true, |v| e.language == v)
            && self.mirror.as_ref().map_or(true, |v| &e.mirror == v)
            && self.mirror_language.map_or(true, |v| e.mirror_language == v)
            && self.definition_node.as_ref().map_or(true, |v| &e.definition_node == v)
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Snapshot {
    entries: BTreeMap<ObjectId, Entry>,
    users: BTreeMap<ObjectId, User>,
    by_term: HashMap<String, BTreeSet<ObjectId>>,
}

impl Snapshot {
    fn from_document(doc: Document) -> Self {
        let mut snap = Snapshot::default();
        for e in doc.entries {
            snap.insert_entry(e);
        }
        for u in doc.users {
            snap.users.insert(u.id.clone(), u);
        }
        snap
    }

    fn to_document(&self) -> Document {
        Document {
            entries: self.entries.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
        }
    }

    fn insert_entry(&mut self, e: Entry) {
        self.by_term
            .entry(term_key(&e.index, e.language))
            .or_default()
            .insert(e.id.clone());
        self.entries.insert(e.id.clone(), e);
    }

    fn remove_entry(&mut self, id: &ObjectId) -> Option<Entry> {
        let e = self.entries.remove(id)?;
        let key = term_key(&e.index, e.language);
        if let Some(ids) = self.by_term.get_mut(&key) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_term.remove(&key);
            }
        }
        Some(e)
    }

    /// Entries worth testing against `filter`, narrowed by id or term index.
    fn candidates<'a>(&'a self, filter: &Filter) -> Box<dyn Iterator<Item = &'a Entry> + 'a> {
        if let Some(id) = &filter.id {
            return Box::new(self.entries.get(id).into_iter());
        }

        if let (Some(index), Some(language)) = (&filter.index, filter.language) {
            let ids = self.by_term.get(&term_key(index, language));
            return Box::new(
                ids.into_iter()
                    .flatten()
                    .filter_map(move |id| self.entries.get(id)),
            );
        }

        Box::new(self.entries.values())
    }

    fn find(&self, filter: &Filter) -> Vec<Entry> {
        self.candidates(filter)
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
struct Counters {
    reads: AtomicU64,
    commits: AtomicU64,
    aborts: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub entries: usize,
    pub users: usize,
    pub reads: u64,
    pub commits: u64,
    pub aborts: u64,
}

#[derive(Debug)]
pub struct Store {
    snapshot: RwLock<Snapshot>,
    path: Option<PathBuf>,
    counters: Counters,
}

impl Store {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Store {
            snapshot: RwLock::new(Snapshot::default()),
            path: None,
            counters: Counters::default(),
        }
    }

    /// Loads the document at `path`, or starts empty if it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = file::load(&path).await?;

        Ok(Store {
            snapshot: RwLock::new(Snapshot::from_document(doc)),
            path: Some(path),
            counters: Counters::default(),
        })
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<Entry>> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }

        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        let found = self.snapshot.read().await.find(filter);
        trace!(?filter, found = found.len(), "find");
        Ok(found)
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Entry>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn find_user(&self, id: &ObjectId) -> Result<Option<User>> {
        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.snapshot.read().await.users.get(id).cloned())
    }

    /// Opens an atomic unit. Waits for any other open unit to finish.
    pub async fn begin(&self) -> Transaction<'_> {
        Transaction::new(self, self.snapshot.write().await)
    }

    pub async fn stats(&self) -> StoreStats {
        let snap = self.snapshot.read().await;
        StoreStats {
            entries: snap.entries.len(),
            users: snap.users.len(),
            reads: self.counters.reads.load(Ordering::Relaxed),
            commits: self.counters.commits.load(Ordering::Relaxed),
            aborts: self.counters.aborts.load(Ordering::Relaxed),
        }
    }

    async fn persist(&self, snap: &Snapshot) -> Result<()> {
        match &self.path {
            Some(path) => file::save(path, snap.to_document()).await,
            None => Ok(()),
        }
    }
}
