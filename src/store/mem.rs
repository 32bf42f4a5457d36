//! In-memory triple store with subject, predicate and object indexes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StoreError;
use crate::term::{BlankId, Iri, Node, Triple};

use super::{Listeners, StoreResult, TripleStore, check_subject};

#[derive(Default)]
struct Indexes {
    triples: BTreeSet<Triple>,
    by_subject: BTreeMap<Node, BTreeSet<Triple>>,
    by_predicate: BTreeMap<Iri, BTreeSet<Triple>>,
    by_object: BTreeMap<Node, BTreeSet<Triple>>,
}

impl Indexes {
    fn insert(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple);
        true
    }

    fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        prune(&mut self.by_subject, &triple.subject, triple);
        prune(&mut self.by_predicate, &triple.predicate, triple);
        prune(&mut self.by_object, &triple.object, triple);
        true
    }

    fn mentions(&self, node: &Node) -> bool {
        self.by_subject.contains_key(node) || self.by_object.contains_key(node)
    }
}

fn prune<K: Ord>(index: &mut BTreeMap<K, BTreeSet<Triple>>, key: &K, triple: &Triple) {
    if let Some(set) = index.get_mut(key) {
        set.remove(triple);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

/// Thread-safe in-memory graph.
///
/// Iteration order is the total order of [`Triple`], so reads are
/// deterministic for an unchanged graph.
pub struct MemStore {
    indexes: RwLock<Indexes>,
    next_blank: AtomicU64,
    listeners: Listeners,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(Indexes::default()),
            next_blank: AtomicU64::new(0),
            listeners: Listeners::new(),
        }
    }

    /// Build a store holding `triples`. No listeners are notified.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> StoreResult<Self> {
        let store = Self::new();
        {
            let mut idx = store.write_indexes()?;
            for triple in triples {
                check_subject(&triple)?;
                idx.insert(triple);
            }
        }
        Ok(store)
    }

    /// Snapshot of every triple, in order.
    pub fn triples(&self) -> Vec<Triple> {
        let idx = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        idx.triples.iter().cloned().collect()
    }
}

impl MemStore {
    fn read_indexes(&self) -> StoreResult<RwLockReadGuard<'_, Indexes>> {
        self.indexes.read().map_err(|_| poisoned())
    }

    fn write_indexes(&self) -> StoreResult<RwLockWriteGuard<'_, Indexes>> {
        self.indexes.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Poisoned {
        what: "memory store index".into(),
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleStore for MemStore {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StoreResult<Vec<Triple>> {
        let idx = self.read_indexes()?;
        let matches = |t: &&Triple| {
            subject.is_none_or(|s| &t.subject == s)
                && predicate.is_none_or(|p| &t.predicate == p)
                && object.is_none_or(|o| &t.object == o)
        };

        // Start from the most selective index available.
        let found = if let Some(s) = subject {
            idx.by_subject
                .get(s)
                .map(|set| set.iter().filter(matches).cloned().collect())
        } else if let Some(o) = object {
            idx.by_object
                .get(o)
                .map(|set| set.iter().filter(matches).cloned().collect())
        } else if let Some(p) = predicate {
            idx.by_predicate.get(p).map(|set| set.iter().cloned().collect())
        } else {
            Some(idx.triples.iter().cloned().collect())
        };
        Ok(found.unwrap_or_default())
    }

    fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        let idx = self.read_indexes()?;
        Ok(idx.triples.contains(triple))
    }

    fn add(&self, triple: Triple) -> StoreResult<bool> {
        check_subject(&triple)?;
        let inserted = {
            let mut idx = self.write_indexes()?;
            idx.insert(triple.clone())
        };
        if inserted {
            self.listeners.notify_add(&triple);
        }
        Ok(inserted)
    }

    fn remove(&self, triple: &Triple) -> StoreResult<bool> {
        let removed = {
            let mut idx = self.write_indexes()?;
            idx.remove(triple)
        };
        if removed {
            self.listeners.notify_remove(triple);
        }
        Ok(removed)
    }

    fn len(&self) -> StoreResult<usize> {
        let idx = self.read_indexes()?;
        Ok(idx.triples.len())
    }

    fn fresh_blank(&self) -> StoreResult<BlankId> {
        let idx = self.read_indexes()?;
        loop {
            let n = self.next_blank.fetch_add(1, Ordering::Relaxed);
            let id = BlankId::new(format!("b{n}"));
            if !idx.mentions(&Node::Blank(id.clone())) {
                return Ok(id);
            }
        }
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

impl std::fmt::Debug for MemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.len().unwrap_or(0);
        f.debug_struct("MemStore").field("triples", &len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Node::iri(s), p, Node::iri(o))
    }

    #[test]
    fn add_find_remove() {
        let store = MemStore::new();
        store.add(t("http://a", "http://p", "http://b")).unwrap();
        store.add(t("http://a", "http://q", "http://c")).unwrap();
        store.add(t("http://d", "http://p", "http://b")).unwrap();

        let by_subject = store.find(Some(&Node::iri("http://a")), None, None).unwrap();
        assert_eq!(by_subject.len(), 2);

        let by_object = store
            .find(None, Some(&Iri::new("http://p")), Some(&Node::iri("http://b")))
            .unwrap();
        assert_eq!(by_object.len(), 2);

        assert!(store.remove(&t("http://a", "http://p", "http://b")).unwrap());
        assert_eq!(store.len().unwrap(), 2);
        assert!(store.find(None, Some(&Iri::new("http://p")), Some(&Node::iri("http://c"))).unwrap().is_empty());
    }

    #[test]
    fn literal_subjects_are_rejected() {
        let store = MemStore::new();
        let bad = Triple::new(Literal::string("x"), "http://p", Node::iri("http://b"));
        assert!(store.add(bad).is_err());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn fresh_blanks_skip_existing_labels() {
        let store = MemStore::new();
        store
            .add(Triple::new(Node::blank("b0"), "http://p", Node::blank("b1")))
            .unwrap();
        let fresh = store.fresh_blank().unwrap();
        assert_ne!(fresh.label(), "b0");
        assert_ne!(fresh.label(), "b1");
        assert_ne!(store.fresh_blank().unwrap(), fresh);
    }

    #[test]
    fn from_triples_is_deterministic() {
        let a = t("http://b", "http://p", "http://c");
        let b = t("http://a", "http://p", "http://c");
        let store = MemStore::from_triples([a.clone(), b.clone()]).unwrap();
        assert_eq!(store.triples(), vec![b, a]);
    }

    #[test]
    fn concurrent_access() {
        use std::sync::Arc;
        let store = Arc::new(MemStore::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .add(t(&format!("http://s/{i}"), "http://p", "http://o"))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 64);
    }
}
