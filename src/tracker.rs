//! Edit tracking: journaled graph changes, ref-counted triple release and
//! rollback.
//!
//! A [`ChangeTracker`] attaches a journaling listener to a store for the
//! lifetime of one edit. Every effective insertion and deletion lands in the
//! journal, which is either reconciled into an [`EditRecord`] (net added and
//! removed triples) or replayed backwards to undo the edit.
//!
//! Deletions go through [`ChangeTracker::release`]: a triple is removed only
//! when no surviving owner in the [`RefCountTable`] still needs it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{Annotation, Axiom};
use crate::store::{GraphListener, ListenerGuard, StoreResult, TripleStore};
use crate::term::{Iri, Triple};

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// One requested change to an ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit {
    AddStatement(Axiom),
    RemoveStatement(Axiom),
    AddAnnotation(Annotation),
    RemoveAnnotation(Annotation),
    AddImport(Iri),
    RemoveImport(Iri),
    SetId {
        iri: Option<Iri>,
        version_iri: Option<Iri>,
    },
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddStatement(a) => write!(f, "add {a}"),
            Self::RemoveStatement(a) => write!(f, "remove {a}"),
            Self::AddAnnotation(a) => write!(f, "add ontology annotation {a}"),
            Self::RemoveAnnotation(a) => write!(f, "remove ontology annotation {a}"),
            Self::AddImport(iri) => write!(f, "add import {iri}"),
            Self::RemoveImport(iri) => write!(f, "remove import {iri}"),
            Self::SetId { iri, version_iri } => {
                f.write_str("set id to ")?;
                match iri {
                    Some(iri) => write!(f, "{iri}")?,
                    None => f.write_str("anonymous")?,
                }
                if let Some(v) = version_iri {
                    write!(f, " version {v}")?;
                }
                Ok(())
            }
        }
    }
}

/// Net effect of one applied edit on the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRecord {
    /// The edit that was applied.
    pub edit: Edit,
    /// Triples that were absent before and present after.
    pub added: Vec<Triple>,
    /// Triples that were present before and absent after.
    pub removed: Vec<Triple>,
    /// Triples the edit released but kept because another owner needs them.
    pub retained: Vec<Triple>,
}

impl EditRecord {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Lifecycle of a [`ChangeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Open,
    Reconciled,
    RolledBack,
}

// ---------------------------------------------------------------------------
// Reference counts
// ---------------------------------------------------------------------------

/// How many surviving owners need each triple.
#[derive(Debug, Clone, Default)]
pub struct RefCountTable {
    counts: BTreeMap<Triple, usize>,
}

impl RefCountTable {
    /// Count each owner's triple set once per owner.
    pub fn from_owners(owners: impl IntoIterator<Item = BTreeSet<Triple>>) -> Self {
        let mut counts = BTreeMap::new();
        for owned in owners {
            for triple in owned {
                *counts.entry(triple).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, triple: &Triple) -> usize {
        self.counts.get(triple).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Added(Triple),
    Removed(Triple),
}

#[derive(Default)]
struct Journal {
    changes: Mutex<Vec<Change>>,
}

impl Journal {
    fn push(&self, change: Change) {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner).push(change);
    }

    fn take(&self) -> Vec<Change> {
        std::mem::take(&mut *self.changes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl GraphListener for Journal {
    fn on_add(&self, triple: &Triple) {
        self.push(Change::Added(triple.clone()));
    }

    fn on_remove(&self, triple: &Triple) {
        self.push(Change::Removed(triple.clone()));
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Records the triples one edit touches.
pub struct ChangeTracker<'s> {
    store: &'s dyn TripleStore,
    edit: Edit,
    journal: Arc<Journal>,
    guard: Option<ListenerGuard<'s>>,
    retained: Vec<Triple>,
    state: TrackerState,
}

impl<'s> ChangeTracker<'s> {
    /// Start journaling changes to `store` on behalf of `edit`.
    pub fn open(store: &'s dyn TripleStore, edit: Edit) -> Self {
        let journal = Arc::new(Journal::default());
        let guard = store.listeners().attach(journal.clone());
        Self {
            store,
            edit,
            journal,
            guard: Some(guard),
            retained: Vec::new(),
            state: TrackerState::Open,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }

    /// Delete each candidate no surviving owner needs; keep the rest.
    pub fn release(&mut self, candidates: impl IntoIterator<Item = Triple>, owners: &RefCountTable) -> StoreResult<()> {
        for triple in candidates {
            if owners.count(&triple) == 0 {
                self.store.remove(&triple)?;
            } else if !self.retained.contains(&triple) {
                self.retained.push(triple);
            }
        }
        Ok(())
    }

    /// Undo every journaled change, newest first.
    pub fn abort(mut self) -> StoreResult<()> {
        self.guard = None;
        let changes = self.journal.take();
        warn!(edit = %self.edit, changes = changes.len(), "rolling back edit");
        for change in changes.into_iter().rev() {
            match change {
                Change::Added(t) => {
                    self.store.remove(&t)?;
                }
                Change::Removed(t) => {
                    self.store.add(t)?;
                }
            }
        }
        self.state = TrackerState::RolledBack;
        Ok(())
    }

    /// Close the journal and fold it into net additions and removals.
    pub fn reconcile(mut self) -> EditRecord {
        self.guard = None;
        self.state = TrackerState::Reconciled;
        let mut first_last: BTreeMap<Triple, (bool, bool)> = BTreeMap::new();
        let mut order = Vec::new();
        for change in self.journal.take() {
            let (triple, added) = match change {
                Change::Added(t) => (t, true),
                Change::Removed(t) => (t, false),
            };
            match first_last.get_mut(&triple) {
                Some(entry) => entry.1 = added,
                None => {
                    order.push(triple.clone());
                    first_last.insert(triple, (added, added));
                }
            }
        }
        let mut record = EditRecord {
            edit: self.edit.clone(),
            added: Vec::new(),
            removed: Vec::new(),
            retained: std::mem::take(&mut self.retained),
        };
        for triple in order {
            match first_last.get(&triple) {
                Some((true, true)) => record.added.push(triple),
                Some((false, false)) => record.removed.push(triple),
                _ => {}
            }
        }
        debug!(
            edit = %record.edit,
            added = record.added.len(),
            removed = record.removed.len(),
            retained = record.retained.len(),
            "edit reconciled"
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use crate::term::Node;

    fn triple(s: &str, o: &str) -> Triple {
        Triple::new(Node::iri(s), "http://ex/p", Node::iri(o))
    }

    fn edit() -> Edit {
        Edit::AddImport(Iri::new("http://ex/other"))
    }

    #[test]
    fn reconcile_reports_net_changes() {
        let store = MemStore::new();
        let kept = triple("http://a", "http://b");
        store.add(kept.clone()).unwrap();
        let tracker = ChangeTracker::open(&store, edit());
        let fresh = triple("http://a", "http://c");
        let transient = triple("http://a", "http://d");
        store.add(fresh.clone()).unwrap();
        store.add(transient.clone()).unwrap();
        store.remove(&transient).unwrap();
        store.remove(&kept).unwrap();
        let record = tracker.reconcile();
        assert_eq!(record.added, vec![fresh]);
        assert_eq!(record.removed, vec![kept]);
        assert!(store.listeners().is_empty());
    }

    #[test]
    fn abort_restores_the_graph() {
        let store = MemStore::new();
        let before = triple("http://a", "http://b");
        store.add(before.clone()).unwrap();
        let tracker = ChangeTracker::open(&store, edit());
        store.add(triple("http://x", "http://y")).unwrap();
        store.remove(&before).unwrap();
        tracker.abort().unwrap();
        assert_eq!(store.triples(), vec![before]);
    }

    #[test]
    fn release_keeps_shared_triples() {
        let store = MemStore::new();
        let shared = triple("http://a", "http://b");
        let own = triple("http://a", "http://c");
        store.add(shared.clone()).unwrap();
        store.add(own.clone()).unwrap();
        let owners = RefCountTable::from_owners([BTreeSet::from([shared.clone()])]);
        let mut tracker = ChangeTracker::open(&store, edit());
        tracker.release([shared.clone(), own.clone()], &owners).unwrap();
        let record = tracker.reconcile();
        assert_eq!(record.removed, vec![own]);
        assert_eq!(record.retained, vec![shared.clone()]);
        assert!(store.contains(&shared).unwrap());
    }

    #[test]
    fn ref_counts_add_up_across_owners() {
        let t = triple("http://a", "http://b");
        let owners = RefCountTable::from_owners([BTreeSet::from([t.clone()]), BTreeSet::from([t.clone()])]);
        assert_eq!(owners.count(&t), 2);
        assert_eq!(owners.count(&triple("http://x", "http://y")), 0);
    }
}
