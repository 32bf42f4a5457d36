//! Triple store facade.
//!
//! Two backends implement [`TripleStore`]:
//!
//! - [`MemStore`](mem::MemStore): indexed in-memory store with deterministic ordering
//! - [`DurableStore`](durable::DurableStore): oxigraph-backed store, in memory or on disk
//!
//! Both report every effective insertion and deletion to attached
//! [`GraphListener`]s, which is how edits are tracked.

pub mod durable;
pub mod mem;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::error::StoreError;
use crate::term::{BlankId, Iri, Node, Triple};

pub use durable::DurableStore;
pub use mem::MemStore;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A mutable RDF graph.
///
/// `add` and `remove` return whether the graph actually changed; listeners
/// are only notified for effective changes.
pub trait TripleStore: Send + Sync {
    /// All triples matching the pattern, where `None` is a wildcard.
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StoreResult<Vec<Triple>>;

    fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        Ok(!self
            .find(Some(&triple.subject), Some(&triple.predicate), Some(&triple.object))?
            .is_empty())
    }

    /// Insert a triple. Returns `true` if it was not already present.
    fn add(&self, triple: Triple) -> StoreResult<bool>;

    /// Delete a triple. Returns `true` if it was present.
    fn remove(&self, triple: &Triple) -> StoreResult<bool>;

    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// A blank node label not mentioned anywhere in the graph.
    fn fresh_blank(&self) -> StoreResult<BlankId>;

    fn listeners(&self) -> &Listeners;

    /// Objects of all `subject predicate ?o` triples.
    fn objects(&self, subject: &Node, predicate: &str) -> StoreResult<Vec<Node>> {
        Ok(self
            .find(Some(subject), Some(&Iri::new(predicate)), None)?
            .into_iter()
            .map(|t| t.object)
            .collect())
    }

    /// Subjects of all `?s predicate object` triples.
    fn subjects(&self, predicate: &str, object: &Node) -> StoreResult<Vec<Node>> {
        Ok(self
            .find(None, Some(&Iri::new(predicate)), Some(object))?
            .into_iter()
            .map(|t| t.subject)
            .collect())
    }
}

/// Receives effective graph mutations.
pub trait GraphListener: Send + Sync {
    fn on_add(&self, triple: &Triple);
    fn on_remove(&self, triple: &Triple);
}

/// Identifier of an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry embedded in every store.
pub struct Listeners {
    attached: DashMap<ListenerId, Arc<dyn GraphListener>>,
    next_id: AtomicU64,
}

impl Listeners {
    pub fn new() -> Self {
        Self {
            attached: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Attach a listener. It stays attached until the returned guard drops.
    pub fn attach(&self, listener: Arc<dyn GraphListener>) -> ListenerGuard<'_> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.attached.insert(id, listener);
        ListenerGuard { listeners: self, id }
    }

    fn detach(&self, id: ListenerId) {
        self.attached.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub(crate) fn notify_add(&self, triple: &Triple) {
        for listener in self.snapshot() {
            listener.on_add(triple);
        }
    }

    pub(crate) fn notify_remove(&self, triple: &Triple) {
        for listener in self.snapshot() {
            listener.on_remove(triple);
        }
    }

    // Listeners run outside the map's shard locks.
    fn snapshot(&self) -> Vec<Arc<dyn GraphListener>> {
        self.attached.iter().map(|e| Arc::clone(e.value())).collect()
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("attached", &self.attached.len())
            .finish()
    }
}

/// Detaches its listener when dropped, on every exit path.
#[must_use = "the listener detaches as soon as the guard is dropped"]
pub struct ListenerGuard<'a> {
    listeners: &'a Listeners,
    id: ListenerId,
}

impl ListenerGuard<'_> {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard<'_> {
    fn drop(&mut self) {
        self.listeners.detach(self.id);
    }
}

/// Reject triples whose subject is a literal.
pub(crate) fn check_subject(triple: &Triple) -> StoreResult<()> {
    match &triple.subject {
        Node::Literal(lit) => Err(StoreError::LiteralSubject {
            literal: lit.to_string(),
        }),
        _ => Ok(()),
    }
}
