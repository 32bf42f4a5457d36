//! Durable triple store backed by oxigraph.
//!
//! Triples live in the default graph of an oxigraph [`Store`], either in
//! memory or in a RocksDB directory that survives restarts.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use oxigraph::model::{self as ox, GraphName, GraphNameRef, Term};
use oxigraph::store::Store;

use crate::error::StoreError;
use crate::term::{BlankId, Iri, Literal, Node, Triple};

use super::{Listeners, StoreResult, TripleStore};

/// Persistent RDF store.
pub struct DurableStore {
    store: Store,
    next_blank: AtomicU64,
    listeners: Listeners,
}

fn backend(context: &'static str) -> impl Fn(oxigraph::store::StorageError) -> StoreError {
    move |e| StoreError::Backend {
        message: format!("{context}: {e}"),
    }
}

impl DurableStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(backend("failed to create oxigraph store"))?;
        Ok(Self::wrap(store))
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Backend {
            message: format!("failed to create store directory {}: {e}", path.display()),
        })?;
        let store = Store::open(path).map_err(|e| StoreError::Backend {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), "opened durable triple store");
        Ok(Self::wrap(store))
    }

    fn wrap(store: Store) -> Self {
        Self {
            store,
            next_blank: AtomicU64::new(0),
            listeners: Listeners::new(),
        }
    }

    /// Get internal store reference (for SPARQL and bulk loading).
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn to_quad(triple: &Triple) -> StoreResult<ox::Quad> {
        let predicate = ox::NamedNode::new_unchecked(triple.predicate.as_str());
        let object = to_term(&triple.object);
        match to_term(&triple.subject) {
            Term::NamedNode(s) => Ok(ox::Quad::new(s, predicate, object, GraphName::DefaultGraph)),
            Term::BlankNode(s) => Ok(ox::Quad::new(s, predicate, object, GraphName::DefaultGraph)),
            _ => Err(StoreError::LiteralSubject {
                literal: triple.subject.to_string(),
            }),
        }
    }

    fn from_quad(quad: ox::Quad) -> Option<Triple> {
        Some(Triple {
            subject: from_term(quad.subject.into())?,
            predicate: Iri::new(quad.predicate.as_str()),
            object: from_term(quad.object)?,
        })
    }
}

fn to_term(node: &Node) -> Term {
    match node {
        Node::Iri(iri) => ox::NamedNode::new_unchecked(iri.as_str()).into(),
        Node::Blank(id) => ox::BlankNode::new_unchecked(id.label()).into(),
        Node::Literal(lit) => match lit.language() {
            Some(lang) => ox::Literal::new_language_tagged_literal_unchecked(lit.lexical(), lang).into(),
            None => ox::Literal::new_typed_literal(
                lit.lexical(),
                ox::NamedNode::new_unchecked(lit.datatype().as_str()),
            )
            .into(),
        },
    }
}

fn from_term(term: Term) -> Option<Node> {
    #[allow(unreachable_patterns)]
    match term {
        Term::NamedNode(n) => Some(Node::Iri(Iri::new(n.as_str()))),
        Term::BlankNode(b) => Some(Node::Blank(BlankId::new(b.as_str()))),
        Term::Literal(l) => Some(Node::Literal(match l.language() {
            Some(lang) => Literal::lang(l.value(), lang),
            None => Literal::typed(l.value(), l.datatype().as_str()),
        })),
        // Quoted triples have no counterpart in the OWL mapping.
        _ => None,
    }
}

impl TripleStore for DurableStore {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StoreResult<Vec<Triple>> {
        let subject_term = subject.map(to_term);
        let subject_ref = match &subject_term {
            None => None,
            Some(Term::NamedNode(n)) => Some(n.as_ref().into()),
            Some(Term::BlankNode(b)) => Some(b.as_ref().into()),
            Some(_) => return Ok(Vec::new()),
        };
        let predicate_node = predicate.map(|p| ox::NamedNode::new_unchecked(p.as_str()));
        let object_term = object.map(to_term);

        let mut out = Vec::new();
        for quad in self.store.quads_for_pattern(
            subject_ref,
            predicate_node.as_ref().map(|p| p.as_ref()),
            object_term.as_ref().map(|o| o.as_ref()),
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad.map_err(backend("pattern lookup failed"))?;
            if let Some(triple) = Self::from_quad(quad) {
                out.push(triple);
            }
        }
        out.sort();
        Ok(out)
    }

    fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        let quad = Self::to_quad(triple)?;
        self.store
            .contains(&quad)
            .map_err(backend("contains check failed"))
    }

    fn add(&self, triple: Triple) -> StoreResult<bool> {
        let quad = Self::to_quad(&triple)?;
        let inserted = self.store.insert(&quad).map_err(backend("insert failed"))?;
        if inserted {
            self.listeners.notify_add(&triple);
        }
        Ok(inserted)
    }

    fn remove(&self, triple: &Triple) -> StoreResult<bool> {
        let quad = Self::to_quad(triple)?;
        let removed = self.store.remove(&quad).map_err(backend("remove failed"))?;
        if removed {
            self.listeners.notify_remove(triple);
        }
        Ok(removed)
    }

    fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(backend("count failed"))
    }

    fn fresh_blank(&self) -> StoreResult<BlankId> {
        loop {
            let n = self.next_blank.fetch_add(1, Ordering::Relaxed);
            let id = BlankId::new(format!("d{n}"));
            let node = Node::Blank(id.clone());
            if self.find(Some(&node), None, None)?.is_empty()
                && self.find(None, None, Some(&node))?.is_empty()
            {
                return Ok(id);
            }
        }
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;

    #[test]
    fn insert_and_find() {
        let store = DurableStore::in_memory().unwrap();
        let t = Triple::new(Node::iri("http://a"), "http://p", Literal::typed("5", xsd::INTEGER));
        assert!(store.add(t.clone()).unwrap());
        assert!(!store.add(t.clone()).unwrap());
        assert!(store.contains(&t).unwrap());

        let found = store
            .find(Some(&Node::iri("http://a")), None, None)
            .unwrap();
        assert_eq!(found, vec![t.clone()]);
        assert!(store.remove(&t).unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn language_literals_survive() {
        let store = DurableStore::in_memory().unwrap();
        let t = Triple::new(Node::blank("x"), "http://p", Literal::lang("hallo", "de"));
        store.add(t.clone()).unwrap();
        let found = store.find(None, Some(&Iri::new("http://p")), None).unwrap();
        assert_eq!(found, vec![t]);
    }

    #[test]
    fn literal_subject_rejected() {
        let store = DurableStore::in_memory().unwrap();
        let t = Triple::new(Literal::string("x"), "http://p", Node::iri("http://b"));
        assert!(store.add(t).is_err());
    }
}
