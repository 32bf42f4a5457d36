//! Logical values paired with the graph triples that ground them.
//!
//! A [`Grounded<T>`] couples an immutable value with a [`TripleSet`]: the
//! triples whose presence makes the value readable from the graph. Triple
//! sets are composition trees evaluated on iteration, so `append`, `add` and
//! `delete` are cheap and never touch the store. Equality and hashing look
//! at the value only.
//!
//! Decomposition into operand and annotation components is cached in a
//! compute-once [`ContentCache`] that can be invalidated and re-derived.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::model::{Annotation, Axiom, Operand};
use crate::term::Triple;

// ---------------------------------------------------------------------------
// Triple sets
// ---------------------------------------------------------------------------

/// Closure producing triples on demand.
pub type DeferredTriples = Arc<dyn Fn() -> Vec<Triple> + Send + Sync>;

enum Source {
    Empty,
    One(Triple),
    Many(Vec<Triple>),
    Concat(TripleSet, TripleSet),
    Without(TripleSet, Triple),
    Deferred(DeferredTriples),
}

/// Immutable, lazily evaluated sequence of triples.
///
/// Iteration may yield duplicates; use [`TripleSet::to_set`] when uniqueness
/// matters.
#[derive(Clone)]
pub struct TripleSet(Arc<Source>);

impl TripleSet {
    pub fn empty() -> Self {
        Self(Arc::new(Source::Empty))
    }

    pub fn one(triple: Triple) -> Self {
        Self(Arc::new(Source::One(triple)))
    }

    pub fn many(triples: Vec<Triple>) -> Self {
        if triples.is_empty() {
            Self::empty()
        } else {
            Self(Arc::new(Source::Many(triples)))
        }
    }

    /// Triples computed by `f` each time the set is iterated.
    pub fn deferred(f: impl Fn() -> Vec<Triple> + Send + Sync + 'static) -> Self {
        Self(Arc::new(Source::Deferred(Arc::new(f))))
    }

    /// Returns `true` only for sets known to be empty without evaluation.
    pub fn is_definitely_empty(&self) -> bool {
        matches!(*self.0, Source::Empty)
    }

    /// Concatenation; a definitely-empty side is skipped.
    pub fn append(&self, other: &TripleSet) -> TripleSet {
        if other.is_definitely_empty() {
            return self.clone();
        }
        if self.is_definitely_empty() {
            return other.clone();
        }
        Self(Arc::new(Source::Concat(self.clone(), other.clone())))
    }

    pub fn with(&self, triple: Triple) -> TripleSet {
        self.append(&Self::one(triple))
    }

    pub fn without(&self, triple: &Triple) -> TripleSet {
        if self.is_definitely_empty() {
            return self.clone();
        }
        Self(Arc::new(Source::Without(self.clone(), triple.clone())))
    }

    /// Evaluate the tree, in composition order.
    pub fn collect(&self) -> Vec<Triple> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(set) = stack.pop() {
            match &*set.0 {
                Source::Empty => {}
                Source::One(t) => out.push(t.clone()),
                Source::Many(ts) => out.extend(ts.iter().cloned()),
                Source::Concat(a, b) => {
                    stack.push(b);
                    stack.push(a);
                }
                Source::Without(inner, t) => {
                    out.extend(inner.collect().into_iter().filter(|x| x != t));
                }
                Source::Deferred(f) => out.extend(f()),
            }
        }
        out
    }

    pub fn iter(&self) -> std::vec::IntoIter<Triple> {
        self.collect().into_iter()
    }

    pub fn to_set(&self) -> BTreeSet<Triple> {
        self.collect().into_iter().collect()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.collect().contains(triple)
    }

    pub fn ptr_eq(&self, other: &TripleSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for TripleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::many(iter.into_iter().collect())
    }
}

impl fmt::Debug for TripleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_definitely_empty() {
            return f.write_str("TripleSet(empty)");
        }
        f.debug_set().entries(self.collect()).finish()
    }
}

// ---------------------------------------------------------------------------
// Components and content cache
// ---------------------------------------------------------------------------

/// One grounded part of a decomposed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Operand(Grounded<Operand>),
    Annotation(Grounded<Annotation>),
}

/// Values that break down into components.
pub trait Decompose {
    /// Components derived from the value alone, with no grounding.
    fn decompose(&self) -> Vec<Component>;
}

impl Decompose for Axiom {
    fn decompose(&self) -> Vec<Component> {
        self.operands()
            .iter()
            .map(|o| Component::Operand(Grounded::new(o.clone())))
            .chain(
                self.annotations()
                    .iter()
                    .map(|a| Component::Annotation(Grounded::new(a.clone()))),
            )
            .collect()
    }
}

impl Decompose for Operand {
    fn decompose(&self) -> Vec<Component> {
        self.parts()
            .into_iter()
            .map(|o| Component::Operand(Grounded::new(o)))
            .collect()
    }
}

impl Decompose for Annotation {
    fn decompose(&self) -> Vec<Component> {
        self.annotations()
            .iter()
            .map(|a| Component::Annotation(Grounded::new(a.clone())))
            .collect()
    }
}

/// Re-derives components, usually by re-reading the graph.
pub type ContentLoader = Arc<dyn Fn() -> Vec<Component> + Send + Sync>;

/// Compute-once cell for a value's components.
///
/// Clones share the cell until one of them is cleared.
#[derive(Clone, Default)]
pub struct ContentCache {
    cell: Arc<OnceLock<Arc<[Component]>>>,
    loader: Option<ContentLoader>,
}

impl ContentCache {
    fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn get_or_init(&self, fallback: impl FnOnce() -> Vec<Component>) -> Arc<[Component]> {
        Arc::clone(self.cell.get_or_init(|| match &self.loader {
            Some(load) => load().into(),
            None => fallback().into(),
        }))
    }

    fn clear(&mut self) {
        self.cell = Arc::new(OnceLock::new());
    }
}

// ---------------------------------------------------------------------------
// Grounded values
// ---------------------------------------------------------------------------

/// A value together with the triples that ground it.
pub struct Grounded<T> {
    value: Arc<T>,
    triples: TripleSet,
    content: ContentCache,
}

impl<T> Clone for Grounded<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            triples: self.triples.clone(),
            content: self.content.clone(),
        }
    }
}

impl<T> Grounded<T> {
    /// A value with no triples (definitely empty).
    pub fn new(value: T) -> Self {
        Self::with_triples(value, TripleSet::empty())
    }

    pub fn with_triples(value: T, triples: TripleSet) -> Self {
        Self {
            value: Arc::new(value),
            triples,
            content: ContentCache::default(),
        }
    }

    /// A value grounded by a single root triple.
    pub fn rooted(value: T, root: Triple) -> Self {
        Self::with_triples(value, TripleSet::one(root))
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_arc(&self) -> &Arc<T> {
        &self.value
    }

    pub fn triples(&self) -> &TripleSet {
        &self.triples
    }

    /// Distinct grounding triples.
    pub fn triple_set(&self) -> BTreeSet<Triple> {
        self.triples.to_set()
    }

    pub fn is_definitely_empty(&self) -> bool {
        self.triples.is_definitely_empty()
    }

    /// Same value, grounded additionally by `other`'s triples.
    pub fn append<U>(&self, other: &Grounded<U>) -> Self {
        self.append_triples(&other.triples)
    }

    pub fn append_all<'a, U: 'a>(&self, others: impl IntoIterator<Item = &'a Grounded<U>>) -> Self {
        others
            .into_iter()
            .fold(self.clone(), |acc, other| acc.append(other))
    }

    pub fn append_triples(&self, triples: &TripleSet) -> Self {
        Self {
            value: Arc::clone(&self.value),
            triples: self.triples.append(triples),
            content: self.content.clone(),
        }
    }

    pub fn add(&self, triple: Triple) -> Self {
        self.append_triples(&TripleSet::one(triple))
    }

    pub fn delete(&self, triple: &Triple) -> Self {
        Self {
            value: Arc::clone(&self.value),
            triples: self.triples.without(triple),
            content: self.content.clone(),
        }
    }

    /// Another value with the same grounding.
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Grounded<U> {
        Grounded::with_triples(f(&self.value), self.triples.clone())
    }

    /// Seed the content cache with already-grounded components.
    pub fn with_content(self, components: Vec<Component>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Arc::from(components));
        Self {
            content: ContentCache {
                cell: Arc::new(cell),
                loader: self.content.loader,
            },
            ..self
        }
    }

    /// Install the function used to rebuild components after invalidation.
    pub fn with_loader(mut self, loader: ContentLoader) -> Self {
        self.content.loader = Some(loader);
        self
    }

    pub fn has_content(&self) -> bool {
        self.content.is_loaded()
    }

    /// Drop cached components; the next access recomputes them.
    pub fn clear_content(&mut self) {
        self.content.clear();
    }
}

impl<T: PartialEq> Grounded<T> {
    /// Combine two groundings of equal values.
    ///
    /// The result equals both inputs, holds the union of their triples, and
    /// keeps `self`'s computed content when there is one.
    pub fn merge(&self, other: &Self) -> Self {
        debug_assert!(self.value == other.value, "merging groundings of different values");
        if self.triples.ptr_eq(&other.triples) {
            return self.clone();
        }
        let content = if self.content.is_loaded() || !other.content.is_loaded() {
            self.content.clone()
        } else {
            other.content.clone()
        };
        Self {
            value: Arc::clone(&self.value),
            triples: self.triples.append(&other.triples),
            content,
        }
    }
}

impl<T: Decompose> Grounded<T> {
    /// Components of the value, computed at most once per cache.
    pub fn content(&self) -> Arc<[Component]> {
        self.content.get_or_init(|| self.value.decompose())
    }
}

impl Grounded<Axiom> {
    /// Grounded operand at `index`.
    pub fn operand(&self, index: usize) -> Option<Grounded<Operand>> {
        match self.content().get(index) {
            Some(Component::Operand(op)) => Some(op.clone()),
            _ => None,
        }
    }

    /// Grounded annotations, in value order.
    pub fn annotation_components(&self) -> Vec<Grounded<Annotation>> {
        self.content()
            .iter()
            .filter_map(|c| match c {
                Component::Annotation(a) => Some(a.clone()),
                Component::Operand(_) => None,
            })
            .collect()
    }
}

impl<T: PartialEq> PartialEq for Grounded<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Grounded<T> {}

impl<T: Hash> Hash for Grounded<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Grounded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grounded")
            .field("value", &self.value)
            .field("triples", &self.triples)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Grounded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
