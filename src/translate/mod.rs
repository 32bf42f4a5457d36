//! Statement ⇄ triple translation.
//!
//! One [`Translator`] per statement kind, each parameterized by a [`Shape`]
//! from the kind table. A translator finds candidate roots with a broad
//! pattern scan, confirms them by reading the full structure, and builds
//! [`Grounded`] statements whose triple sets hold exactly the triples the
//! reading consumed. Writing emits declarations, the shape's structure and
//! the statement's annotations, in that order.

pub(crate) mod annotations;
pub mod reader;
pub(crate) mod rules;
pub(crate) mod shapes;
pub mod table;
pub mod writer;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{BridgeResult, GraphWarning, ShapeError};
use crate::grounded::{Component, Decompose, Grounded, TripleSet};
use crate::model::{Axiom, AxiomKind, Operand};
use crate::store::StoreResult;
use crate::term::{Node, Triple};

use annotations::AnnotationGroup;

pub use reader::{GraphReader, Roles};
pub use table::{Shape, shape_of};
pub use writer::GraphWriter;

/// Where a statement's annotations live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Root triples; each gets its own `owl:Axiom` reification.
    Triples(Vec<Triple>),
    /// A statement blank node annotated directly.
    Node(Node),
}

/// Structure read from one candidate root, annotations aside.
pub(crate) struct Reading {
    pub operands: Vec<Grounded<Operand>>,
    pub triples: TripleSet,
    pub anchor: Anchor,
}

/// Pair each value with the groundings read for it, merging duplicates.
/// Values with no reading get an empty grounding.
pub(crate) fn align<T: PartialEq + Clone>(values: &[T], read: &[Grounded<T>]) -> Vec<Grounded<T>> {
    values
        .iter()
        .map(|value| {
            read.iter()
                .filter(|g| g.value() == value)
                .fold(None::<Grounded<T>>, |acc, g| match acc {
                    Some(acc) => Some(acc.merge(g)),
                    None => Some(g.clone()),
                })
                .unwrap_or_else(|| Grounded::new(value.clone()))
        })
        .collect()
}

/// Reads and writes one statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    kind: AxiomKind,
    shape: Shape,
}

impl Translator {
    /// Writing indexes operands by position, so `shape` has to fit the
    /// kind's signature; [`RegistryBuilder::build`](crate::registry::RegistryBuilder::build)
    /// checks it against the standard table.
    pub(crate) fn new(kind: AxiomKind, shape: Shape) -> Self {
        Self { kind, shape }
    }

    /// The translator from the standard kind table.
    pub fn for_kind(kind: AxiomKind) -> Self {
        Self::new(kind, shape_of(kind))
    }

    pub fn kind(&self) -> AxiomKind {
        self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    // -- reading ------------------------------------------------------------

    /// Root triples that read as a complete statement of this kind.
    pub fn candidates(&self, reader: &GraphReader) -> StoreResult<Vec<Triple>> {
        let mut out = Vec::new();
        for root in self.shape.scan(reader)? {
            if self.is_instance(reader, &root)? {
                out.push(root);
            }
        }
        Ok(out)
    }

    /// Returns `true` if `root` is in the graph and roots a well-formed
    /// statement of this kind.
    pub fn is_instance(&self, reader: &GraphReader, root: &Triple) -> StoreResult<bool> {
        if !self.shape.matches_root(root) || !reader.store().contains(root)? {
            return Ok(false);
        }
        Ok(self
            .shape
            .read(self.kind, reader, root)?
            .is_some_and(|reading| self.assemble(reading, AnnotationGroup::default()).is_some()))
    }

    /// Statements rooted at `root`, annotation grouping per the reader's
    /// configuration. Empty when `root` does not read as this kind.
    pub fn build(&self, reader: &GraphReader, root: &Triple) -> StoreResult<Vec<Grounded<Axiom>>> {
        self.build_with(reader, root, reader.config().split_axiom_annotations)
    }

    fn build_with(&self, reader: &GraphReader, root: &Triple, split: bool) -> StoreResult<Vec<Grounded<Axiom>>> {
        if !self.shape.matches_root(root) {
            return Ok(Vec::new());
        }
        let Some(reading) = self.shape.read(self.kind, reader, root)? else {
            self.report_unread(root);
            return Ok(Vec::new());
        };
        let groups = self.annotation_groups(reader, &reading.anchor, split)?;
        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            let reading = Reading {
                operands: reading.operands.clone(),
                triples: reading.triples.clone(),
                anchor: reading.anchor.clone(),
            };
            if let Some(built) = self.assemble(reading, group) {
                out.push(self.with_reloader(built, reader, root, split));
            } else {
                debug!(
                    warning = %GraphWarning::Invalid {
                        kind: self.kind.to_string(),
                        triple: root.to_string(),
                        reason: "operands do not satisfy the kind's signature".into(),
                    },
                    "dropping candidate"
                );
            }
        }
        Ok(out)
    }

    /// The single statement rooted at `root`, every reification combined.
    pub fn materialize(&self, reader: &GraphReader, root: &Triple) -> BridgeResult<Grounded<Axiom>> {
        if !self.shape.matches_root(root) || !reader.store().contains(root)? {
            return Err(ShapeError::NotAnInstance {
                kind: self.kind.to_string(),
                triple: root.to_string(),
            }
            .into());
        }
        let unreadable = || ShapeError::Unreadable {
            kind: self.kind.to_string(),
            triple: root.to_string(),
        };
        let Some(reading) = self.shape.read(self.kind, reader, root)? else {
            return Err(unreadable().into());
        };
        let group = self
            .annotation_groups(reader, &reading.anchor, false)?
            .into_iter()
            .next()
            .unwrap_or_default();
        let built = self.assemble(reading, group).ok_or_else(unreadable)?;
        Ok(self.with_reloader(built, reader, root, false))
    }

    /// Every statement of this kind in the graph, equal values merged.
    pub fn list(&self, reader: &GraphReader) -> StoreResult<Vec<Grounded<Axiom>>> {
        let split = reader.config().split_axiom_annotations;
        let mut found: BTreeMap<Axiom, Grounded<Axiom>> = BTreeMap::new();
        for root in self.shape.scan(reader)? {
            for built in self.build_with(reader, &root, split)? {
                match found.entry(built.value().clone()) {
                    Entry::Occupied(mut slot) => {
                        let merged = slot.get().merge(&built);
                        slot.insert(merged);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(built);
                    }
                }
            }
        }
        trace!(kind = %self.kind, count = found.len(), "listed statements");
        Ok(found.into_values().collect())
    }

    fn annotation_groups(&self, reader: &GraphReader, anchor: &Anchor, split: bool) -> StoreResult<Vec<AnnotationGroup>> {
        match anchor {
            Anchor::Triples(roots) => match roots.as_slice() {
                [root] => reader.axiom_annotations(root, split),
                _ => Ok(vec![AnnotationGroup::default()]),
            },
            Anchor::Node(node) => Ok(vec![AnnotationGroup {
                triples: TripleSet::empty(),
                annotations: reader.direct_annotations(node, 0)?,
            }]),
        }
    }

    fn assemble(&self, reading: Reading, group: AnnotationGroup) -> Option<Grounded<Axiom>> {
        let operands: Vec<Operand> = reading.operands.iter().map(|o| o.value().clone()).collect();
        let annotations = group.annotations.iter().map(|a| a.value().clone()).collect::<Vec<_>>();
        let axiom = Axiom::new(self.kind, operands, annotations).ok()?;
        let content = align(axiom.operands(), &reading.operands)
            .into_iter()
            .map(Component::Operand)
            .chain(
                align(axiom.annotations(), &group.annotations)
                    .into_iter()
                    .map(Component::Annotation),
            )
            .collect();
        let triples = reading.triples.append(&group.triples);
        Some(
            Grounded::with_triples(axiom, triples)
                .append_all(&reading.operands)
                .append_all(&group.annotations)
                .with_content(content),
        )
    }

    /// Install a loader that re-reads the graph when the content cache is
    /// cleared, falling back to the bare value's decomposition.
    fn with_reloader(&self, built: Grounded<Axiom>, reader: &GraphReader, root: &Triple, split: bool) -> Grounded<Axiom> {
        let translator = *self;
        let reader = reader.detached();
        let root = root.clone();
        let value = Arc::clone(built.value_arc());
        built.with_loader(Arc::new(move || {
            translator
                .build_with(&reader, &root, split)
                .ok()
                .and_then(|found| found.into_iter().find(|g| g.value() == &*value))
                .map(|g| g.content().to_vec())
                .unwrap_or_else(|| value.decompose())
        }))
    }

    fn report_unread(&self, root: &Triple) {
        // Listed and rule roots only ever belong to one kind, so a failed
        // read there means broken structure rather than another kind's root.
        if matches!(self.shape, Shape::Listed(_) | Shape::Rule) {
            debug!(
                warning = %GraphWarning::PartiallyFormed {
                    kind: self.kind.to_string(),
                    triple: root.to_string(),
                },
                "dropping candidate"
            );
        } else {
            trace!(kind = %self.kind, root = %root, "candidate does not read as this kind");
        }
    }

    // -- writing ------------------------------------------------------------

    /// Emit declarations, structure and annotations for `axiom`.
    ///
    /// Run [`GraphWriter::validate`] first; only the signature is checked
    /// again here, roles and reserved names are not.
    pub fn write(&self, writer: &GraphWriter<'_>, axiom: &Axiom) -> BridgeResult<Anchor> {
        debug_assert_eq!(axiom.kind(), self.kind, "statement routed to the wrong translator");
        axiom.check()?;
        writer.declare(axiom)?;
        let anchor = self.shape.write(writer, axiom)?;
        writer.annotate(&anchor, axiom.annotations())?;
        Ok(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::model::{ClassExpr, Entity, Individual, ObjectPropertyExpr};
    use crate::store::{MemStore, TripleStore};
    use crate::term::Literal;
    use crate::vocab::rdfs;

    fn reader() -> GraphReader {
        let store: Arc<dyn TripleStore> = Arc::new(MemStore::new());
        GraphReader::new(store, Arc::new(BridgeConfig::default()))
    }

    fn write(reader: &GraphReader, axiom: &Axiom) -> Anchor {
        let writer = GraphWriter::new(reader);
        writer.validate(axiom).unwrap();
        Translator::for_kind(axiom.kind()).write(&writer, axiom).unwrap()
    }

    #[test]
    fn sub_class_of_round_trip() {
        let reader = reader();
        let axiom = Axiom::sub_class_of(ClassExpr::class("http://ex/A"), ClassExpr::class("http://ex/B"));
        write(&reader, &axiom);
        let listed = Translator::for_kind(AxiomKind::SubClassOf).list(&reader).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value(), &axiom);
        // root + the two class declarations
        assert_eq!(listed[0].triple_set().len(), 3);
    }

    #[test]
    fn restriction_operand_owns_its_triples() {
        let reader = reader();
        let filler = ClassExpr::some_values_from(ObjectPropertyExpr::named("http://ex/p"), ClassExpr::class("http://ex/C"));
        let axiom = Axiom::sub_class_of(ClassExpr::class("http://ex/A"), filler);
        write(&reader, &axiom);
        let listed = Translator::for_kind(AxiomKind::SubClassOf).list(&reader).unwrap();
        assert_eq!(listed.len(), 1);
        // root + type + onProperty + someValuesFrom + declarations of A, p and C
        assert_eq!(listed[0].triple_set().len(), 7);
        let sup = listed[0].operand(1).unwrap();
        assert_eq!(sup.triple_set().len(), 5);
    }

    #[test]
    fn annotated_statement_carries_reification() {
        let reader = reader();
        let axiom = Axiom::sub_class_of(ClassExpr::class("http://ex/A"), ClassExpr::class("http://ex/B"))
            .with_annotations([crate::model::Annotation::new(rdfs::COMMENT, Literal::string("c"))]);
        write(&reader, &axiom);
        let listed = Translator::for_kind(AxiomKind::SubClassOf).list(&reader).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value(), &axiom);
        // root + 4 reification + 1 annotation + 2 declarations
        assert_eq!(listed[0].triple_set().len(), 8);
        assert_eq!(listed[0].annotation_components().len(), 1);
    }

    #[test]
    fn materialize_rejects_foreign_roots() {
        let reader = reader();
        let axiom = Axiom::sub_class_of(ClassExpr::class("http://ex/A"), ClassExpr::class("http://ex/B"));
        write(&reader, &axiom);
        let root = Triple::new(Node::iri("http://ex/A"), rdfs::SUB_CLASS_OF, Node::iri("http://ex/B"));
        let eq = Translator::for_kind(AxiomKind::EquivalentClasses);
        assert!(eq.materialize(&reader, &root).is_err());
        let built = Translator::for_kind(AxiomKind::SubClassOf)
            .materialize(&reader, &root)
            .unwrap();
        assert_eq!(built.value(), &axiom);
    }

    #[test]
    fn bulk_different_individuals_read_as_one_statement() {
        let reader = reader();
        let axiom = Axiom::different_individuals(
            ["http://ex/a", "http://ex/b", "http://ex/c"].map(Individual::named),
        )
        .unwrap();
        let anchor = write(&reader, &axiom);
        assert!(matches!(anchor, Anchor::Node(_)));
        let listed = Translator::for_kind(AxiomKind::DifferentIndividuals)
            .list(&reader)
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value(), &axiom);
    }

    #[test]
    fn cleared_content_is_reloaded_from_the_graph() {
        let reader = reader();
        let axiom = Axiom::class_assertion(ClassExpr::class("http://ex/C"), Individual::named("http://ex/i"));
        write(&reader, &axiom);
        let mut built = Translator::for_kind(AxiomKind::ClassAssertion)
            .list(&reader)
            .unwrap()
            .remove(0);
        assert!(built.has_content());
        built.clear_content();
        assert!(!built.has_content());
        assert_eq!(built.content().len(), 2);
        assert!(built.has_content());
    }

    #[test]
    fn inverse_property_assertion_is_refused() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        let axiom = Axiom::unchecked(
            AxiomKind::ObjectPropertyAssertion,
            vec![
                Operand::ObjectProperty(ObjectPropertyExpr::inverse("http://ex/p")),
                Operand::Individual(Individual::named("http://ex/a")),
                Operand::Individual(Individual::named("http://ex/b")),
            ],
        );
        assert!(writer.validate(&axiom).is_err());
        let err = Shape::PropertyAssertion.write(&writer, &axiom).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BridgeError::Shape(ShapeError::OperandType { position: 0, .. })
        ));
        assert_eq!(reader.store().len().unwrap(), 0);
    }

    #[test]
    fn malformed_statement_is_not_written() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        let axiom = Axiom::unchecked(AxiomKind::SubClassOf, Vec::new());
        let translator = Translator::for_kind(AxiomKind::SubClassOf);
        assert!(matches!(
            translator.write(&writer, &axiom),
            Err(crate::error::BridgeError::Shape(ShapeError::Arity { actual: 0, .. }))
        ));
        assert_eq!(reader.store().len().unwrap(), 0);
    }

    #[test]
    fn declarations_are_instances_only_for_their_kind() {
        let reader = reader();
        write(&reader, &Axiom::declaration(Entity::class("http://ex/A")));
        let root = Triple::new(Node::iri("http://ex/A"), crate::vocab::rdf::TYPE, Node::iri(crate::vocab::owl::CLASS));
        assert!(Translator::for_kind(AxiomKind::Declaration).is_instance(&reader, &root).unwrap());
        assert!(!Translator::for_kind(AxiomKind::ClassAssertion).is_instance(&reader, &root).unwrap());
    }
}
