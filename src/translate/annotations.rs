//! Annotations on statements and on other annotations.
//!
//! Triple-rooted statements carry annotations on an `owl:Axiom` reification
//! of their root triple. Blank-node-rooted statements carry them directly on
//! the blank node. Annotations on annotations reify the annotation triple
//! with `owl:Annotation`.

use crate::grounded::{Component, Grounded, TripleSet};
use crate::model::{Annotation, AnnotationValue, EntityType};
use crate::store::StoreResult;
use crate::term::{Iri, Node, Triple};
use crate::vocab::{owl, rdf};

use super::align;
use super::reader::GraphReader;
use super::writer::GraphWriter;

/// One reification of a triple: its backbone and the annotations on it.
#[derive(Debug, Clone)]
pub(crate) struct Reification {
    pub triples: TripleSet,
    pub annotations: Vec<Grounded<Annotation>>,
}

/// Annotations read for one statement, with the triples that carry them
/// beyond the annotation triples themselves.
#[derive(Debug, Clone, Default)]
pub(crate) struct AnnotationGroup {
    pub triples: TripleSet,
    pub annotations: Vec<Grounded<Annotation>>,
}

pub(crate) fn annotation_value(node: &Node) -> AnnotationValue {
    match node {
        Node::Iri(iri) => AnnotationValue::Iri(iri.clone()),
        Node::Literal(lit) => AnnotationValue::Literal(lit.clone()),
        Node::Blank(id) => AnnotationValue::Anonymous(id.clone()),
    }
}

fn value_node(value: &AnnotationValue) -> Node {
    match value {
        AnnotationValue::Iri(iri) => Node::Iri(iri.clone()),
        AnnotationValue::Literal(lit) => Node::Literal(lit.clone()),
        AnnotationValue::Anonymous(id) => Node::Blank(id.clone()),
    }
}

impl GraphReader {
    /// Annotations asserted directly on `subject`.
    pub(crate) fn direct_annotations(&self, subject: &Node, depth: usize) -> StoreResult<Vec<Grounded<Annotation>>> {
        if depth > self.config().max_expression_depth {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for t in self.store().find(Some(subject), None, None)? {
            if !self.roles(&t.predicate)?.is_annotation_property() {
                continue;
            }
            let mut triples = TripleSet::one(t.clone())
                .append(&self.declaration(&t.predicate, EntityType::AnnotationProperty)?);
            let mut nested = Vec::new();
            for r in self.reifications(&t, owl::ANNOTATION, depth + 1)? {
                triples = triples.append(&r.triples);
                nested.extend(r.annotations);
            }
            let annotation = Annotation::new(t.predicate.clone(), annotation_value(&t.object))
                .with_annotations(nested.iter().map(|n| n.value().clone()));
            let content = align(annotation.annotations(), &nested)
                .into_iter()
                .map(Component::Annotation)
                .collect();
            out.push(
                Grounded::with_triples(annotation, triples)
                    .append_all(&nested)
                    .with_content(content),
            );
        }
        Ok(out)
    }

    /// Reifications of `triple` typed `reifier`, such as `owl:Axiom`.
    pub(crate) fn reifications(&self, triple: &Triple, reifier: &str, depth: usize) -> StoreResult<Vec<Reification>> {
        let mut out = Vec::new();
        for source in self.find(None, owl::ANNOTATED_SOURCE, Some(&triple.subject))? {
            let node = &source.subject;
            if !node.is_blank() {
                continue;
            }
            let Some(typed) = self.typed(node, reifier)? else {
                continue;
            };
            let (Some(property), Some(target)) = (
                self.single(node, owl::ANNOTATED_PROPERTY)?,
                self.single(node, owl::ANNOTATED_TARGET)?,
            ) else {
                continue;
            };
            if !property.object.is(triple.predicate.as_str()) || target.object != triple.object {
                continue;
            }
            let annotations = self.direct_annotations(node, depth)?;
            out.push(Reification {
                triples: TripleSet::many(vec![typed, source.clone(), property, target]),
                annotations,
            });
        }
        Ok(out)
    }

    /// Annotation groups of a statement rooted at `root`.
    ///
    /// Combined mode yields one group holding every reification. Split mode
    /// yields one group per reification, or a single empty group when the
    /// root is not reified.
    pub(crate) fn axiom_annotations(&self, root: &Triple, split: bool) -> StoreResult<Vec<AnnotationGroup>> {
        let reifications = self.reifications(root, owl::AXIOM, 0)?;
        if split && !reifications.is_empty() {
            return Ok(reifications
                .into_iter()
                .map(|r| AnnotationGroup {
                    triples: r.triples,
                    annotations: r.annotations,
                })
                .collect());
        }
        let combined = reifications
            .into_iter()
            .fold(AnnotationGroup::default(), |mut group, r| {
                group.triples = group.triples.append(&r.triples);
                group.annotations.extend(r.annotations);
                group
            });
        Ok(vec![combined])
    }

    /// Annotations of an ontology header: plain assertions on the header
    /// node plus annotations on a reification of the header type triple.
    ///
    /// Equal property/value pairs found both ways collapse into one
    /// annotation whose nested annotations are the union of both. Deeper
    /// nesting is not merged.
    pub(crate) fn header_annotations(&self, header: &Node) -> StoreResult<Vec<Grounded<Annotation>>> {
        let mut found = self.direct_annotations(header, 0)?;
        let header_type = Triple::new(header.clone(), rdf::TYPE, Node::iri(owl::ONTOLOGY));
        for r in self.reifications(&header_type, owl::AXIOM, 0)? {
            found.extend(r.annotations.into_iter().map(|a| a.append_triples(&r.triples)));
        }
        let mut merged: Vec<Grounded<Annotation>> = Vec::new();
        for a in found {
            let same = merged.iter().position(|m| {
                m.value().property() == a.value().property() && m.value().value() == a.value().value()
            });
            match same {
                Some(i) if merged[i].value() == a.value() => merged[i] = merged[i].merge(&a),
                Some(i) => {
                    let combined = merged[i]
                        .value()
                        .clone()
                        .with_annotations(a.value().annotations().iter().cloned());
                    merged[i] = merged[i].map(|_| combined).append(&a);
                }
                None => merged.push(a),
            }
        }
        merged.sort_by(|a, b| a.value().cmp(b.value()));
        Ok(merged)
    }
}

impl GraphWriter<'_> {
    /// Reify `triple` as `reifier` and attach `annotations` to the reification.
    pub(crate) fn reify(&self, triple: &Triple, reifier: &str, annotations: &[Annotation]) -> StoreResult<()> {
        let node = self.fresh()?;
        self.add(node.clone(), rdf::TYPE, Node::iri(reifier))?;
        self.add(node.clone(), owl::ANNOTATED_SOURCE, triple.subject.clone())?;
        self.add(node.clone(), owl::ANNOTATED_PROPERTY, Node::Iri(triple.predicate.clone()))?;
        self.add(node.clone(), owl::ANNOTATED_TARGET, triple.object.clone())?;
        self.annotate_node(&node, annotations)
    }

    /// Assert `annotations` directly on `subject`, reifying nested ones.
    pub(crate) fn annotate_node(&self, subject: &Node, annotations: &[Annotation]) -> StoreResult<()> {
        for annotation in annotations {
            let triple = self.add(
                subject.clone(),
                annotation.property().clone(),
                value_node(annotation.value()),
            )?;
            if !annotation.annotations().is_empty() {
                self.reify(&triple, owl::ANNOTATION, annotation.annotations())?;
            }
        }
        Ok(())
    }

    /// Attach statement annotations at `anchor`.
    pub(crate) fn annotate(&self, anchor: &super::Anchor, annotations: &[Annotation]) -> StoreResult<()> {
        if annotations.is_empty() {
            return Ok(());
        }
        match anchor {
            super::Anchor::Triples(roots) => {
                for root in roots {
                    self.reify(root, owl::AXIOM, annotations)?;
                }
                Ok(())
            }
            super::Anchor::Node(node) => self.annotate_node(node, annotations),
        }
    }

    /// Write an ontology annotation on the header node.
    pub(crate) fn annotate_header(&self, header: &Node, annotation: &Annotation) -> StoreResult<()> {
        self.annotate_node(header, std::slice::from_ref(annotation))
    }
}

/// Annotation property IRIs mentioned by `annotations`, nested ones included.
pub(crate) fn annotation_properties(annotations: &[Annotation], out: &mut Vec<Iri>) {
    for a in annotations {
        out.push(a.property().clone());
        annotation_properties(a.annotations(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::store::{MemStore, TripleStore};
    use crate::term::Literal;
    use crate::vocab::rdfs;
    use std::sync::Arc;

    fn setup() -> (Arc<dyn TripleStore>, GraphReader) {
        let store: Arc<dyn TripleStore> = Arc::new(MemStore::new());
        let reader = GraphReader::new(Arc::clone(&store), Arc::new(BridgeConfig::default()));
        (store, reader)
    }

    #[test]
    fn nested_annotations_round_trip() {
        let (store, reader) = setup();
        let root = Triple::new(Node::iri("http://ex/A"), rdfs::SUB_CLASS_OF, Node::iri("http://ex/B"));
        store.add(root.clone()).unwrap();
        let inner = Annotation::new(rdfs::COMMENT, Literal::string("why"));
        let outer = Annotation::new(rdfs::LABEL, Literal::string("note")).with_annotations([inner.clone()]);
        GraphWriter::new(&reader).reify(&root, owl::AXIOM, &[outer.clone()]).unwrap();

        let groups = reader.axiom_annotations(&root, false).unwrap();
        assert_eq!(groups.len(), 1);
        let read: Vec<_> = groups[0].annotations.iter().map(|a| a.value().clone()).collect();
        assert_eq!(read, vec![outer]);
        // 4 reification + 1 annotation, then 4 + 1 for the nested one
        let owned = groups[0]
            .triples
            .append(groups[0].annotations[0].triples())
            .to_set();
        assert_eq!(owned.len(), 10);
    }

    #[test]
    fn split_mode_keeps_reifications_apart() {
        let (store, reader) = setup();
        let root = Triple::new(Node::iri("http://ex/A"), rdfs::SUB_CLASS_OF, Node::iri("http://ex/B"));
        store.add(root.clone()).unwrap();
        let writer = GraphWriter::new(&reader);
        writer
            .reify(&root, owl::AXIOM, &[Annotation::new(rdfs::LABEL, Literal::string("x"))])
            .unwrap();
        writer
            .reify(&root, owl::AXIOM, &[Annotation::new(rdfs::LABEL, Literal::string("y"))])
            .unwrap();
        assert_eq!(reader.axiom_annotations(&root, true).unwrap().len(), 2);
        let combined = reader.axiom_annotations(&root, false).unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].annotations.len(), 2);
    }

    #[test]
    fn header_annotations_merge_leniently() {
        let (store, reader) = setup();
        let header = Node::iri("http://ex/onto");
        let header_type = Triple::new(header.clone(), rdf::TYPE, Node::iri(owl::ONTOLOGY));
        store.add(header_type.clone()).unwrap();
        let label = Annotation::new(rdfs::LABEL, Literal::string("Onto"));
        let writer = GraphWriter::new(&reader);
        writer.annotate_header(&header, &label).unwrap();
        let nested = label
            .clone()
            .with_annotations([Annotation::new(rdfs::COMMENT, Literal::string("src"))]);
        writer.reify(&header_type, owl::AXIOM, &[nested.clone()]).unwrap();

        let read = reader.header_annotations(&header).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].value(), &nested);
    }
}
