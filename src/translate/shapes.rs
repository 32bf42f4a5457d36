//! The generic engine behind each [`Shape`]: scanning, root tests,
//! reading and writing.

use crate::error::{BridgeResult, ShapeError};
use crate::grounded::{Grounded, TripleSet};
use crate::model::{Arity, Axiom, AxiomKind, Entity, EntityType, Operand, OperandType};
use crate::store::StoreResult;
use crate::term::{Iri, Node, Triple};
use crate::vocab::{self, owl, rdf, swrl};

use super::reader::GraphReader;
use super::table::Shape;
use super::writer::GraphWriter;
use super::{Anchor, Reading, rules};

impl Shape {
    /// Broad pattern scan; a superset of the roots of this shape.
    pub(crate) fn scan(self, reader: &GraphReader) -> StoreResult<Vec<Triple>> {
        let typed = |type_iri: &str| reader.find(None, rdf::TYPE, Some(&Node::iri(type_iri)));
        match self {
            Shape::Declaration => {
                let mut out = Vec::new();
                for t in EntityType::ALL {
                    out.extend(typed(t.type_iri())?);
                }
                Ok(out)
            }
            Shape::Binary(p) | Shape::Pairwise(p) | Shape::Listed(p) => reader.find(None, p, None),
            Shape::TwoWay { predicate, bulk } => {
                let mut out = reader.find(None, predicate, None)?;
                out.extend(typed(bulk)?);
                Ok(out)
            }
            Shape::Characteristic(c) => typed(c),
            Shape::ClassAssertion => reader.find(None, rdf::TYPE, None),
            Shape::PropertyAssertion => reader.store().find(None, None, None),
            Shape::NegativeAssertion { .. } => typed(owl::NEGATIVE_PROPERTY_ASSERTION),
            Shape::Rule => typed(swrl::IMP),
        }
    }

    /// Pattern test on the root triple alone.
    pub(crate) fn matches_root(self, t: &Triple) -> bool {
        let is_type = t.has_predicate(rdf::TYPE);
        match self {
            Shape::Declaration => {
                is_type
                    && matches!(t.subject, Node::Iri(_))
                    && t.object
                        .as_iri()
                        .is_some_and(|o| EntityType::from_type_iri(o.as_str()).is_some())
            }
            Shape::Binary(p) | Shape::Pairwise(p) | Shape::Listed(p) => t.has_predicate(p),
            Shape::TwoWay { predicate, bulk } => {
                t.has_predicate(predicate) || (is_type && t.subject.is_blank() && t.object.is(bulk))
            }
            Shape::Characteristic(c) => is_type && t.object.is(c),
            Shape::ClassAssertion => {
                is_type
                    && match &t.object {
                        Node::Iri(iri) => !vocab::is_reserved(iri) || vocab::is_builtin_class(iri),
                        Node::Blank(_) => true,
                        Node::Literal(_) => false,
                    }
            }
            Shape::PropertyAssertion => {
                let p = &t.predicate;
                !vocab::is_reserved(p)
                    || vocab::is_builtin_annotation_property(p)
                    || vocab::is_builtin_object_property(p)
                    || vocab::is_builtin_data_property(p)
            }
            Shape::NegativeAssertion { .. } => {
                is_type && t.subject.is_blank() && t.object.is(owl::NEGATIVE_PROPERTY_ASSERTION)
            }
            Shape::Rule => is_type && t.subject.is_blank() && t.object.is(swrl::IMP),
        }
    }

    /// Read the statement structure rooted at `root`, annotations aside.
    pub(crate) fn read(self, kind: AxiomKind, reader: &GraphReader, root: &Triple) -> StoreResult<Option<Reading>> {
        let arity = kind.signature();
        let (s, o) = (&root.subject, &root.object);
        let rooted = |operands: Vec<Grounded<Operand>>| Reading {
            operands,
            triples: TripleSet::one(root.clone()),
            anchor: Anchor::Triples(vec![root.clone()]),
        };
        match self {
            Shape::Declaration => {
                let entity_type = o.as_iri().and_then(|o| EntityType::from_type_iri(o.as_str()));
                let (Node::Iri(iri), Some(entity_type)) = (s, entity_type) else {
                    return Ok(None);
                };
                let entity = Operand::Entity(Entity::new(entity_type, iri.clone()));
                Ok(Some(rooted(vec![Grounded::new(entity)])))
            }
            Shape::Binary(_) => {
                let Arity::Fixed([a, b]) = arity else {
                    return Ok(None);
                };
                Ok(both(reader, (*a, s), (*b, o))?.map(rooted))
            }
            Shape::Pairwise(_) => {
                let Some(item) = item_of(arity) else {
                    return Ok(None);
                };
                Ok(both(reader, (item, s), (item, o))?.map(rooted))
            }
            Shape::TwoWay { predicate, .. } => {
                let Some(item) = item_of(arity) else {
                    return Ok(None);
                };
                if root.has_predicate(predicate) {
                    return Ok(both(reader, (item, s), (item, o))?.map(rooted));
                }
                let mut links = reader.find(Some(s), owl::MEMBERS, None)?;
                if kind == AxiomKind::DifferentIndividuals {
                    links.extend(reader.find(Some(s), owl::DISTINCT_MEMBERS, None)?);
                }
                let [link] = links.as_slice() else {
                    return Ok(None);
                };
                let Some((nodes, backbone)) = reader.list(&link.object)? else {
                    return Ok(None);
                };
                let Some(operands) = reader.each(&nodes, |n| reader.operand(item, n))? else {
                    return Ok(None);
                };
                Ok(Some(Reading {
                    operands,
                    triples: TripleSet::many(vec![root.clone(), link.clone()]).append(&backbone),
                    anchor: Anchor::Node(s.clone()),
                }))
            }
            Shape::Characteristic(_) => {
                let Arity::Fixed([a]) = arity else {
                    return Ok(None);
                };
                Ok(reader.operand(*a, s)?.map(|p| rooted(vec![p])))
            }
            Shape::Listed(_) => {
                let (Some(head), Some(item)) = (arity.head().first(), item_of(arity)) else {
                    return Ok(None);
                };
                let Some(first) = reader.operand(*head, s)? else {
                    return Ok(None);
                };
                let Some((nodes, backbone)) = reader.list(o)? else {
                    return Ok(None);
                };
                let Some(rest) = reader.each(&nodes, |n| reader.operand(item, n))? else {
                    return Ok(None);
                };
                let mut reading = rooted(std::iter::once(first).chain(rest).collect());
                reading.triples = reading.triples.append(&backbone);
                Ok(Some(reading))
            }
            Shape::ClassAssertion => {
                Ok(both(reader, (OperandType::Class, o), (OperandType::Individual, s))?.map(rooted))
            }
            Shape::PropertyAssertion => {
                let Arity::Fixed([p, a, b]) = arity else {
                    return Ok(None);
                };
                if kind == AxiomKind::AnnotationAssertion && reader.header() == Some(s) {
                    return Ok(None);
                }
                let Some(property) = reader.operand(*p, &Node::Iri(root.predicate.clone()))? else {
                    return Ok(None);
                };
                Ok(both(reader, (*a, s), (*b, o))?.map(|mut ends| {
                    ends.insert(0, property);
                    rooted(ends)
                }))
            }
            Shape::NegativeAssertion { target } => {
                let Arity::Fixed([p, a, b]) = arity else {
                    return Ok(None);
                };
                let (Some(source), Some(property), Some(value)) = (
                    reader.single(s, owl::SOURCE_INDIVIDUAL)?,
                    reader.single(s, owl::ASSERTION_PROPERTY)?,
                    reader.single(s, target)?,
                ) else {
                    return Ok(None);
                };
                let Some(prop) = reader.operand(*p, &property.object)? else {
                    return Ok(None);
                };
                let Some(ends) = both(reader, (*a, &source.object), (*b, &value.object))? else {
                    return Ok(None);
                };
                Ok(Some(Reading {
                    operands: std::iter::once(prop).chain(ends).collect(),
                    triples: TripleSet::many(vec![root.clone(), source, property, value]),
                    anchor: Anchor::Node(s.clone()),
                }))
            }
            Shape::Rule => rules::read(reader, root),
        }
    }

    /// Emit the structure of `axiom`, returning where annotations attach.
    ///
    /// `axiom` must already satisfy its kind's signature.
    pub(crate) fn write(self, writer: &GraphWriter<'_>, axiom: &Axiom) -> BridgeResult<Anchor> {
        let ops = axiom.operands();
        match self {
            Shape::Declaration => {
                let roots = ops
                    .iter()
                    .filter_map(|o| match o {
                        Operand::Entity(e) => Some(writer.declare_entity(e)),
                        _ => None,
                    })
                    .collect::<StoreResult<Vec<_>>>()?;
                Ok(Anchor::Triples(roots))
            }
            Shape::Binary(p) => {
                let s = writer.operand(&ops[0])?;
                let o = writer.operand(&ops[1])?;
                Ok(Anchor::Triples(vec![writer.add(s, p, o)?]))
            }
            Shape::Pairwise(p) => Ok(Anchor::Triples(pairwise(writer, p, axiom)?)),
            Shape::TwoWay { predicate, bulk } => {
                if ops.len() <= 2 {
                    return Ok(Anchor::Triples(pairwise(writer, predicate, axiom)?));
                }
                let members = ops
                    .iter()
                    .map(|o| writer.operand(o))
                    .collect::<StoreResult<Vec<_>>>()?;
                let list = writer.list(members)?;
                let node = writer.fresh()?;
                writer.add(node.clone(), rdf::TYPE, Node::iri(bulk))?;
                writer.add(node.clone(), owl::MEMBERS, list)?;
                Ok(Anchor::Node(node))
            }
            Shape::Characteristic(c) => {
                let p = writer.operand(&ops[0])?;
                Ok(Anchor::Triples(vec![writer.add(p, rdf::TYPE, Node::iri(c))?]))
            }
            Shape::Listed(p) => {
                let head = writer.operand(&ops[0])?;
                let members = ops[1..]
                    .iter()
                    .map(|o| writer.operand(o))
                    .collect::<StoreResult<Vec<_>>>()?;
                let list = writer.list(members)?;
                Ok(Anchor::Triples(vec![writer.add(head, p, list)?]))
            }
            Shape::ClassAssertion => {
                let class = writer.operand(&ops[0])?;
                let individual = writer.operand(&ops[1])?;
                Ok(Anchor::Triples(vec![writer.add(individual, rdf::TYPE, class)?]))
            }
            Shape::PropertyAssertion => {
                let Some(property) = property_iri(&ops[0]) else {
                    return Err(ShapeError::OperandType {
                        kind: axiom.kind().name().to_string(),
                        position: 0,
                        expected: "a named property".to_string(),
                    }
                    .into());
                };
                let s = writer.operand(&ops[1])?;
                let o = writer.operand(&ops[2])?;
                Ok(Anchor::Triples(vec![writer.add(s, property.clone(), o)?]))
            }
            Shape::NegativeAssertion { target } => {
                let property = writer.operand(&ops[0])?;
                let source = writer.operand(&ops[1])?;
                let value = writer.operand(&ops[2])?;
                let node = writer.fresh()?;
                writer.add(node.clone(), rdf::TYPE, Node::iri(owl::NEGATIVE_PROPERTY_ASSERTION))?;
                writer.add(node.clone(), owl::SOURCE_INDIVIDUAL, source)?;
                writer.add(node.clone(), owl::ASSERTION_PROPERTY, property)?;
                writer.add(node.clone(), target, value)?;
                Ok(Anchor::Node(node))
            }
            Shape::Rule => Ok(rules::write(writer, axiom)?),
        }
    }
}

fn item_of(arity: Arity) -> Option<OperandType> {
    match arity {
        Arity::Set { item, .. } | Arity::Sequence { item, .. } => Some(item),
        Arity::Fixed(_) => None,
    }
}

fn both(
    reader: &GraphReader,
    (ta, a): (OperandType, &Node),
    (tb, b): (OperandType, &Node),
) -> StoreResult<Option<Vec<Grounded<Operand>>>> {
    let Some(x) = reader.operand(ta, a)? else {
        return Ok(None);
    };
    Ok(reader.operand(tb, b)?.map(|y| vec![x, y]))
}

/// One triple per operand pair; a single operand relates to itself.
fn pairwise(writer: &GraphWriter<'_>, predicate: &str, axiom: &Axiom) -> StoreResult<Vec<Triple>> {
    if let [only] = axiom.operands() {
        let node = writer.operand(only)?;
        return Ok(vec![writer.add(node.clone(), predicate, node)?]);
    }
    let mut roots = Vec::new();
    for pair in axiom.as_pairwise() {
        if let [a, b] = pair.operands() {
            let a = writer.operand(a)?;
            let b = writer.operand(b)?;
            roots.push(writer.add(a, predicate, b)?);
        }
    }
    Ok(roots)
}

fn property_iri(operand: &Operand) -> Option<&Iri> {
    match operand {
        Operand::ObjectProperty(p) => match p {
            crate::model::ObjectPropertyExpr::Named(iri) => Some(iri),
            crate::model::ObjectPropertyExpr::Inverse(_) => None,
        },
        Operand::DataProperty(iri) | Operand::AnnotationProperty(iri) => Some(iri),
        _ => None,
    }
}
