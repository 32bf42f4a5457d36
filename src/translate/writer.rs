//! Emitting triples for statements and their nested structure.
//!
//! Every anonymous structure (restriction, boolean connective, list cell,
//! reification) gets a fresh blank node, so two writes never alias.
//! [`GraphWriter::validate`] is a dry run: it touches nothing and must pass
//! before any triple is emitted.

use std::collections::BTreeMap;

use crate::error::{BridgeResult, ShapeError};
use crate::model::{Axiom, ClassExpr, DataRange, Entity, Individual, ObjectPropertyExpr, Operand};
use crate::store::{StoreResult, TripleStore};
use crate::term::{Iri, Literal, Node, Triple};
use crate::vocab::{self, owl, rdf, rdfs};

use super::reader::{GraphReader, Roles};

/// Writes into the store behind a [`GraphReader`], using it for role checks.
pub struct GraphWriter<'a> {
    reader: &'a GraphReader,
}

impl<'a> GraphWriter<'a> {
    pub fn new(reader: &'a GraphReader) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &GraphReader {
        self.reader
    }

    fn store(&self) -> &dyn TripleStore {
        self.reader.store().as_ref()
    }

    pub(crate) fn add(
        &self,
        subject: impl Into<Node>,
        predicate: impl Into<Iri>,
        object: impl Into<Node>,
    ) -> StoreResult<Triple> {
        let triple = Triple::new(subject, predicate, object);
        self.store().add(triple.clone())?;
        Ok(triple)
    }

    pub(crate) fn fresh(&self) -> StoreResult<Node> {
        Ok(Node::Blank(self.store().fresh_blank()?))
    }

    // -- validation ---------------------------------------------------------

    /// Check `axiom` against its kind's signature, reserved vocabulary and
    /// the roles already in the graph, without writing.
    pub fn validate(&self, axiom: &Axiom) -> BridgeResult<()> {
        axiom.check()?;
        self.validate_entities(axiom.signature())
    }

    pub(crate) fn validate_entities(&self, entities: impl IntoIterator<Item = Entity>) -> BridgeResult<()> {
        let mut requested: BTreeMap<Iri, Roles> = BTreeMap::new();
        for entity in entities {
            if vocab::is_reserved(&entity.iri) && !entity.is_builtin() {
                return Err(ShapeError::ReservedVocabulary {
                    iri: entity.iri.to_string(),
                    role: entity.entity_type.name().to_string(),
                }
                .into());
            }
            let roles = requested.entry(entity.iri.clone()).or_default();
            *roles = *roles | Roles::of(entity.entity_type);
        }
        for (iri, wanted) in requested {
            let existing = self.reader.roles(&iri)?;
            if (existing | wanted).is_ambiguous() {
                return Err(ShapeError::RoleConflict {
                    iri: iri.to_string(),
                    existing: existing.names(),
                    requested: wanted.names(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Declare every non-builtin entity `axiom` mentions.
    pub fn declare(&self, axiom: &Axiom) -> StoreResult<()> {
        for entity in axiom.signature() {
            if !entity.is_builtin() {
                self.declare_entity(&entity)?;
            }
        }
        Ok(())
    }

    pub(crate) fn declare_entity(&self, entity: &Entity) -> StoreResult<Triple> {
        let triple = self.add(entity.iri.clone(), rdf::TYPE, Node::iri(entity.entity_type.type_iri()))?;
        self.reader.forget(&entity.iri);
        Ok(triple)
    }

    // -- operands -----------------------------------------------------------

    pub fn operand(&self, operand: &Operand) -> StoreResult<Node> {
        match operand {
            Operand::Entity(e) => Ok(Node::Iri(e.iri.clone())),
            Operand::Class(c) => self.class_expr(c),
            Operand::ObjectProperty(p) => self.object_property(p),
            Operand::DataProperty(iri) | Operand::AnnotationProperty(iri) | Operand::Iri(iri) => {
                Ok(Node::Iri(iri.clone()))
            }
            Operand::Individual(i) => Ok(individual(i)),
            Operand::Literal(lit) => Ok(Node::Literal(lit.clone())),
            Operand::DataRange(d) => self.data_range(d),
            Operand::Atoms(atoms) => {
                let nodes = atoms
                    .iter()
                    .map(|a| super::rules::write_atom(self, a))
                    .collect::<StoreResult<Vec<_>>>()?;
                self.list(nodes)
            }
        }
    }

    /// Write an `rdf:List` of `members`, returning its head.
    pub fn list(&self, members: Vec<Node>) -> StoreResult<Node> {
        let mut head = Node::iri(rdf::NIL);
        for member in members.into_iter().rev() {
            let cell = self.fresh()?;
            self.add(cell.clone(), rdf::FIRST, member)?;
            self.add(cell.clone(), rdf::REST, head)?;
            head = cell;
        }
        Ok(head)
    }

    pub fn object_property(&self, property: &ObjectPropertyExpr) -> StoreResult<Node> {
        match property {
            ObjectPropertyExpr::Named(iri) => Ok(Node::Iri(iri.clone())),
            ObjectPropertyExpr::Inverse(iri) => {
                let node = self.fresh()?;
                self.add(node.clone(), owl::INVERSE_OF, iri.clone())?;
                Ok(node)
            }
        }
    }

    fn typed_node(&self, type_iri: &str) -> StoreResult<Node> {
        let node = self.fresh()?;
        self.add(node.clone(), rdf::TYPE, Node::iri(type_iri))?;
        Ok(node)
    }

    pub fn class_expr(&self, expr: &ClassExpr) -> StoreResult<Node> {
        match expr {
            ClassExpr::Class(iri) => Ok(Node::Iri(iri.clone())),
            ClassExpr::IntersectionOf(ops) => self.class_connective(owl::INTERSECTION_OF, ops),
            ClassExpr::UnionOf(ops) => self.class_connective(owl::UNION_OF, ops),
            ClassExpr::ComplementOf(inner) => {
                let inner = self.class_expr(inner)?;
                let node = self.typed_node(owl::CLASS)?;
                self.add(node.clone(), owl::COMPLEMENT_OF, inner)?;
                Ok(node)
            }
            ClassExpr::OneOf(individuals) => {
                let list = self.list(individuals.iter().map(individual).collect())?;
                let node = self.typed_node(owl::CLASS)?;
                self.add(node.clone(), owl::ONE_OF, list)?;
                Ok(node)
            }
            ClassExpr::ObjectSomeValuesFrom(p, filler) => {
                let filler = self.class_expr(filler)?;
                self.restriction(self.object_property(p)?, owl::SOME_VALUES_FROM, filler)
            }
            ClassExpr::ObjectAllValuesFrom(p, filler) => {
                let filler = self.class_expr(filler)?;
                self.restriction(self.object_property(p)?, owl::ALL_VALUES_FROM, filler)
            }
            ClassExpr::ObjectHasValue(p, i) => {
                self.restriction(self.object_property(p)?, owl::HAS_VALUE, individual(i))
            }
            ClassExpr::ObjectHasSelf(p) => self.restriction(
                self.object_property(p)?,
                owl::HAS_SELF,
                Node::Literal(Literal::boolean(true)),
            ),
            ClassExpr::ObjectCardinality {
                bound,
                n,
                property,
                filler,
            } => {
                let on = self.object_property(property)?;
                match filler {
                    Some(c) => {
                        let filler = self.class_expr(c)?;
                        let node = self.restriction(on, bound.qualified_predicate(), Literal::non_negative(*n))?;
                        self.add(node.clone(), owl::ON_CLASS, filler)?;
                        Ok(node)
                    }
                    None => self.restriction(on, bound.unqualified_predicate(), Literal::non_negative(*n)),
                }
            }
            ClassExpr::DataSomeValuesFrom(p, range) => {
                let range = self.data_range(range)?;
                self.restriction(Node::Iri(p.clone()), owl::SOME_VALUES_FROM, range)
            }
            ClassExpr::DataAllValuesFrom(p, range) => {
                let range = self.data_range(range)?;
                self.restriction(Node::Iri(p.clone()), owl::ALL_VALUES_FROM, range)
            }
            ClassExpr::DataHasValue(p, value) => {
                self.restriction(Node::Iri(p.clone()), owl::HAS_VALUE, value.clone())
            }
            ClassExpr::DataCardinality {
                bound,
                n,
                property,
                filler,
            } => {
                let on = Node::Iri(property.clone());
                match filler {
                    Some(d) => {
                        let filler = self.data_range(d)?;
                        let node = self.restriction(on, bound.qualified_predicate(), Literal::non_negative(*n))?;
                        self.add(node.clone(), owl::ON_DATA_RANGE, filler)?;
                        Ok(node)
                    }
                    None => self.restriction(on, bound.unqualified_predicate(), Literal::non_negative(*n)),
                }
            }
        }
    }

    fn class_connective(&self, predicate: &str, operands: &[ClassExpr]) -> StoreResult<Node> {
        let members = operands
            .iter()
            .map(|c| self.class_expr(c))
            .collect::<StoreResult<Vec<_>>>()?;
        let list = self.list(members)?;
        let node = self.typed_node(owl::CLASS)?;
        self.add(node.clone(), predicate, list)?;
        Ok(node)
    }

    fn restriction(&self, on: Node, predicate: &str, value: impl Into<Node>) -> StoreResult<Node> {
        let node = self.typed_node(owl::RESTRICTION)?;
        self.add(node.clone(), owl::ON_PROPERTY, on)?;
        self.add(node.clone(), predicate, value)?;
        Ok(node)
    }

    pub fn data_range(&self, range: &DataRange) -> StoreResult<Node> {
        match range {
            DataRange::Datatype(iri) => Ok(Node::Iri(iri.clone())),
            DataRange::IntersectionOf(ops) => self.range_connective(owl::INTERSECTION_OF, ops),
            DataRange::UnionOf(ops) => self.range_connective(owl::UNION_OF, ops),
            DataRange::ComplementOf(inner) => {
                let inner = self.data_range(inner)?;
                let node = self.typed_node(rdfs::DATATYPE)?;
                self.add(node.clone(), owl::DATATYPE_COMPLEMENT_OF, inner)?;
                Ok(node)
            }
            DataRange::OneOf(literals) => {
                let list = self.list(literals.iter().cloned().map(Node::Literal).collect())?;
                let node = self.typed_node(rdfs::DATATYPE)?;
                self.add(node.clone(), owl::ONE_OF, list)?;
                Ok(node)
            }
            DataRange::Restriction(datatype, facets) => {
                let mut cells = Vec::with_capacity(facets.len());
                for facet in facets {
                    let cell = self.fresh()?;
                    self.add(cell.clone(), facet.facet.clone(), facet.value.clone())?;
                    cells.push(cell);
                }
                let list = self.list(cells)?;
                let node = self.typed_node(rdfs::DATATYPE)?;
                self.add(node.clone(), owl::ON_DATATYPE, datatype.clone())?;
                self.add(node.clone(), owl::WITH_RESTRICTIONS, list)?;
                Ok(node)
            }
        }
    }

    fn range_connective(&self, predicate: &str, operands: &[DataRange]) -> StoreResult<Node> {
        let members = operands
            .iter()
            .map(|d| self.data_range(d))
            .collect::<StoreResult<Vec<_>>>()?;
        let list = self.list(members)?;
        let node = self.typed_node(rdfs::DATATYPE)?;
        self.add(node.clone(), predicate, list)?;
        Ok(node)
    }
}

/// Anonymous individuals keep their own label.
pub(crate) fn individual(individual: &Individual) -> Node {
    match individual {
        Individual::Named(iri) => Node::Iri(iri.clone()),
        Individual::Anonymous(id) => Node::Blank(id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::error::BridgeError;
    use crate::store::MemStore;
    use std::sync::Arc;

    fn reader() -> GraphReader {
        GraphReader::new(Arc::new(MemStore::new()), Arc::new(BridgeConfig::default()))
    }

    #[test]
    fn written_expressions_read_back() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        let p = ObjectPropertyExpr::inverse("http://ex/p");
        let expr = ClassExpr::intersection_of([
            ClassExpr::class("http://ex/A"),
            ClassExpr::ObjectCardinality {
                bound: crate::model::Bound::Min,
                n: 2,
                property: p,
                filler: Some(Box::new(ClassExpr::class("http://ex/B"))),
            },
        ]);
        let axiom = Axiom::sub_class_of(expr.clone(), ClassExpr::thing());
        writer.declare(&axiom).unwrap();
        let node = writer.class_expr(&expr).unwrap();
        let read = reader.detached().class_expr(&node).unwrap().unwrap();
        assert_eq!(read.value(), &expr);
    }

    #[test]
    fn lists_get_fresh_cells() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        let a = writer.list(vec![Node::iri("http://ex/a")]).unwrap();
        let b = writer.list(vec![Node::iri("http://ex/a")]).unwrap();
        assert_ne!(a, b);
        assert!(writer.list(Vec::new()).unwrap().is(rdf::NIL));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        let axiom = Axiom::sub_class_of(ClassExpr::class(owl::RESTRICTION), ClassExpr::thing());
        let err = writer.validate(&axiom).unwrap_err();
        assert!(matches!(err, BridgeError::Shape(ShapeError::ReservedVocabulary { .. })));
    }

    #[test]
    fn role_conflicts_are_rejected_before_writing() {
        let reader = reader();
        let writer = GraphWriter::new(&reader);
        writer.declare_entity(&Entity::data_property("http://ex/p")).unwrap();
        let axiom = Axiom::characteristic(
            crate::model::AxiomKind::TransitiveObjectProperty,
            Operand::ObjectProperty(ObjectPropertyExpr::named("http://ex/p")),
        )
        .unwrap();
        let before = reader.store().len().unwrap();
        let err = writer.validate(&axiom).unwrap_err();
        assert!(matches!(err, BridgeError::Shape(ShapeError::RoleConflict { .. })));
        assert_eq!(reader.store().len().unwrap(), before);
    }
}
