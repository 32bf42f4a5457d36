//! Logical-object model: statements (axioms), their operands and annotations.
//!
//! An [`Axiom`] is a kind tag plus a validated operand list. Construction
//! goes through [`Axiom::new`] (or the typed helpers), which checks the kind's
//! [`Arity`] and normalizes every unordered operand set and the annotation
//! set, so two statements with the same meaning compare equal.

pub mod expr;
pub mod kind;
pub mod swrl;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::term::{BlankId, Iri, Literal};

pub use expr::{Bound, ClassExpr, DataRange, Entity, EntityType, Facet, Individual, ObjectPropertyExpr};
pub use kind::{Arity, AxiomKind, OperandType};
pub use swrl::{Arg, Atom};

use expr::{sorted, spaced};

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

/// One operand of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operand {
    Entity(Entity),
    Class(ClassExpr),
    ObjectProperty(ObjectPropertyExpr),
    DataProperty(Iri),
    AnnotationProperty(Iri),
    Individual(Individual),
    Literal(Literal),
    DataRange(DataRange),
    Iri(Iri),
    Atoms(Vec<Atom>),
}

impl Operand {
    pub fn normalized(self) -> Self {
        match self {
            Self::Class(c) => Self::Class(c.normalized()),
            Self::DataRange(d) => Self::DataRange(d.normalized()),
            Self::Atoms(atoms) => Self::Atoms(sorted(atoms.into_iter().map(Atom::normalized))),
            other => other,
        }
    }

    /// Directly nested operands, for structural decomposition.
    pub fn parts(&self) -> Vec<Operand> {
        match self {
            Self::Class(c) => match c {
                ClassExpr::Class(_) => Vec::new(),
                ClassExpr::IntersectionOf(ops) | ClassExpr::UnionOf(ops) => {
                    ops.iter().cloned().map(Self::Class).collect()
                }
                ClassExpr::ComplementOf(op) => vec![Self::Class((**op).clone())],
                ClassExpr::OneOf(inds) => inds.iter().cloned().map(Self::Individual).collect(),
                ClassExpr::ObjectSomeValuesFrom(p, f) | ClassExpr::ObjectAllValuesFrom(p, f) => {
                    vec![Self::ObjectProperty(p.clone()), Self::Class((**f).clone())]
                }
                ClassExpr::ObjectHasValue(p, i) => {
                    vec![Self::ObjectProperty(p.clone()), Self::Individual(i.clone())]
                }
                ClassExpr::ObjectHasSelf(p) => vec![Self::ObjectProperty(p.clone())],
                ClassExpr::ObjectCardinality {
                    property, filler, ..
                } => std::iter::once(Self::ObjectProperty(property.clone()))
                    .chain(filler.iter().map(|c| Self::Class((**c).clone())))
                    .collect(),
                ClassExpr::DataSomeValuesFrom(p, d) | ClassExpr::DataAllValuesFrom(p, d) => {
                    vec![Self::DataProperty(p.clone()), Self::DataRange((**d).clone())]
                }
                ClassExpr::DataHasValue(p, v) => {
                    vec![Self::DataProperty(p.clone()), Self::Literal(v.clone())]
                }
                ClassExpr::DataCardinality {
                    property, filler, ..
                } => std::iter::once(Self::DataProperty(property.clone()))
                    .chain(filler.iter().map(|d| Self::DataRange((**d).clone())))
                    .collect(),
            },
            Self::DataRange(d) => match d {
                DataRange::Datatype(_) => Vec::new(),
                DataRange::IntersectionOf(ops) | DataRange::UnionOf(ops) => {
                    ops.iter().cloned().map(Self::DataRange).collect()
                }
                DataRange::ComplementOf(op) => vec![Self::DataRange((**op).clone())],
                DataRange::OneOf(lits) => lits.iter().cloned().map(Self::Literal).collect(),
                DataRange::Restriction(dt, facets) => std::iter::once(Self::DataRange(DataRange::Datatype(dt.clone())))
                    .chain(facets.iter().map(|f| Self::Literal(f.value.clone())))
                    .collect(),
            },
            Self::ObjectProperty(ObjectPropertyExpr::Inverse(p)) => {
                vec![Self::ObjectProperty(ObjectPropertyExpr::Named(p.clone()))]
            }
            _ => Vec::new(),
        }
    }

    fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Entity(e) => {
                out.insert(e.clone());
            }
            Self::Class(c) => c.collect_entities(out),
            Self::ObjectProperty(p) => {
                out.insert(Entity::object_property(p.property().clone()));
            }
            Self::DataProperty(p) => {
                out.insert(Entity::data_property(p.clone()));
            }
            Self::AnnotationProperty(p) => {
                out.insert(Entity::annotation_property(p.clone()));
            }
            Self::Individual(Individual::Named(iri)) => {
                out.insert(Entity::individual(iri.clone()));
            }
            Self::DataRange(d) => d.collect_entities(out),
            Self::Atoms(atoms) => atoms.iter().for_each(|a| a.collect_entities(out)),
            Self::Individual(Individual::Anonymous(_)) | Self::Literal(_) | Self::Iri(_) => {}
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(e) => e.fmt(f),
            Self::Class(c) => c.fmt(f),
            Self::ObjectProperty(p) => p.fmt(f),
            Self::DataProperty(p) | Self::AnnotationProperty(p) | Self::Iri(p) => p.fmt(f),
            Self::Individual(i) => i.fmt(f),
            Self::Literal(l) => l.fmt(f),
            Self::DataRange(d) => d.fmt(f),
            Self::Atoms(atoms) => write!(f, "({})", spaced(atoms)),
        }
    }
}

impl From<ClassExpr> for Operand {
    fn from(c: ClassExpr) -> Self {
        Self::Class(c)
    }
}

impl From<ObjectPropertyExpr> for Operand {
    fn from(p: ObjectPropertyExpr) -> Self {
        Self::ObjectProperty(p)
    }
}

impl From<Individual> for Operand {
    fn from(i: Individual) -> Self {
        Self::Individual(i)
    }
}

impl From<DataRange> for Operand {
    fn from(d: DataRange) -> Self {
        Self::DataRange(d)
    }
}

impl From<Literal> for Operand {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<AnnotationValue> for Operand {
    fn from(v: AnnotationValue) -> Self {
        match v {
            AnnotationValue::Iri(iri) => Self::Iri(iri),
            AnnotationValue::Literal(lit) => Self::Literal(lit),
            AnnotationValue::Anonymous(id) => Self::Individual(Individual::Anonymous(id)),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// Object of an annotation: an IRI, a literal, or an anonymous individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationValue {
    Iri(Iri),
    Literal(Literal),
    Anonymous(BlankId),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
            Self::Anonymous(id) => id.fmt(f),
        }
    }
}

impl From<Literal> for AnnotationValue {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<Iri> for AnnotationValue {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

/// A property/value pair attached to a statement, an ontology, or another
/// annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    property: Iri,
    value: AnnotationValue,
    annotations: Vec<Annotation>,
}

impl Annotation {
    pub fn new(property: impl Into<Iri>, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations = sorted(self.annotations.into_iter().chain(annotations));
        self
    }

    pub fn property(&self) -> &Iri {
        &self.property
    }

    pub fn value(&self) -> &AnnotationValue {
        &self.value
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        out.insert(Entity::annotation_property(self.property.clone()));
        self.annotations.iter().for_each(|a| a.collect_entities(out));
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Annotation(")?;
        for nested in &self.annotations {
            write!(f, "{nested} ")?;
        }
        write!(f, "{} {})", self.property, self.value)
    }
}

// ---------------------------------------------------------------------------
// Axioms
// ---------------------------------------------------------------------------

/// A statement: kind, operands, and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "AxiomParts")]
pub struct Axiom {
    kind: AxiomKind,
    operands: Vec<Operand>,
    annotations: Vec<Annotation>,
}

/// Serialized form of an [`Axiom`]; deserializing goes through
/// [`Axiom::new`] so the signature is checked.
#[derive(Deserialize)]
struct AxiomParts {
    kind: AxiomKind,
    operands: Vec<Operand>,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

impl TryFrom<AxiomParts> for Axiom {
    type Error = ShapeError;

    fn try_from(parts: AxiomParts) -> Result<Self, ShapeError> {
        Axiom::new(parts.kind, parts.operands, parts.annotations)
    }
}

impl Axiom {
    /// Validate `operands` against the kind's signature and normalize.
    pub fn new(
        kind: AxiomKind,
        operands: impl IntoIterator<Item = Operand>,
        annotations: impl IntoIterator<Item = Annotation>,
    ) -> Result<Self, ShapeError> {
        let operands: Vec<Operand> = operands.into_iter().map(Operand::normalized).collect();
        let operands = check_signature(kind, operands)?;
        Ok(Self {
            kind,
            operands,
            annotations: sorted(annotations),
        })
    }

    /// Bypasses the signature check.
    #[cfg(test)]
    pub(crate) fn unchecked(kind: AxiomKind, operands: Vec<Operand>) -> Self {
        Self {
            kind,
            operands,
            annotations: Vec::new(),
        }
    }

    /// Check the operands against the kind's signature.
    pub fn check(&self) -> Result<(), ShapeError> {
        check_signature(self.kind, self.operands.clone()).map(|_| ())
    }

    pub fn kind(&self) -> AxiomKind {
        self.kind
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn without_annotations(&self) -> Self {
        Self {
            kind: self.kind,
            operands: self.operands.clone(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations = sorted(self.annotations.into_iter().chain(annotations));
        self
    }

    /// Every named entity the statement mentions, annotations included.
    pub fn signature(&self) -> BTreeSet<Entity> {
        let mut out = BTreeSet::new();
        self.operands.iter().for_each(|o| o.collect_entities(&mut out));
        self.annotations.iter().for_each(|a| a.collect_entities(&mut out));
        out
    }

    /// Split a symmetric n-ary statement into its pairwise statements.
    /// Other statements are returned unchanged.
    pub fn as_pairwise(&self) -> Vec<Axiom> {
        if !self.kind.signature().is_symmetric() || self.operands.len() <= 2 {
            return vec![self.clone()];
        }
        let mut out = Vec::new();
        for (i, a) in self.operands.iter().enumerate() {
            for b in &self.operands[i + 1..] {
                out.push(Self {
                    kind: self.kind,
                    operands: vec![a.clone(), b.clone()],
                    annotations: self.annotations.clone(),
                });
            }
        }
        out
    }

    // -- typed constructors -------------------------------------------------

    pub fn declaration(entity: Entity) -> Self {
        Self::assemble(AxiomKind::Declaration, vec![Operand::Entity(entity)])
    }

    pub fn sub_class_of(sub: ClassExpr, sup: ClassExpr) -> Self {
        Self::assemble(AxiomKind::SubClassOf, vec![sub.into(), sup.into()])
    }

    pub fn equivalent_classes(classes: impl IntoIterator<Item = ClassExpr>) -> Result<Self, ShapeError> {
        Self::new(AxiomKind::EquivalentClasses, classes.into_iter().map(Operand::from), [])
    }

    pub fn disjoint_classes(classes: impl IntoIterator<Item = ClassExpr>) -> Result<Self, ShapeError> {
        Self::new(AxiomKind::DisjointClasses, classes.into_iter().map(Operand::from), [])
    }

    pub fn disjoint_union(
        class: impl Into<Iri>,
        parts: impl IntoIterator<Item = ClassExpr>,
    ) -> Result<Self, ShapeError> {
        let operands = std::iter::once(Operand::Class(ClassExpr::Class(class.into())))
            .chain(parts.into_iter().map(Operand::from));
        Self::new(AxiomKind::DisjointUnion, operands, [])
    }

    pub fn sub_object_property_of(sub: ObjectPropertyExpr, sup: ObjectPropertyExpr) -> Self {
        Self::assemble(AxiomKind::SubObjectPropertyOf, vec![sub.into(), sup.into()])
    }

    pub fn sub_data_property_of(sub: impl Into<Iri>, sup: impl Into<Iri>) -> Self {
        Self::assemble(
            AxiomKind::SubDataPropertyOf,
            vec![Operand::DataProperty(sub.into()), Operand::DataProperty(sup.into())],
        )
    }

    pub fn sub_annotation_property_of(sub: impl Into<Iri>, sup: impl Into<Iri>) -> Self {
        Self::assemble(
            AxiomKind::SubAnnotationPropertyOf,
            vec![
                Operand::AnnotationProperty(sub.into()),
                Operand::AnnotationProperty(sup.into()),
            ],
        )
    }

    pub fn sub_property_chain_of(
        chain: impl IntoIterator<Item = ObjectPropertyExpr>,
        sup: ObjectPropertyExpr,
    ) -> Result<Self, ShapeError> {
        let operands = std::iter::once(Operand::from(sup)).chain(chain.into_iter().map(Operand::from));
        Self::new(AxiomKind::SubPropertyChainOf, operands, [])
    }

    pub fn inverse_object_properties(a: impl Into<Iri>, b: impl Into<Iri>) -> Self {
        Self::assemble(
            AxiomKind::InverseObjectProperties,
            sorted([
                Operand::ObjectProperty(ObjectPropertyExpr::Named(a.into())),
                Operand::ObjectProperty(ObjectPropertyExpr::Named(b.into())),
            ]),
        )
    }

    pub fn object_property_domain(property: ObjectPropertyExpr, domain: ClassExpr) -> Self {
        Self::assemble(AxiomKind::ObjectPropertyDomain, vec![property.into(), domain.into()])
    }

    pub fn object_property_range(property: ObjectPropertyExpr, range: ClassExpr) -> Self {
        Self::assemble(AxiomKind::ObjectPropertyRange, vec![property.into(), range.into()])
    }

    pub fn data_property_domain(property: impl Into<Iri>, domain: ClassExpr) -> Self {
        Self::assemble(
            AxiomKind::DataPropertyDomain,
            vec![Operand::DataProperty(property.into()), domain.into()],
        )
    }

    pub fn data_property_range(property: impl Into<Iri>, range: DataRange) -> Self {
        Self::assemble(
            AxiomKind::DataPropertyRange,
            vec![Operand::DataProperty(property.into()), range.into()],
        )
    }

    /// A single-operand property characteristic, such as
    /// [`AxiomKind::TransitiveObjectProperty`].
    pub fn characteristic(kind: AxiomKind, property: Operand) -> Result<Self, ShapeError> {
        Self::new(kind, [property], [])
    }

    pub fn class_assertion(class: ClassExpr, individual: Individual) -> Self {
        Self::assemble(AxiomKind::ClassAssertion, vec![class.into(), individual.into()])
    }

    pub fn object_property_assertion(
        property: impl Into<Iri>,
        subject: Individual,
        object: Individual,
    ) -> Self {
        Self::assemble(
            AxiomKind::ObjectPropertyAssertion,
            vec![
                Operand::ObjectProperty(ObjectPropertyExpr::Named(property.into())),
                subject.into(),
                object.into(),
            ],
        )
    }

    pub fn data_property_assertion(property: impl Into<Iri>, subject: Individual, value: Literal) -> Self {
        Self::assemble(
            AxiomKind::DataPropertyAssertion,
            vec![Operand::DataProperty(property.into()), subject.into(), value.into()],
        )
    }

    pub fn negative_object_property_assertion(
        property: ObjectPropertyExpr,
        subject: Individual,
        object: Individual,
    ) -> Self {
        Self::assemble(
            AxiomKind::NegativeObjectPropertyAssertion,
            vec![property.into(), subject.into(), object.into()],
        )
    }

    pub fn negative_data_property_assertion(
        property: impl Into<Iri>,
        subject: Individual,
        value: Literal,
    ) -> Self {
        Self::assemble(
            AxiomKind::NegativeDataPropertyAssertion,
            vec![Operand::DataProperty(property.into()), subject.into(), value.into()],
        )
    }

    pub fn same_individual(individuals: impl IntoIterator<Item = Individual>) -> Result<Self, ShapeError> {
        Self::new(AxiomKind::SameIndividual, individuals.into_iter().map(Operand::from), [])
    }

    pub fn different_individuals(
        individuals: impl IntoIterator<Item = Individual>,
    ) -> Result<Self, ShapeError> {
        Self::new(
            AxiomKind::DifferentIndividuals,
            individuals.into_iter().map(Operand::from),
            [],
        )
    }

    pub fn has_key(class: ClassExpr, properties: impl IntoIterator<Item = Operand>) -> Result<Self, ShapeError> {
        Self::new(
            AxiomKind::HasKey,
            std::iter::once(Operand::from(class)).chain(properties),
            [],
        )
    }

    pub fn datatype_definition(datatype: impl Into<Iri>, range: DataRange) -> Self {
        Self::assemble(
            AxiomKind::DatatypeDefinition,
            vec![DataRange::Datatype(datatype.into()).into(), range.into()],
        )
    }

    pub fn annotation_assertion(
        property: impl Into<Iri>,
        subject: AnnotationValue,
        value: impl Into<AnnotationValue>,
    ) -> Result<Self, ShapeError> {
        let value: AnnotationValue = value.into();
        Self::new(
            AxiomKind::AnnotationAssertion,
            [
                Operand::AnnotationProperty(property.into()),
                Operand::from(subject),
                Operand::from(value),
            ],
            [],
        )
    }

    pub fn swrl_rule(body: impl IntoIterator<Item = Atom>, head: impl IntoIterator<Item = Atom>) -> Self {
        Self::assemble(
            AxiomKind::SwrlRule,
            vec![
                Operand::Atoms(body.into_iter().collect()),
                Operand::Atoms(head.into_iter().collect()),
            ],
        )
    }

    /// Build from operands that satisfy the signature by construction.
    fn assemble(kind: AxiomKind, operands: Vec<Operand>) -> Self {
        Self {
            kind,
            operands: operands.into_iter().map(Operand::normalized).collect(),
            annotations: Vec::new(),
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        let mut first = true;
        for a in &self.annotations {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            a.fmt(f)?;
        }
        for o in &self.operands {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            o.fmt(f)?;
        }
        f.write_str(")")
    }
}

fn check_signature(kind: AxiomKind, mut operands: Vec<Operand>) -> Result<Vec<Operand>, ShapeError> {
    let arity = kind.signature();
    let arity_error = |actual: usize| ShapeError::Arity {
        kind: kind.name().to_string(),
        expected: arity.describe(),
        actual,
    };
    let head = arity.head();
    if operands.len() < head.len() {
        return Err(arity_error(operands.len()));
    }
    let check = |position: usize, ty: OperandType, operand: &Operand| {
        if ty.accepts(operand) {
            Ok(())
        } else {
            Err(ShapeError::OperandType {
                kind: kind.name().to_string(),
                position,
                expected: ty.name().to_string(),
            })
        }
    };
    for (i, ty) in head.iter().enumerate() {
        check(i, *ty, &operands[i])?;
    }

    match arity {
        Arity::Fixed(types) => {
            if operands.len() != types.len() {
                return Err(arity_error(operands.len()));
            }
        }
        Arity::Set { item, min, max, .. } => {
            let tail = sorted(operands.split_off(head.len()));
            if tail.len() < min || max.is_some_and(|max| tail.len() > max) {
                return Err(arity_error(head.len() + tail.len()));
            }
            for (i, operand) in tail.iter().enumerate() {
                check(head.len() + i, item, operand)?;
            }
            operands.extend(tail);
        }
        Arity::Sequence { item, min, .. } => {
            let tail = &operands[head.len()..];
            if tail.len() < min {
                return Err(arity_error(operands.len()));
            }
            for (i, operand) in tail.iter().enumerate() {
                check(head.len() + i, item, operand)?;
            }
        }
    }
    Ok(operands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::rdfs;

    fn class(name: &str) -> ClassExpr {
        ClassExpr::class(format!("http://ex/{name}"))
    }

    #[test]
    fn deserializing_checks_the_signature() {
        let empty = r#"{"kind":"SubClassOf","operands":[],"annotations":[]}"#;
        let err = serde_json::from_str::<Axiom>(empty).unwrap_err();
        assert!(err.to_string().contains("got 0"), "{err}");

        let axiom = Axiom::sub_class_of(class("A"), class("B"));
        let json = serde_json::to_string(&axiom).unwrap();
        assert_eq!(serde_json::from_str::<Axiom>(&json).unwrap(), axiom);
    }

    #[test]
    fn check_rejects_operands_of_the_wrong_type() {
        let axiom = Axiom::unchecked(AxiomKind::SubClassOf, vec![Operand::Literal(Literal::string("x"))]);
        assert!(matches!(axiom.check(), Err(ShapeError::Arity { actual: 1, .. })));
        let swapped = Axiom::unchecked(
            AxiomKind::ClassAssertion,
            vec![
                Operand::Individual(Individual::named("http://ex/i")),
                Operand::Class(class("C")),
            ],
        );
        assert!(matches!(swapped.check(), Err(ShapeError::OperandType { position: 0, .. })));
        assert!(Axiom::sub_class_of(class("A"), class("B")).check().is_ok());
    }

    #[test]
    fn set_operands_are_normalized() {
        let a = Axiom::disjoint_classes([class("C"), class("A"), class("B"), class("A")]).unwrap();
        let b = Axiom::disjoint_classes([class("A"), class("B"), class("C")]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.operands().len(), 3);
    }

    #[test]
    fn sequence_operands_keep_order() {
        let p = |n: &str| ObjectPropertyExpr::named(format!("http://ex/{n}"));
        let a = Axiom::sub_property_chain_of([p("a"), p("b")], p("s")).unwrap();
        let b = Axiom::sub_property_chain_of([p("b"), p("a")], p("s")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn arity_is_checked() {
        let err = Axiom::disjoint_classes([class("A")]).unwrap_err();
        assert!(matches!(err, ShapeError::Arity { actual: 1, .. }));
        let err = Axiom::new(AxiomKind::SubClassOf, [Operand::Class(class("A"))], []).unwrap_err();
        assert!(matches!(err, ShapeError::Arity { .. }));
    }

    #[test]
    fn operand_types_are_checked() {
        let err = Axiom::new(
            AxiomKind::SubClassOf,
            [Operand::Class(class("A")), Operand::Literal(Literal::string("x"))],
            [],
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::OperandType { position: 1, .. }));
    }

    #[test]
    fn disjoint_union_needs_named_head() {
        let err = Axiom::new(
            AxiomKind::DisjointUnion,
            [
                Operand::Class(ClassExpr::complement_of(class("A"))),
                Operand::Class(class("B")),
                Operand::Class(class("C")),
            ],
            [],
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::OperandType { position: 0, .. }));
    }

    #[test]
    fn annotations_are_a_set() {
        let note = |s: &str| Annotation::new(rdfs::COMMENT, Literal::string(s));
        let a = Axiom::sub_class_of(class("A"), class("B")).with_annotations([note("y"), note("x")]);
        let b = Axiom::sub_class_of(class("A"), class("B")).with_annotations([note("x"), note("y"), note("x")]);
        assert_eq!(a, b);
        assert_ne!(a, a.without_annotations());
    }

    #[test]
    fn signature_covers_operands_and_annotations() {
        let axiom = Axiom::sub_class_of(class("A"), class("B"))
            .with_annotations([Annotation::new("http://ex/note", Literal::string("x"))]);
        let sig = axiom.signature();
        assert!(sig.contains(&Entity::class("http://ex/A")));
        assert!(sig.contains(&Entity::annotation_property("http://ex/note")));
    }

    #[test]
    fn pairwise_split() {
        let axiom = Axiom::equivalent_classes([class("A"), class("B"), class("C")]).unwrap();
        let pairs = axiom.as_pairwise();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.operands().len() == 2));
        let sub = Axiom::sub_class_of(class("A"), class("B"));
        assert_eq!(sub.as_pairwise(), vec![sub]);
    }

    #[test]
    fn display_is_functional_syntax() {
        let axiom = Axiom::sub_class_of(class("A"), class("B"));
        assert_eq!(axiom.to_string(), "SubClassOf(<http://ex/A> <http://ex/B>)");
    }
}
