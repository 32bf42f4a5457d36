//! Entities, individuals, property expressions, class expressions and data ranges.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::{BlankId, Iri, Literal};
use crate::vocab::{self, owl, rdfs};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// The six kinds of named entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Class,
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Class,
        EntityType::Datatype,
        EntityType::ObjectProperty,
        EntityType::DataProperty,
        EntityType::AnnotationProperty,
        EntityType::NamedIndividual,
    ];

    /// The `rdf:type` object declaring an entity of this type.
    pub fn type_iri(self) -> &'static str {
        match self {
            Self::Class => owl::CLASS,
            Self::Datatype => rdfs::DATATYPE,
            Self::ObjectProperty => owl::OBJECT_PROPERTY,
            Self::DataProperty => owl::DATATYPE_PROPERTY,
            Self::AnnotationProperty => owl::ANNOTATION_PROPERTY,
            Self::NamedIndividual => owl::NAMED_INDIVIDUAL,
        }
    }

    pub fn from_type_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.type_iri() == iri)
    }

    /// Returns `true` if `iri` is a builtin of this type and needs no declaration.
    pub fn is_builtin(self, iri: &Iri) -> bool {
        match self {
            Self::Class => vocab::is_builtin_class(iri),
            Self::Datatype => vocab::is_builtin_datatype(iri),
            Self::ObjectProperty => vocab::is_builtin_object_property(iri),
            Self::DataProperty => vocab::is_builtin_data_property(iri),
            Self::AnnotationProperty => vocab::is_builtin_annotation_property(iri),
            Self::NamedIndividual => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Datatype => "Datatype",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
            Self::AnnotationProperty => "AnnotationProperty",
            Self::NamedIndividual => "NamedIndividual",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed named entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    pub iri: Iri,
}

impl Entity {
    pub fn new(entity_type: EntityType, iri: impl Into<Iri>) -> Self {
        Self {
            entity_type,
            iri: iri.into(),
        }
    }

    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::Class, iri)
    }

    pub fn object_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::ObjectProperty, iri)
    }

    pub fn data_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::DataProperty, iri)
    }

    pub fn annotation_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::AnnotationProperty, iri)
    }

    pub fn datatype(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::Datatype, iri)
    }

    pub fn individual(iri: impl Into<Iri>) -> Self {
        Self::new(EntityType::NamedIndividual, iri)
    }

    pub fn is_builtin(&self) -> bool {
        self.entity_type.is_builtin(&self.iri)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.entity_type, self.iri)
    }
}

// ---------------------------------------------------------------------------
// Individuals and property expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Individual {
    Named(Iri),
    Anonymous(BlankId),
}

impl Individual {
    pub fn named(iri: impl Into<Iri>) -> Self {
        Self::Named(iri.into())
    }

    fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        if let Self::Named(iri) = self {
            out.insert(Entity::individual(iri.clone()));
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => iri.fmt(f),
            Self::Anonymous(id) => id.fmt(f),
        }
    }
}

/// A named object property or the inverse of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectPropertyExpr {
    Named(Iri),
    Inverse(Iri),
}

impl ObjectPropertyExpr {
    pub fn named(iri: impl Into<Iri>) -> Self {
        Self::Named(iri.into())
    }

    pub fn inverse(iri: impl Into<Iri>) -> Self {
        Self::Inverse(iri.into())
    }

    /// The underlying named property.
    pub fn property(&self) -> &Iri {
        match self {
            Self::Named(iri) | Self::Inverse(iri) => iri,
        }
    }

    fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        out.insert(Entity::object_property(self.property().clone()));
    }
}

impl fmt::Display for ObjectPropertyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => iri.fmt(f),
            Self::Inverse(iri) => write!(f, "ObjectInverseOf({iri})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Class expressions
// ---------------------------------------------------------------------------

/// Cardinality restriction bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bound {
    Min,
    Max,
    Exact,
}

impl Bound {
    pub const ALL: [Bound; 3] = [Bound::Min, Bound::Max, Bound::Exact];

    pub fn unqualified_predicate(self) -> &'static str {
        match self {
            Self::Min => owl::MIN_CARDINALITY,
            Self::Max => owl::MAX_CARDINALITY,
            Self::Exact => owl::CARDINALITY,
        }
    }

    pub fn qualified_predicate(self) -> &'static str {
        match self {
            Self::Min => owl::MIN_QUALIFIED_CARDINALITY,
            Self::Max => owl::MAX_QUALIFIED_CARDINALITY,
            Self::Exact => owl::QUALIFIED_CARDINALITY,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Exact => "Exact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassExpr {
    Class(Iri),
    IntersectionOf(Vec<ClassExpr>),
    UnionOf(Vec<ClassExpr>),
    ComplementOf(Box<ClassExpr>),
    OneOf(Vec<Individual>),
    ObjectSomeValuesFrom(ObjectPropertyExpr, Box<ClassExpr>),
    ObjectAllValuesFrom(ObjectPropertyExpr, Box<ClassExpr>),
    ObjectHasValue(ObjectPropertyExpr, Individual),
    ObjectHasSelf(ObjectPropertyExpr),
    ObjectCardinality {
        bound: Bound,
        n: u32,
        property: ObjectPropertyExpr,
        filler: Option<Box<ClassExpr>>,
    },
    DataSomeValuesFrom(Iri, Box<DataRange>),
    DataAllValuesFrom(Iri, Box<DataRange>),
    DataHasValue(Iri, Literal),
    DataCardinality {
        bound: Bound,
        n: u32,
        property: Iri,
        filler: Option<Box<DataRange>>,
    },
}

impl ClassExpr {
    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::Class(iri.into())
    }

    pub fn thing() -> Self {
        Self::class(owl::THING)
    }

    pub fn intersection_of(operands: impl IntoIterator<Item = ClassExpr>) -> Self {
        Self::IntersectionOf(sorted(operands))
    }

    pub fn union_of(operands: impl IntoIterator<Item = ClassExpr>) -> Self {
        Self::UnionOf(sorted(operands))
    }

    pub fn complement_of(operand: ClassExpr) -> Self {
        Self::ComplementOf(Box::new(operand))
    }

    pub fn one_of(individuals: impl IntoIterator<Item = Individual>) -> Self {
        Self::OneOf(sorted(individuals))
    }

    pub fn some_values_from(property: ObjectPropertyExpr, filler: ClassExpr) -> Self {
        Self::ObjectSomeValuesFrom(property, Box::new(filler))
    }

    pub fn all_values_from(property: ObjectPropertyExpr, filler: ClassExpr) -> Self {
        Self::ObjectAllValuesFrom(property, Box::new(filler))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            Self::Class(iri) => Some(iri),
            _ => None,
        }
    }

    /// Sort and deduplicate every unordered operand list, recursively.
    pub fn normalized(self) -> Self {
        match self {
            Self::IntersectionOf(ops) => Self::intersection_of(ops.into_iter().map(Self::normalized)),
            Self::UnionOf(ops) => Self::union_of(ops.into_iter().map(Self::normalized)),
            Self::ComplementOf(op) => Self::complement_of(op.normalized()),
            Self::OneOf(inds) => Self::one_of(inds),
            Self::ObjectSomeValuesFrom(p, c) => Self::some_values_from(p, c.normalized()),
            Self::ObjectAllValuesFrom(p, c) => Self::all_values_from(p, c.normalized()),
            Self::ObjectCardinality {
                bound,
                n,
                property,
                filler,
            } => Self::ObjectCardinality {
                bound,
                n,
                property,
                filler: filler.map(|c| Box::new(c.normalized())),
            },
            Self::DataSomeValuesFrom(p, d) => Self::DataSomeValuesFrom(p, Box::new(d.normalized())),
            Self::DataAllValuesFrom(p, d) => Self::DataAllValuesFrom(p, Box::new(d.normalized())),
            Self::DataCardinality {
                bound,
                n,
                property,
                filler,
            } => Self::DataCardinality {
                bound,
                n,
                property,
                filler: filler.map(|d| Box::new(d.normalized())),
            },
            other => other,
        }
    }

    pub(crate) fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Class(iri) => {
                out.insert(Entity::class(iri.clone()));
            }
            Self::IntersectionOf(ops) | Self::UnionOf(ops) => {
                ops.iter().for_each(|c| c.collect_entities(out));
            }
            Self::ComplementOf(c) => c.collect_entities(out),
            Self::OneOf(inds) => inds.iter().for_each(|i| i.collect_entities(out)),
            Self::ObjectSomeValuesFrom(p, c) | Self::ObjectAllValuesFrom(p, c) => {
                p.collect_entities(out);
                c.collect_entities(out);
            }
            Self::ObjectHasValue(p, i) => {
                p.collect_entities(out);
                i.collect_entities(out);
            }
            Self::ObjectHasSelf(p) => p.collect_entities(out),
            Self::ObjectCardinality {
                property, filler, ..
            } => {
                property.collect_entities(out);
                if let Some(c) = filler {
                    c.collect_entities(out);
                }
            }
            Self::DataSomeValuesFrom(p, d) | Self::DataAllValuesFrom(p, d) => {
                out.insert(Entity::data_property(p.clone()));
                d.collect_entities(out);
            }
            Self::DataHasValue(p, _) => {
                out.insert(Entity::data_property(p.clone()));
            }
            Self::DataCardinality {
                property, filler, ..
            } => {
                out.insert(Entity::data_property(property.clone()));
                if let Some(d) = filler {
                    d.collect_entities(out);
                }
            }
        }
    }
}

impl fmt::Display for ClassExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(iri) => iri.fmt(f),
            Self::IntersectionOf(ops) => write!(f, "ObjectIntersectionOf({})", spaced(ops)),
            Self::UnionOf(ops) => write!(f, "ObjectUnionOf({})", spaced(ops)),
            Self::ComplementOf(c) => write!(f, "ObjectComplementOf({c})"),
            Self::OneOf(inds) => write!(f, "ObjectOneOf({})", spaced(inds)),
            Self::ObjectSomeValuesFrom(p, c) => write!(f, "ObjectSomeValuesFrom({p} {c})"),
            Self::ObjectAllValuesFrom(p, c) => write!(f, "ObjectAllValuesFrom({p} {c})"),
            Self::ObjectHasValue(p, i) => write!(f, "ObjectHasValue({p} {i})"),
            Self::ObjectHasSelf(p) => write!(f, "ObjectHasSelf({p})"),
            Self::ObjectCardinality {
                bound,
                n,
                property,
                filler,
            } => match filler {
                Some(c) => write!(f, "Object{}Cardinality({n} {property} {c})", bound.name()),
                None => write!(f, "Object{}Cardinality({n} {property})", bound.name()),
            },
            Self::DataSomeValuesFrom(p, d) => write!(f, "DataSomeValuesFrom({p} {d})"),
            Self::DataAllValuesFrom(p, d) => write!(f, "DataAllValuesFrom({p} {d})"),
            Self::DataHasValue(p, v) => write!(f, "DataHasValue({p} {v})"),
            Self::DataCardinality {
                bound,
                n,
                property,
                filler,
            } => match filler {
                Some(d) => write!(f, "Data{}Cardinality({n} {property} {d})", bound.name()),
                None => write!(f, "Data{}Cardinality({n} {property})", bound.name()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Data ranges
// ---------------------------------------------------------------------------

/// A constraining facet with its value, e.g. `xsd:minInclusive 5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Facet {
    pub facet: Iri,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataRange {
    Datatype(Iri),
    IntersectionOf(Vec<DataRange>),
    UnionOf(Vec<DataRange>),
    ComplementOf(Box<DataRange>),
    OneOf(Vec<Literal>),
    Restriction(Iri, Vec<Facet>),
}

impl DataRange {
    pub fn datatype(iri: impl Into<Iri>) -> Self {
        Self::Datatype(iri.into())
    }

    pub fn restriction(datatype: impl Into<Iri>, facets: impl IntoIterator<Item = Facet>) -> Self {
        Self::Restriction(datatype.into(), sorted(facets))
    }

    pub fn one_of(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self::OneOf(sorted(literals))
    }

    pub fn as_datatype(&self) -> Option<&Iri> {
        match self {
            Self::Datatype(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn normalized(self) -> Self {
        match self {
            Self::IntersectionOf(ops) => Self::IntersectionOf(sorted(ops.into_iter().map(Self::normalized))),
            Self::UnionOf(ops) => Self::UnionOf(sorted(ops.into_iter().map(Self::normalized))),
            Self::ComplementOf(d) => Self::ComplementOf(Box::new(d.normalized())),
            Self::OneOf(lits) => Self::one_of(lits),
            Self::Restriction(dt, facets) => Self::restriction(dt, facets),
            other => other,
        }
    }

    pub(crate) fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Datatype(iri) | Self::Restriction(iri, _) => {
                out.insert(Entity::datatype(iri.clone()));
            }
            Self::IntersectionOf(ops) | Self::UnionOf(ops) => {
                ops.iter().for_each(|d| d.collect_entities(out));
            }
            Self::ComplementOf(d) => d.collect_entities(out),
            Self::OneOf(_) => {}
        }
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatype(iri) => iri.fmt(f),
            Self::IntersectionOf(ops) => write!(f, "DataIntersectionOf({})", spaced(ops)),
            Self::UnionOf(ops) => write!(f, "DataUnionOf({})", spaced(ops)),
            Self::ComplementOf(d) => write!(f, "DataComplementOf({d})"),
            Self::OneOf(lits) => write!(f, "DataOneOf({})", spaced(lits)),
            Self::Restriction(dt, facets) => {
                write!(f, "DatatypeRestriction({dt}")?;
                for facet in facets {
                    write!(f, " {} {}", facet.facet, facet.value)?;
                }
                f.write_str(")")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort();
    items.dedup();
    items
}

pub(crate) fn spaced<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;

    #[test]
    fn entity_type_iris_round_trip() {
        for t in EntityType::ALL {
            assert_eq!(EntityType::from_type_iri(t.type_iri()), Some(t));
        }
        assert_eq!(EntityType::from_type_iri(owl::RESTRICTION), None);
    }

    #[test]
    fn normalization_is_recursive() {
        let a = ClassExpr::class("http://ex/A");
        let b = ClassExpr::class("http://ex/B");
        let raw = ClassExpr::ComplementOf(Box::new(ClassExpr::UnionOf(vec![
            b.clone(),
            a.clone(),
            b.clone(),
        ])));
        assert_eq!(
            raw.normalized(),
            ClassExpr::complement_of(ClassExpr::union_of([a, b]))
        );
    }

    #[test]
    fn signature_of_restriction() {
        let expr = ClassExpr::some_values_from(
            ObjectPropertyExpr::inverse("http://ex/p"),
            ClassExpr::class("http://ex/C"),
        );
        let mut out = BTreeSet::new();
        expr.collect_entities(&mut out);
        assert!(out.contains(&Entity::object_property("http://ex/p")));
        assert!(out.contains(&Entity::class("http://ex/C")));
    }

    #[test]
    fn display_uses_functional_syntax() {
        let range = DataRange::restriction(
            xsd::INTEGER,
            [Facet {
                facet: Iri::new(xsd::MIN_INCLUSIVE),
                value: Literal::integer(0),
            }],
        );
        assert!(range.to_string().starts_with("DatatypeRestriction("));
        let card = ClassExpr::ObjectCardinality {
            bound: Bound::Max,
            n: 1,
            property: ObjectPropertyExpr::named("http://ex/p"),
            filler: None,
        };
        assert_eq!(card.to_string(), "ObjectMaxCardinality(1 <http://ex/p>)");
    }
}
