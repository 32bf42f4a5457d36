//! The declarative kind → shape table.
//!
//! Operand types come from [`AxiomKind::signature`]; the table only says
//! which graph pattern carries each kind.

use crate::model::AxiomKind;
use crate::vocab::{owl, rdfs};

/// Graph encoding family shared by several statement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `E rdf:type <entity type>`.
    Declaration,
    /// `s p o` with both ends read per the signature.
    Binary(&'static str),
    /// `a p b`, one triple per pair.
    Pairwise(&'static str),
    /// `a p b` for two operands, or a typed blank node listing `owl:members`.
    TwoWay {
        predicate: &'static str,
        bulk: &'static str,
    },
    /// `P rdf:type <characteristic>`.
    Characteristic(&'static str),
    /// `s p (list)`: the head operand, then the list items.
    Listed(&'static str),
    /// `i rdf:type C`.
    ClassAssertion,
    /// `s P o` where `P` is a declared property of the kind's role.
    PropertyAssertion,
    /// An `owl:NegativePropertyAssertion` blank node.
    NegativeAssertion { target: &'static str },
    /// A `swrl:Imp` blank node.
    Rule,
}

pub fn shape_of(kind: AxiomKind) -> Shape {
    use AxiomKind as K;
    match kind {
        K::Declaration => Shape::Declaration,
        K::SubClassOf => Shape::Binary(rdfs::SUB_CLASS_OF),
        K::SubObjectPropertyOf | K::SubDataPropertyOf | K::SubAnnotationPropertyOf => {
            Shape::Binary(rdfs::SUB_PROPERTY_OF)
        }
        K::ObjectPropertyDomain | K::DataPropertyDomain | K::AnnotationPropertyDomain => {
            Shape::Binary(rdfs::DOMAIN)
        }
        K::ObjectPropertyRange | K::DataPropertyRange | K::AnnotationPropertyRange => {
            Shape::Binary(rdfs::RANGE)
        }
        K::DatatypeDefinition => Shape::Binary(owl::EQUIVALENT_CLASS),
        K::EquivalentClasses => Shape::Pairwise(owl::EQUIVALENT_CLASS),
        K::EquivalentObjectProperties | K::EquivalentDataProperties => {
            Shape::Pairwise(owl::EQUIVALENT_PROPERTY)
        }
        K::SameIndividual => Shape::Pairwise(owl::SAME_AS),
        K::InverseObjectProperties => Shape::Pairwise(owl::INVERSE_OF),
        K::DisjointClasses => Shape::TwoWay {
            predicate: owl::DISJOINT_WITH,
            bulk: owl::ALL_DISJOINT_CLASSES,
        },
        K::DisjointObjectProperties | K::DisjointDataProperties => Shape::TwoWay {
            predicate: owl::PROPERTY_DISJOINT_WITH,
            bulk: owl::ALL_DISJOINT_PROPERTIES,
        },
        K::DifferentIndividuals => Shape::TwoWay {
            predicate: owl::DIFFERENT_FROM,
            bulk: owl::ALL_DIFFERENT,
        },
        K::FunctionalObjectProperty | K::FunctionalDataProperty => {
            Shape::Characteristic(owl::FUNCTIONAL_PROPERTY)
        }
        K::InverseFunctionalObjectProperty => Shape::Characteristic(owl::INVERSE_FUNCTIONAL_PROPERTY),
        K::ReflexiveObjectProperty => Shape::Characteristic(owl::REFLEXIVE_PROPERTY),
        K::IrreflexiveObjectProperty => Shape::Characteristic(owl::IRREFLEXIVE_PROPERTY),
        K::SymmetricObjectProperty => Shape::Characteristic(owl::SYMMETRIC_PROPERTY),
        K::AsymmetricObjectProperty => Shape::Characteristic(owl::ASYMMETRIC_PROPERTY),
        K::TransitiveObjectProperty => Shape::Characteristic(owl::TRANSITIVE_PROPERTY),
        K::DisjointUnion => Shape::Listed(owl::DISJOINT_UNION_OF),
        K::SubPropertyChainOf => Shape::Listed(owl::PROPERTY_CHAIN_AXIOM),
        K::HasKey => Shape::Listed(owl::HAS_KEY),
        K::ClassAssertion => Shape::ClassAssertion,
        K::ObjectPropertyAssertion | K::DataPropertyAssertion | K::AnnotationAssertion => {
            Shape::PropertyAssertion
        }
        K::NegativeObjectPropertyAssertion => Shape::NegativeAssertion {
            target: owl::TARGET_INDIVIDUAL,
        },
        K::NegativeDataPropertyAssertion => Shape::NegativeAssertion {
            target: owl::TARGET_VALUE,
        },
        K::SwrlRule => Shape::Rule,
    }
}
