//! The closed set of statement kinds and their operand signatures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::expr::{ClassExpr, DataRange, Individual, ObjectPropertyExpr};
use super::Operand;

macro_rules! axiom_kinds {
    ($($variant:ident),+ $(,)?) => {
        /// Every statement kind the translators cover.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum AxiomKind {
            $($variant),+
        }

        impl AxiomKind {
            pub const ALL: &'static [AxiomKind] = &[$(AxiomKind::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(AxiomKind::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for AxiomKind {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(AxiomKind::$variant),)+
                    other => Err(format!("unknown statement kind: {other}")),
                }
            }
        }
    };
}

axiom_kinds! {
    Declaration,
    SubClassOf,
    EquivalentClasses,
    DisjointClasses,
    DisjointUnion,
    SubObjectPropertyOf,
    SubDataPropertyOf,
    SubAnnotationPropertyOf,
    SubPropertyChainOf,
    EquivalentObjectProperties,
    EquivalentDataProperties,
    DisjointObjectProperties,
    DisjointDataProperties,
    InverseObjectProperties,
    ObjectPropertyDomain,
    ObjectPropertyRange,
    DataPropertyDomain,
    DataPropertyRange,
    AnnotationPropertyDomain,
    AnnotationPropertyRange,
    FunctionalObjectProperty,
    InverseFunctionalObjectProperty,
    ReflexiveObjectProperty,
    IrreflexiveObjectProperty,
    SymmetricObjectProperty,
    AsymmetricObjectProperty,
    TransitiveObjectProperty,
    FunctionalDataProperty,
    ClassAssertion,
    ObjectPropertyAssertion,
    DataPropertyAssertion,
    NegativeObjectPropertyAssertion,
    NegativeDataPropertyAssertion,
    SameIndividual,
    DifferentIndividuals,
    HasKey,
    DatatypeDefinition,
    AnnotationAssertion,
    SwrlRule,
}

impl fmt::Display for AxiomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AxiomKind {
    /// Kinds about annotation properties, skipped when
    /// `load_annotation_axioms` is off.
    pub fn is_annotation_axiom(self) -> bool {
        matches!(
            self,
            Self::AnnotationAssertion
                | Self::SubAnnotationPropertyOf
                | Self::AnnotationPropertyDomain
                | Self::AnnotationPropertyRange
        )
    }

    /// Operand layout accepted by statements of this kind.
    pub fn signature(self) -> Arity {
        use OperandType as T;
        match self {
            Self::Declaration => Arity::Fixed(&[T::Entity]),
            Self::SubClassOf => Arity::Fixed(&[T::Class, T::Class]),
            Self::EquivalentClasses | Self::DisjointClasses => Arity::set(T::Class),
            Self::DisjointUnion => Arity::Set {
                head: &[T::NamedClass],
                item: T::Class,
                min: 2,
                max: None,
            },
            Self::SubObjectPropertyOf => Arity::Fixed(&[T::ObjectProperty, T::ObjectProperty]),
            Self::SubDataPropertyOf => Arity::Fixed(&[T::DataProperty, T::DataProperty]),
            Self::SubAnnotationPropertyOf => {
                Arity::Fixed(&[T::AnnotationProperty, T::AnnotationProperty])
            }
            Self::SubPropertyChainOf => Arity::Sequence {
                head: &[T::ObjectProperty],
                item: T::ObjectProperty,
                min: 2,
            },
            Self::EquivalentObjectProperties | Self::DisjointObjectProperties => {
                Arity::set(T::ObjectProperty)
            }
            Self::EquivalentDataProperties | Self::DisjointDataProperties => {
                Arity::set(T::DataProperty)
            }
            // A property may be its own inverse, so one operand is allowed.
            Self::InverseObjectProperties => Arity::Set {
                head: &[],
                item: T::NamedObjectProperty,
                min: 1,
                max: Some(2),
            },
            Self::ObjectPropertyDomain | Self::ObjectPropertyRange => {
                Arity::Fixed(&[T::ObjectProperty, T::Class])
            }
            Self::DataPropertyDomain => Arity::Fixed(&[T::DataProperty, T::Class]),
            Self::DataPropertyRange => Arity::Fixed(&[T::DataProperty, T::DataRange]),
            Self::AnnotationPropertyDomain | Self::AnnotationPropertyRange => {
                Arity::Fixed(&[T::AnnotationProperty, T::Iri])
            }
            Self::FunctionalObjectProperty
            | Self::InverseFunctionalObjectProperty
            | Self::ReflexiveObjectProperty
            | Self::IrreflexiveObjectProperty
            | Self::SymmetricObjectProperty
            | Self::AsymmetricObjectProperty
            | Self::TransitiveObjectProperty => Arity::Fixed(&[T::ObjectProperty]),
            Self::FunctionalDataProperty => Arity::Fixed(&[T::DataProperty]),
            Self::ClassAssertion => Arity::Fixed(&[T::Class, T::Individual]),
            Self::ObjectPropertyAssertion => {
                Arity::Fixed(&[T::NamedObjectProperty, T::Individual, T::Individual])
            }
            Self::NegativeObjectPropertyAssertion => {
                Arity::Fixed(&[T::ObjectProperty, T::Individual, T::Individual])
            }
            Self::DataPropertyAssertion | Self::NegativeDataPropertyAssertion => {
                Arity::Fixed(&[T::DataProperty, T::Individual, T::Literal])
            }
            Self::SameIndividual | Self::DifferentIndividuals => Arity::set(T::Individual),
            Self::HasKey => Arity::Set {
                head: &[T::Class],
                item: T::KeyProperty,
                min: 1,
                max: None,
            },
            Self::DatatypeDefinition => Arity::Fixed(&[T::Datatype, T::DataRange]),
            Self::AnnotationAssertion => Arity::Fixed(&[
                T::AnnotationProperty,
                T::AnnotationSubject,
                T::AnnotationValue,
            ]),
            Self::SwrlRule => Arity::Fixed(&[T::Atoms, T::Atoms]),
        }
    }
}

/// Category of logical object accepted at an operand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandType {
    Entity,
    Class,
    NamedClass,
    ObjectProperty,
    NamedObjectProperty,
    DataProperty,
    AnnotationProperty,
    /// Object or data property, as listed in a key.
    KeyProperty,
    Individual,
    Literal,
    DataRange,
    Datatype,
    Iri,
    /// IRI or anonymous individual.
    AnnotationSubject,
    /// IRI, literal or anonymous individual.
    AnnotationValue,
    Atoms,
}

impl OperandType {
    pub fn accepts(self, operand: &Operand) -> bool {
        match (self, operand) {
            (Self::Entity, Operand::Entity(_))
            | (Self::Class, Operand::Class(_))
            | (Self::NamedClass, Operand::Class(ClassExpr::Class(_)))
            | (Self::ObjectProperty, Operand::ObjectProperty(_))
            | (Self::NamedObjectProperty, Operand::ObjectProperty(ObjectPropertyExpr::Named(_)))
            | (Self::DataProperty, Operand::DataProperty(_))
            | (Self::AnnotationProperty, Operand::AnnotationProperty(_))
            | (Self::KeyProperty, Operand::ObjectProperty(_) | Operand::DataProperty(_))
            | (Self::Individual, Operand::Individual(_))
            | (Self::Literal, Operand::Literal(_))
            | (Self::DataRange, Operand::DataRange(_))
            | (Self::Datatype, Operand::DataRange(DataRange::Datatype(_)))
            | (Self::Iri, Operand::Iri(_))
            | (
                Self::AnnotationSubject,
                Operand::Iri(_) | Operand::Individual(Individual::Anonymous(_)),
            )
            | (
                Self::AnnotationValue,
                Operand::Iri(_) | Operand::Literal(_) | Operand::Individual(Individual::Anonymous(_)),
            )
            | (Self::Atoms, Operand::Atoms(_)) => true,
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Entity => "an entity",
            Self::Class => "a class expression",
            Self::NamedClass => "a named class",
            Self::ObjectProperty => "an object property expression",
            Self::NamedObjectProperty => "a named object property",
            Self::DataProperty => "a data property",
            Self::AnnotationProperty => "an annotation property",
            Self::KeyProperty => "an object or data property",
            Self::Individual => "an individual",
            Self::Literal => "a literal",
            Self::DataRange => "a data range",
            Self::Datatype => "a datatype",
            Self::Iri => "an IRI",
            Self::AnnotationSubject => "an IRI or anonymous individual",
            Self::AnnotationValue => "an IRI, literal or anonymous individual",
            Self::Atoms => "a list of rule atoms",
        }
    }
}

/// Operand layout of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly these operands, in order.
    Fixed(&'static [OperandType]),
    /// Fixed head followed by an unordered set of items.
    Set {
        head: &'static [OperandType],
        item: OperandType,
        min: usize,
        max: Option<usize>,
    },
    /// Fixed head followed by an ordered sequence of items.
    Sequence {
        head: &'static [OperandType],
        item: OperandType,
        min: usize,
    },
}

impl Arity {
    const fn set(item: OperandType) -> Self {
        Self::Set {
            head: &[],
            item,
            min: 2,
            max: None,
        }
    }

    pub fn head(&self) -> &'static [OperandType] {
        match self {
            Self::Fixed(head) | Self::Set { head, .. } | Self::Sequence { head, .. } => *head,
        }
    }

    /// Returns `true` for kinds whose operands form one unordered set.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::Set { head: [], .. })
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Fixed(types) => format!("exactly {}", types.len()),
            Self::Set { head, min, max, .. } => match max {
                Some(max) => format!("between {} and {}", head.len() + min, head.len() + max),
                None => format!("at least {}", head.len() + min),
            },
            Self::Sequence { head, min, .. } => format!("at least {}", head.len() + min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Iri;

    #[test]
    fn there_are_39_kinds() {
        assert_eq!(AxiomKind::ALL.len(), 39);
    }

    #[test]
    fn names_parse_back() {
        for kind in AxiomKind::ALL {
            assert_eq!(kind.name().parse::<AxiomKind>().unwrap(), *kind);
        }
        assert!("Nonsense".parse::<AxiomKind>().is_err());
    }

    #[test]
    fn operand_type_acceptance() {
        let named = Operand::Class(ClassExpr::class("http://ex/A"));
        let complex = Operand::Class(ClassExpr::complement_of(ClassExpr::class("http://ex/A")));
        assert!(OperandType::NamedClass.accepts(&named));
        assert!(!OperandType::NamedClass.accepts(&complex));
        assert!(OperandType::Class.accepts(&complex));
        assert!(OperandType::AnnotationValue.accepts(&Operand::Iri(Iri::new("http://x"))));
        assert!(!OperandType::AnnotationValue.accepts(&named));
    }

    #[test]
    fn arity_descriptions() {
        assert_eq!(AxiomKind::SubClassOf.signature().describe(), "exactly 2");
        assert_eq!(AxiomKind::DisjointUnion.signature().describe(), "at least 3");
        assert_eq!(
            AxiomKind::InverseObjectProperties.signature().describe(),
            "between 1 and 2"
        );
        assert!(AxiomKind::DisjointClasses.signature().is_symmetric());
        assert!(!AxiomKind::HasKey.signature().is_symmetric());
    }
}
