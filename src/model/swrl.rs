//! SWRL rule atoms.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::{Iri, Literal};

use super::expr::{ClassExpr, DataRange, Entity, Individual, ObjectPropertyExpr, spaced};

/// An atom argument: a rule variable, an individual, or a data value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arg {
    Variable(Iri),
    Individual(Individual),
    Literal(Literal),
}

impl Arg {
    pub fn variable(iri: impl Into<Iri>) -> Self {
        Self::Variable(iri.into())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(iri) => write!(f, "Variable({iri})"),
            Self::Individual(i) => i.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Atom {
    Class(ClassExpr, Arg),
    ObjectProperty(ObjectPropertyExpr, Arg, Arg),
    DataProperty(Iri, Arg, Arg),
    DataRange(DataRange, Arg),
    SameIndividual(Arg, Arg),
    DifferentIndividuals(Arg, Arg),
    BuiltIn(Iri, Vec<Arg>),
}

impl Atom {
    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::Class(c, a) => Self::Class(c.normalized(), a),
            Self::DataRange(d, a) => Self::DataRange(d.normalized(), a),
            other => other,
        }
    }

    pub(crate) fn collect_entities(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Class(c, _) => c.collect_entities(out),
            Self::ObjectProperty(p, ..) => {
                out.insert(Entity::object_property(p.property().clone()));
            }
            Self::DataProperty(p, ..) => {
                out.insert(Entity::data_property(p.clone()));
            }
            Self::DataRange(d, _) => d.collect_entities(out),
            Self::SameIndividual(..) | Self::DifferentIndividuals(..) | Self::BuiltIn(..) => {}
        }
        for arg in self.args() {
            if let Arg::Individual(Individual::Named(iri)) = arg {
                out.insert(Entity::individual(iri.clone()));
            }
        }
    }

    pub fn args(&self) -> Vec<&Arg> {
        match self {
            Self::Class(_, a) | Self::DataRange(_, a) => vec![a],
            Self::ObjectProperty(_, a, b)
            | Self::DataProperty(_, a, b)
            | Self::SameIndividual(a, b)
            | Self::DifferentIndividuals(a, b) => vec![a, b],
            Self::BuiltIn(_, args) => args.iter().collect(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c, a) => write!(f, "ClassAtom({c} {a})"),
            Self::ObjectProperty(p, a, b) => write!(f, "ObjectPropertyAtom({p} {a} {b})"),
            Self::DataProperty(p, a, b) => write!(f, "DataPropertyAtom({p} {a} {b})"),
            Self::DataRange(d, a) => write!(f, "DataRangeAtom({d} {a})"),
            Self::SameIndividual(a, b) => write!(f, "SameIndividualAtom({a} {b})"),
            Self::DifferentIndividuals(a, b) => write!(f, "DifferentIndividualsAtom({a} {b})"),
            Self::BuiltIn(b, args) => write!(f, "BuiltInAtom({b} {})", spaced(args)),
        }
    }
}
