//! RDF terms: IRIs, blank nodes, literals, and triples.
//!
//! All terms are immutable and cheap to clone (strings are shared through
//! `Arc<str>`). Ordering is total so stores can keep deterministic indexes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::vocab::{rdf, xsd};

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this IRI starts with `namespace`.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.0.starts_with(namespace)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl PartialEq<str> for Iri {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Iri {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// A blank node label, scoped to one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankId(Arc<str>);

impl BlankId {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal value: lexical form, datatype, and optional language tag.
///
/// Language-tagged literals always carry `rdf:langString`; tags are stored
/// lowercased so equal literals compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    lexical: Arc<str>,
    datatype: Iri,
    language: Option<Arc<str>>,
}

impl Literal {
    pub fn typed(lexical: impl AsRef<str>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A plain `xsd:string` literal.
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Self::typed(lexical, xsd::STRING)
    }

    pub fn lang(lexical: impl AsRef<str>, tag: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Iri::new(rdf::LANG_STRING),
            language: Some(Arc::from(tag.as_ref().to_ascii_lowercase())),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd::INTEGER)
    }

    pub fn non_negative(value: u32) -> Self {
        Self::typed(value.to_string(), xsd::NON_NEGATIVE_INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, xsd::BOOLEAN)
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Parse the lexical form as a non-negative cardinality.
    pub fn as_cardinality(&self) -> Option<u32> {
        self.lexical.trim().parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.lexical.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lexical.as_ref())?;
        match &self.language {
            Some(tag) => write!(f, "@{tag}"),
            None if self.datatype == xsd::STRING => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

/// Any RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(Iri),
    Blank(BlankId),
    Literal(Literal),
}

impl Node {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Self::Iri(Iri::new(iri))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Self::Blank(BlankId::new(label))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Self::Blank(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns `true` for the IRI `iri`.
    pub fn is(&self, iri: &str) -> bool {
        matches!(self, Self::Iri(i) if i == iri)
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<&Iri> for Node {
    fn from(iri: &Iri) -> Self {
        Self::Iri(iri.clone())
    }
}

impl From<BlankId> for Node {
    fn from(id: BlankId) -> Self {
        Self::Blank(id)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Blank(id) => id.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

/// A subject-predicate-object triple.
///
/// The subject is never a literal; stores reject such triples on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Iri>, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns `true` if the predicate is `iri`.
    pub fn has_predicate(&self, iri: &str) -> bool {
        self.predicate == iri
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_are_normalized() {
        assert_eq!(Literal::lang("chat", "FR"), Literal::lang("chat", "fr"));
        assert_eq!(Literal::lang("chat", "fr").datatype(), &Iri::new(rdf::LANG_STRING));
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::string("x").to_string(), "\"x\"");
        assert_eq!(Literal::lang("x", "en").to_string(), "\"x\"@en");
        assert_eq!(
            Literal::integer(3).to_string(),
            format!("\"3\"^^<{}>", xsd::INTEGER)
        );
    }

    #[test]
    fn triples_order_deterministically() {
        let a = Triple::new(Node::iri("http://a"), "http://p", Node::iri("http://b"));
        let b = Triple::new(Node::blank("b0"), "http://p", Node::iri("http://b"));
        let mut v = vec![b.clone(), a.clone()];
        v.sort();
        assert_eq!(v, vec![a, b]);
    }

    #[test]
    fn cardinality_parsing() {
        assert_eq!(Literal::non_negative(2).as_cardinality(), Some(2));
        assert_eq!(Literal::string("two").as_cardinality(), None);
    }

    #[test]
    fn iri_compares_with_str() {
        let iri = Iri::new(rdf::TYPE);
        assert!(iri == rdf::TYPE);
        assert!(Node::from(iri).is(rdf::TYPE));
    }
}
