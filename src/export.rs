//! Export types for serializing an ontology's statements.
//!
//! These types give a readable view of each statement (functional syntax
//! plus the structured value) together with the triples that ground it,
//! suitable for JSON export.

use serde::{Deserialize, Serialize};

use crate::error::BridgeResult;
use crate::grounded::Grounded;
use crate::model::{Annotation, Axiom};
use crate::ontology::Ontology;
use crate::term::{Iri, Triple};

/// Exported statement with its grounding triples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementExport {
    /// Statement kind name, e.g. `SubClassOf`.
    pub kind: String,
    /// Functional-syntax rendering.
    pub statement: String,
    /// Structured value.
    pub value: Axiom,
    /// Triples the statement was read from, sorted.
    pub triples: Vec<String>,
}

impl StatementExport {
    pub fn from_grounded(statement: &Grounded<Axiom>) -> Self {
        Self {
            kind: statement.value().kind().to_string(),
            statement: statement.value().to_string(),
            value: statement.value().clone(),
            triples: render(statement.triple_set()),
        }
    }
}

/// Exported ontology annotation with its grounding triples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationExport {
    /// Functional-syntax rendering.
    pub annotation: String,
    /// Structured value.
    pub value: Annotation,
    /// Triples the annotation was read from, sorted.
    pub triples: Vec<String>,
}

/// Whole-ontology export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyExport {
    /// Ontology IRI; absent when anonymous.
    pub iri: Option<Iri>,
    /// Version IRI, if any.
    pub version_iri: Option<Iri>,
    /// Imported ontology IRIs.
    pub imports: Vec<Iri>,
    /// Ontology annotations.
    pub annotations: Vec<AnnotationExport>,
    /// Statements in kind order, then value order.
    pub statements: Vec<StatementExport>,
    /// Number of triples in the local graph.
    pub triple_count: usize,
}

impl OntologyExport {
    pub fn from_ontology(ontology: &Ontology) -> BridgeResult<Self> {
        let id = ontology.id();
        let mut statements = ontology.statements()?;
        statements.sort_by(|a, b| a.value().cmp(b.value()));
        let annotations = ontology
            .annotations()?
            .iter()
            .map(|a| AnnotationExport {
                annotation: a.value().to_string(),
                value: a.value().clone(),
                triples: render(a.triple_set()),
            })
            .collect();
        Ok(Self {
            iri: id.iri,
            version_iri: id.version_iri,
            imports: ontology.imports()?,
            annotations,
            statements: statements.iter().map(StatementExport::from_grounded).collect(),
            triple_count: ontology.store().len()?,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn render(triples: impl IntoIterator<Item = Triple>) -> Vec<String> {
    triples.into_iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::model::ClassExpr;
    use crate::ontology::OntologyId;
    use crate::registry::TranslatorRegistry;
    use crate::store::MemStore;
    use std::sync::Arc;

    #[test]
    fn export_lists_statements_with_triples() {
        let onto = Ontology::new(
            OntologyId::named("http://ex/o"),
            Arc::new(MemStore::new()),
            Arc::new(TranslatorRegistry::standard()),
            Arc::new(BridgeConfig::default()),
        )
        .unwrap();
        onto.write_statement(&Axiom::sub_class_of(
            ClassExpr::class("http://ex/A"),
            ClassExpr::class("http://ex/B"),
        ))
        .unwrap();
        let export = OntologyExport::from_ontology(&onto).unwrap();
        // two declarations and the subclass statement
        assert_eq!(export.statements.len(), 3);
        assert_eq!(export.iri, Some(Iri::new("http://ex/o")));
        assert_eq!(export.triple_count, 4);
        let json = export.to_json().unwrap();
        let back: OntologyExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.statements.len(), 3);
    }
}
