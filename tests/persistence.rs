//! Persistence tests for onto-bridge.
//!
//! These tests verify that statements written through the durable store
//! survive a close and reopen of the store directory.

use std::sync::Arc;

use onto_bridge::config::BridgeConfig;
use onto_bridge::model::{Annotation, Axiom, AxiomKind, ClassExpr, Entity, Individual, ObjectPropertyExpr};
use onto_bridge::ontology::{Ontology, OntologyId};
use onto_bridge::registry::TranslatorRegistry;
use onto_bridge::store::{DurableStore, TripleStore};
use onto_bridge::term::Literal;
use onto_bridge::vocab::rdfs;

fn open_ontology(dir: &std::path::Path) -> Ontology {
    Ontology::open(
        Arc::new(DurableStore::open(dir).unwrap()),
        Arc::new(TranslatorRegistry::standard()),
        Arc::new(BridgeConfig::default()),
    )
    .unwrap()
}

fn create_ontology(dir: &std::path::Path) -> Ontology {
    Ontology::new(
        OntologyId::named("http://example.org/zoo").with_version("http://example.org/zoo/1.0"),
        Arc::new(DurableStore::open(dir).unwrap()),
        Arc::new(TranslatorRegistry::standard()),
        Arc::new(BridgeConfig::default()),
    )
    .unwrap()
}

fn lion_is_a_cat() -> Axiom {
    Axiom::sub_class_of(
        ClassExpr::class("http://example.org/Lion"),
        ClassExpr::class("http://example.org/Cat"),
    )
}

fn hunts_restriction() -> Axiom {
    Axiom::sub_class_of(
        ClassExpr::class("http://example.org/Lion"),
        ClassExpr::some_values_from(
            ObjectPropertyExpr::named("http://example.org/hunts"),
            ClassExpr::class("http://example.org/Zebra"),
        ),
    )
    .with_annotations([Annotation::new(rdfs::COMMENT, Literal::string("observed"))])
}

#[test]
fn statements_survive_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    // First session: write statements.
    let triple_count = {
        let onto = create_ontology(dir.path());
        onto.write_statement(&lion_is_a_cat()).unwrap();
        onto.write_statement(&hunts_restriction()).unwrap();
        onto.store().len().unwrap()
    };

    // Second session: reopen and verify.
    {
        let onto = open_ontology(dir.path());
        let id = onto.id();
        assert_eq!(id.iri.as_ref().map(|i| i.as_str()), Some("http://example.org/zoo"));
        assert_eq!(
            id.version_iri.as_ref().map(|i| i.as_str()),
            Some("http://example.org/zoo/1.0")
        );
        assert_eq!(onto.store().len().unwrap(), triple_count);
        assert!(onto.contains_statement(&lion_is_a_cat()).unwrap());
        assert!(onto.contains_statement(&hunts_restriction()).unwrap());
        assert_eq!(onto.list_statements_of_kind(AxiomKind::SubClassOf).unwrap().len(), 2);
    }
}

#[test]
fn blank_nodes_stay_distinct_after_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let first = Axiom::negative_object_property_assertion(
        ObjectPropertyExpr::named("http://example.org/hunts"),
        Individual::named("http://example.org/leo"),
        Individual::named("http://example.org/zara"),
    );
    let second = Axiom::negative_object_property_assertion(
        ObjectPropertyExpr::named("http://example.org/hunts"),
        Individual::named("http://example.org/leo"),
        Individual::named("http://example.org/nala"),
    );

    {
        let onto = create_ontology(dir.path());
        onto.write_statement(&first).unwrap();
    }

    // The second session allocates blank nodes again from scratch.
    {
        let onto = open_ontology(dir.path());
        onto.write_statement(&second).unwrap();
        let listed = onto
            .list_statements_of_kind(AxiomKind::NegativeObjectPropertyAssertion)
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert!(onto.contains_statement(&first).unwrap());
        assert!(onto.contains_statement(&second).unwrap());
    }
}

#[test]
fn removal_is_persisted() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let onto = create_ontology(dir.path());
        onto.write_statement(&hunts_restriction()).unwrap();
        onto.remove_statement(&hunts_restriction()).unwrap();
    }

    {
        let onto = open_ontology(dir.path());
        assert!(!onto.contains_statement(&hunts_restriction()).unwrap());
        // declarations written alongside the statement stay
        let declarations = onto.list_statements_of_kind(AxiomKind::Declaration).unwrap();
        assert!(
            declarations
                .iter()
                .any(|d| d.value() == &Axiom::declaration(Entity::class("http://example.org/Zebra")))
        );
    }
}
