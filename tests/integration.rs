//! End-to-end tests for onto-bridge.
//!
//! Every statement kind is written through an [`Ontology`], read back,
//! materialized from its root triple and removed again. The scenario tests
//! cover bulk encodings, annotated statements sharing a root triple,
//! negative assertions and import removal.

use std::sync::Arc;

use onto_bridge::config::BridgeConfig;
use onto_bridge::model::{
    AnnotationValue, Annotation, Arg, Atom, Axiom, AxiomKind, ClassExpr, DataRange, Entity, Facet,
    Individual, ObjectPropertyExpr, Operand,
};
use onto_bridge::ontology::{Ontology, OntologyId};
use onto_bridge::registry::TranslatorRegistry;
use onto_bridge::store::{MemStore, TripleStore};
use onto_bridge::term::{Iri, Literal, Node, Triple};
use onto_bridge::vocab::{owl, rdf, rdfs, xsd};

const EX: &str = "http://example.org/";

fn ex(name: &str) -> Iri {
    Iri::new(format!("{EX}{name}"))
}

fn class(name: &str) -> ClassExpr {
    ClassExpr::class(ex(name))
}

fn op(name: &str) -> ObjectPropertyExpr {
    ObjectPropertyExpr::named(ex(name))
}

fn ind(name: &str) -> Individual {
    Individual::named(ex(name))
}

fn ontology_with(config: BridgeConfig) -> Ontology {
    Ontology::new(
        OntologyId::named(ex("onto")),
        Arc::new(MemStore::new()),
        Arc::new(TranslatorRegistry::standard()),
        Arc::new(config),
    )
    .unwrap()
}

fn test_ontology() -> Ontology {
    ontology_with(BridgeConfig::default())
}

fn comment(text: &str) -> Annotation {
    Annotation::new(rdfs::COMMENT, Literal::string(text))
}

/// One representative statement per kind.
fn samples() -> Vec<Axiom> {
    let non_negative = DataRange::restriction(
        xsd::INTEGER,
        [Facet {
            facet: Iri::new(xsd::MIN_INCLUSIVE),
            value: Literal::integer(0),
        }],
    );
    let characteristic = |kind, operand: Operand| Axiom::characteristic(kind, operand).unwrap();
    let p = || Operand::from(op("p"));
    vec![
        Axiom::declaration(Entity::class(ex("A"))),
        Axiom::sub_class_of(class("A"), ClassExpr::some_values_from(op("p"), class("B"))),
        Axiom::equivalent_classes([class("A"), ClassExpr::intersection_of([class("B"), class("C")])]).unwrap(),
        Axiom::disjoint_classes([class("A"), class("B")]).unwrap(),
        Axiom::disjoint_union(ex("A"), [class("B"), class("C")]).unwrap(),
        Axiom::sub_object_property_of(op("p"), op("q")),
        Axiom::sub_data_property_of(ex("d"), ex("e")),
        Axiom::sub_annotation_property_of(ex("note"), rdfs::LABEL),
        Axiom::sub_property_chain_of([op("p"), op("q")], op("r")).unwrap(),
        Axiom::new(AxiomKind::EquivalentObjectProperties, [p(), Operand::from(op("q"))], []).unwrap(),
        Axiom::new(
            AxiomKind::EquivalentDataProperties,
            [Operand::DataProperty(ex("d")), Operand::DataProperty(ex("e"))],
            [],
        )
        .unwrap(),
        Axiom::new(AxiomKind::DisjointObjectProperties, [p(), Operand::from(op("q"))], []).unwrap(),
        Axiom::new(
            AxiomKind::DisjointDataProperties,
            [Operand::DataProperty(ex("d")), Operand::DataProperty(ex("e"))],
            [],
        )
        .unwrap(),
        Axiom::inverse_object_properties(ex("p"), ex("q")),
        Axiom::object_property_domain(op("p"), class("A")),
        Axiom::object_property_range(op("p"), ClassExpr::union_of([class("B"), class("C")])),
        Axiom::data_property_domain(ex("d"), class("A")),
        Axiom::data_property_range(ex("d"), non_negative.clone()),
        Axiom::new(
            AxiomKind::AnnotationPropertyDomain,
            [Operand::AnnotationProperty(ex("note")), Operand::Iri(ex("A"))],
            [],
        )
        .unwrap(),
        Axiom::new(
            AxiomKind::AnnotationPropertyRange,
            [Operand::AnnotationProperty(ex("note")), Operand::Iri(Iri::new(xsd::STRING))],
            [],
        )
        .unwrap(),
        characteristic(AxiomKind::FunctionalObjectProperty, p()),
        characteristic(AxiomKind::InverseFunctionalObjectProperty, p()),
        characteristic(AxiomKind::ReflexiveObjectProperty, p()),
        characteristic(AxiomKind::IrreflexiveObjectProperty, p()),
        characteristic(AxiomKind::SymmetricObjectProperty, p()),
        characteristic(AxiomKind::AsymmetricObjectProperty, p()),
        characteristic(AxiomKind::TransitiveObjectProperty, p()),
        characteristic(AxiomKind::FunctionalDataProperty, Operand::DataProperty(ex("d"))),
        Axiom::class_assertion(class("A"), ind("i")),
        Axiom::object_property_assertion(ex("p"), ind("i"), ind("j")),
        Axiom::data_property_assertion(ex("d"), ind("i"), Literal::integer(42)),
        Axiom::negative_object_property_assertion(op("p"), ind("i"), ind("j")),
        Axiom::negative_data_property_assertion(ex("d"), ind("i"), Literal::integer(7)),
        Axiom::same_individual([ind("i"), ind("j")]).unwrap(),
        Axiom::different_individuals([ind("i"), ind("j")]).unwrap(),
        Axiom::has_key(class("A"), [p(), Operand::DataProperty(ex("d"))]).unwrap(),
        Axiom::datatype_definition(ex("Age"), non_negative),
        Axiom::annotation_assertion(
            rdfs::COMMENT,
            AnnotationValue::Iri(ex("A")),
            Literal::string("a class"),
        )
        .unwrap(),
        Axiom::swrl_rule(
            [
                Atom::Class(class("A"), Arg::variable(ex("x"))),
                Atom::ObjectProperty(op("p"), Arg::variable(ex("x")), Arg::variable(ex("y"))),
            ],
            [Atom::Class(class("B"), Arg::variable(ex("y")))],
        ),
    ]
}

fn all_triples(onto: &Ontology) -> Vec<Triple> {
    onto.store().find(None, None, None).unwrap()
}

#[test]
fn samples_cover_every_kind() {
    let kinds: Vec<AxiomKind> = samples().iter().map(Axiom::kind).collect();
    assert_eq!(kinds, AxiomKind::ALL.to_vec());
}

#[test]
fn every_kind_round_trips() {
    for axiom in samples() {
        let onto = test_ontology();
        let applied = onto.write_statement(&axiom).unwrap();
        assert!(applied.is_applied(), "{axiom} was not written");

        let listed = onto.list_statements_of_kind(axiom.kind()).unwrap();
        assert!(
            listed.iter().any(|g| g.value() == &axiom),
            "{axiom} not read back, got {:?}",
            listed.iter().map(|g| g.value().to_string()).collect::<Vec<_>>()
        );
        if axiom.kind() != AxiomKind::Declaration {
            assert_eq!(listed.len(), 1, "{axiom} read back as several statements");
        }
        assert!(onto.contains_statement(&axiom).unwrap());
    }
}

#[test]
fn every_kind_materializes_from_its_root() {
    for axiom in samples() {
        let onto = test_ontology();
        onto.write_statement(&axiom).unwrap();
        let reader = onto.reader();
        let translator = onto.registry().lookup(axiom.kind());
        let roots: Vec<Triple> = translator
            .candidates(&reader)
            .unwrap()
            .into_iter()
            .filter(|t| translator.is_instance(&reader, t).unwrap())
            .collect();
        assert_eq!(roots.len(), 1, "{axiom} has {} roots", roots.len());
        let built = onto.materialize(axiom.kind(), &roots[0]).unwrap();
        assert_eq!(built.value(), &axiom);
        assert!(built.triple_set().contains(&roots[0]));
    }
}

#[test]
fn every_kind_is_removable() {
    for axiom in samples() {
        let onto = test_ontology();
        onto.write_statement(&axiom).unwrap();
        let declarations = onto.list_statements_of_kind(AxiomKind::Declaration).unwrap();

        let removed = onto.remove_statement(&axiom).unwrap();
        assert!(removed.is_applied(), "{axiom} was not removed");
        assert!(!onto.contains_statement(&axiom).unwrap());

        // removal never takes declarations with it, except the removed declaration itself
        let left = onto.list_statements_of_kind(AxiomKind::Declaration).unwrap();
        let expected = if axiom.kind() == AxiomKind::Declaration {
            declarations.len() - 1
        } else {
            declarations.len()
        };
        assert_eq!(left.len(), expected, "{axiom} removal touched declarations");
    }
}

#[test]
fn writing_twice_is_a_no_op() {
    for axiom in samples() {
        let onto = test_ontology();
        onto.write_statement(&axiom).unwrap();
        let before = onto.store().len().unwrap();
        let again = onto.write_statement(&axiom).unwrap();
        assert!(!again.is_applied(), "{axiom} written twice");
        assert_eq!(onto.store().len().unwrap(), before);
    }
}

#[test]
fn annotated_statements_round_trip() {
    for axiom in samples() {
        if axiom.kind() == AxiomKind::Declaration {
            continue;
        }
        let annotated = axiom.clone().with_annotations([comment("checked")]);
        let onto = test_ontology();
        onto.write_statement(&annotated).unwrap();
        assert!(onto.contains_statement(&annotated).unwrap(), "{annotated} not read back");
        assert!(!onto.contains_statement(&axiom).unwrap());
    }
}

#[test]
fn each_root_triple_belongs_to_at_most_one_kind() {
    let onto = test_ontology();
    for axiom in samples() {
        onto.write_statement(&axiom).unwrap();
    }
    let reader = onto.reader();
    for triple in all_triples(&onto) {
        let claimed: Vec<AxiomKind> = onto
            .registry()
            .iter()
            .filter(|t| t.is_instance(&reader, &triple).unwrap())
            .map(|t| t.kind())
            .collect();
        assert!(claimed.len() <= 1, "{triple} claimed by {claimed:?}");
    }
    let statements = onto.statements().unwrap();
    for axiom in samples() {
        assert!(statements.iter().any(|s| s.value() == &axiom), "{axiom} missing");
    }
}

#[test]
fn merging_equal_statements_is_idempotent() {
    let onto = test_ontology();
    let axiom = Axiom::equivalent_classes([class("A"), class("B")]).unwrap();
    onto.write_statement(&axiom).unwrap();
    onto.store()
        .add(Triple::new(Node::Iri(ex("B")), owl::EQUIVALENT_CLASS, Node::Iri(ex("A"))))
        .unwrap();

    let listed = onto.list_statements_of_kind(AxiomKind::EquivalentClasses).unwrap();
    assert_eq!(listed.len(), 1);
    // both directions plus the declarations of A and B
    assert_eq!(listed[0].triple_set().len(), 4);

    let merged = listed[0].merge(&listed[0]);
    assert_eq!(merged.value(), listed[0].value());
    assert_eq!(merged.triple_set(), listed[0].triple_set());
}

#[test]
fn bulk_disjointness_reads_as_one_statement() {
    let onto = test_ontology();
    let axiom = Axiom::disjoint_classes([class("X"), class("Y"), class("Z")]).unwrap();
    onto.write_statement(&axiom).unwrap();

    let listed = onto.list_statements_of_kind(AxiomKind::DisjointClasses).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].value(), &axiom);
    assert_eq!(listed[0].value().operands().len(), 3);
    assert!(
        listed[0]
            .triple_set()
            .iter()
            .any(|t| t.has_predicate(rdf::TYPE) && t.object.is(owl::ALL_DISJOINT_CLASSES))
    );

    onto.remove_statement(&axiom).unwrap();
    assert!(onto.list_statements_of_kind(AxiomKind::DisjointClasses).unwrap().is_empty());
    // only the header and three declarations remain
    assert_eq!(onto.store().len().unwrap(), 4);
}

#[test]
fn pairwise_disjointness_is_found_as_a_whole() {
    let onto = test_ontology();
    let pairs = [("X", "Y"), ("X", "Z"), ("Y", "Z")];
    for (a, b) in pairs {
        onto.write_statement(&Axiom::disjoint_classes([class(a), class(b)]).unwrap())
            .unwrap();
    }
    let whole = Axiom::disjoint_classes([class("X"), class("Y"), class("Z")]).unwrap();
    let found = onto.find_statement(&whole).unwrap().unwrap();
    assert_eq!(found.value(), &whole);
    // three pairs plus three declarations
    assert_eq!(found.triple_set().len(), 6);
}

#[test]
fn split_annotations_share_the_root_triple() {
    let onto = ontology_with(BridgeConfig {
        split_axiom_annotations: true,
        ..Default::default()
    });
    let plain = Axiom::sub_class_of(class("A"), class("B"));
    let first = plain.clone().with_annotations([comment("first")]);
    let second = plain.clone().with_annotations([comment("second")]);
    onto.write_statement(&first).unwrap();
    onto.write_statement(&second).unwrap();
    assert_eq!(onto.list_statements_of_kind(AxiomKind::SubClassOf).unwrap().len(), 2);

    let root = Triple::new(Node::Iri(ex("A")), rdfs::SUB_CLASS_OF, Node::Iri(ex("B")));
    let removed = onto.remove_statement(&first).unwrap();
    let record = &removed.records()[0];
    assert!(record.retained.contains(&root));
    assert!(!record.removed.contains(&root));
    assert!(onto.store().contains(&root).unwrap());
    assert!(!onto.contains_statement(&first).unwrap());
    assert!(onto.contains_statement(&second).unwrap());
}

#[test]
fn combined_annotations_merge_into_one_statement() {
    let onto = test_ontology();
    let plain = Axiom::sub_class_of(class("A"), class("B"));
    onto.write_statement(&plain.clone().with_annotations([comment("first")]))
        .unwrap();
    onto.write_statement(&plain.clone().with_annotations([comment("second")]))
        .unwrap();
    let listed = onto.list_statements_of_kind(AxiomKind::SubClassOf).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].value(),
        &plain.with_annotations([comment("first"), comment("second")])
    );
}

#[test]
fn negative_assertions_keep_their_own_nodes() {
    let onto = test_ontology();
    let first = Axiom::negative_object_property_assertion(op("p"), ind("i"), ind("j"))
        .with_annotations([comment("one")]);
    let second = Axiom::negative_object_property_assertion(op("p"), ind("i"), ind("j"))
        .with_annotations([comment("two")]);
    onto.write_statement(&first).unwrap();
    onto.write_statement(&second).unwrap();
    // header, three declarations, two nodes of five triples each
    assert_eq!(onto.store().len().unwrap(), 14);
    assert_eq!(
        onto.list_statements_of_kind(AxiomKind::NegativeObjectPropertyAssertion)
            .unwrap()
            .len(),
        2
    );

    onto.remove_statement(&first).unwrap();
    assert_eq!(onto.store().len().unwrap(), 9);
    assert!(onto.contains_statement(&second).unwrap());
    assert!(!onto.contains_statement(&first).unwrap());
}

#[test]
fn removing_an_import_redeclares_used_entities() {
    let library = Arc::new(
        Ontology::new(
            OntologyId::named(ex("library")),
            Arc::new(MemStore::new()),
            Arc::new(TranslatorRegistry::standard()),
            Arc::new(BridgeConfig::default()),
        )
        .unwrap(),
    );
    library
        .write_statement(&Axiom::declaration(Entity::class(ex("X"))))
        .unwrap();
    library
        .write_statement(&Axiom::declaration(Entity::class(ex("Z"))))
        .unwrap();

    let onto = test_ontology();
    onto.add_import(Arc::clone(&library)).unwrap();
    onto.write_statement(&Axiom::declaration(Entity::class(ex("Y"))))
        .unwrap();
    onto.write_statement(&Axiom::declaration(Entity::class(ex("Z"))))
        .unwrap();
    onto.store()
        .add(Triple::new(Node::Iri(ex("X")), rdfs::SUB_CLASS_OF, Node::Iri(ex("Y"))))
        .unwrap();

    let sub = Axiom::sub_class_of(class("X"), class("Y"));
    assert!(onto.contains_statement(&sub).unwrap());
    assert_eq!(onto.imports().unwrap(), vec![ex("library")]);

    let removed = onto.remove_import(&ex("library")).unwrap();
    assert!(removed.is_applied());
    assert!(onto.imports().unwrap().is_empty());
    // X is now declared locally, so the subclass statement still reads
    assert!(onto.contains_statement(&Axiom::declaration(Entity::class(ex("X")))).unwrap());
    assert!(onto.contains_statement(&sub).unwrap());
    assert!(onto.contains_statement(&Axiom::declaration(Entity::class(ex("Z")))).unwrap());
    assert!(onto.contains_statement(&Axiom::declaration(Entity::class(ex("Y")))).unwrap());
}

#[test]
fn header_annotations_are_not_statements() {
    let onto = test_ontology();
    onto.add_annotation(&comment("about the ontology")).unwrap();
    assert_eq!(onto.annotations().unwrap().len(), 1);
    assert!(
        onto.list_statements_of_kind(AxiomKind::AnnotationAssertion)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn declarations_shared_by_statements_outlive_their_removal() {
    let onto = test_ontology();
    let plain = Axiom::sub_class_of(class("A"), class("B"));
    let restricted = Axiom::sub_class_of(class("A"), ClassExpr::some_values_from(op("p"), class("C")));
    onto.write_statement(&plain).unwrap();
    onto.write_statement(&restricted).unwrap();

    let class_a = Triple::new(Node::Iri(ex("A")), rdf::TYPE, Node::iri(owl::CLASS));
    let removed = onto
        .remove_statement(&Axiom::declaration(Entity::class(ex("A"))))
        .unwrap();
    assert!(removed.records()[0].retained.contains(&class_a));
    assert!(onto.store().contains(&class_a).unwrap());

    // p only appears nested inside the restriction
    let property_p = Triple::new(Node::Iri(ex("p")), rdf::TYPE, Node::iri(owl::OBJECT_PROPERTY));
    let removed = onto
        .remove_statement(&Axiom::declaration(Entity::object_property(ex("p"))))
        .unwrap();
    assert!(removed.records()[0].retained.contains(&property_p));

    assert!(onto.contains_statement(&plain).unwrap());
    assert!(onto.contains_statement(&restricted).unwrap());
    assert_eq!(onto.list_statements_of_kind(AxiomKind::SubClassOf).unwrap().len(), 2);
}

#[test]
fn decoded_statements_are_checked_before_writing() {
    let onto = test_ontology();
    let before = onto.store().len().unwrap();
    let empty = r#"{"kind":"SubClassOf","operands":[],"annotations":[]}"#;
    assert!(serde_json::from_str::<Axiom>(empty).is_err());
    assert_eq!(onto.store().len().unwrap(), before);

    let assertion = Axiom::object_property_assertion(ex("hunts"), ind("leo"), ind("zara"));
    let decoded: Axiom = serde_json::from_str(&serde_json::to_string(&assertion).unwrap()).unwrap();
    assert!(onto.write_statement(&decoded).unwrap().is_applied());
    assert!(onto.contains_statement(&assertion).unwrap());
}
