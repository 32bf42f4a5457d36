//! Benchmarks for statement translation.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use onto_bridge::config::BridgeConfig;
use onto_bridge::model::{Axiom, AxiomKind, ClassExpr, ObjectPropertyExpr};
use onto_bridge::ontology::{Ontology, OntologyId};
use onto_bridge::registry::TranslatorRegistry;
use onto_bridge::store::MemStore;

fn class(n: usize) -> ClassExpr {
    ClassExpr::class(format!("http://example.org/C{n}"))
}

fn random_axioms(count: usize) -> Vec<Axiom> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    (0..count)
        .map(|_| {
            let sub = class(rng.gen_range(0..200));
            let filler = class(rng.gen_range(0..200));
            if rng.gen_bool(0.5) {
                Axiom::sub_class_of(sub, filler)
            } else {
                let property = ObjectPropertyExpr::named(format!("http://example.org/p{}", rng.gen_range(0..10)));
                Axiom::sub_class_of(sub, ClassExpr::some_values_from(property, filler))
            }
        })
        .collect()
}

fn ontology(parallel_listing: bool) -> Ontology {
    Ontology::new(
        OntologyId::named("http://example.org/bench"),
        Arc::new(MemStore::new()),
        Arc::new(TranslatorRegistry::standard()),
        Arc::new(BridgeConfig {
            parallel_listing,
            ..Default::default()
        }),
    )
    .unwrap()
}

fn bench_write(c: &mut Criterion) {
    let axioms = random_axioms(200);
    c.bench_function("write_200_subclass", |bench| {
        bench.iter(|| {
            let onto = ontology(false);
            for axiom in &axioms {
                black_box(onto.write_statement(axiom).unwrap());
            }
        })
    });
}

fn bench_list_kind(c: &mut Criterion) {
    let onto = ontology(false);
    for axiom in random_axioms(1000) {
        onto.write_statement(&axiom).unwrap();
    }
    c.bench_function("list_subclass_1k", |bench| {
        bench.iter(|| black_box(onto.list_statements_of_kind(AxiomKind::SubClassOf).unwrap()))
    });
}

fn bench_list_all(c: &mut Criterion) {
    for parallel in [false, true] {
        let onto = ontology(parallel);
        for axiom in random_axioms(1000) {
            onto.write_statement(&axiom).unwrap();
        }
        let name = if parallel { "statements_1k_parallel" } else { "statements_1k_sequential" };
        c.bench_function(name, |bench| bench.iter(|| black_box(onto.statements().unwrap())));
    }
}

criterion_group!(benches, bench_write, bench_list_kind, bench_list_all);
criterion_main!(benches);
