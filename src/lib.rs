// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # onto-bridge
//!
//! Bidirectional translation between OWL 2 statements and the RDF triples
//! that encode them, with exact bookkeeping of which triples ground which
//! statement.
//!
//! ## Architecture
//!
//! - **Terms and vocabulary** (`term`, `vocab`): IRIs, blank nodes, literals, triples; RDF/RDFS/OWL/XSD/SWRL names
//! - **Triple stores** (`store`): in-memory indexed store and an oxigraph-backed durable store, both observable
//! - **Logical model** (`model`): entities, class expressions, data ranges, SWRL atoms and the 39 statement kinds
//! - **Grounded values** (`grounded`): a value plus the lazy set of triples it was read from
//! - **Translators** (`translate`, `registry`): a declarative kind → shape table driving one generic reader/writer
//! - **Edits** (`tracker`, `ontology`): journaled, ref-counted, all-or-nothing graph edits
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use onto_bridge::config::BridgeConfig;
//! use onto_bridge::model::{Axiom, ClassExpr};
//! use onto_bridge::ontology::{Ontology, OntologyId};
//! use onto_bridge::registry::TranslatorRegistry;
//! use onto_bridge::store::MemStore;
//!
//! let onto = Ontology::new(
//!     OntologyId::named("http://example.org/zoo"),
//!     Arc::new(MemStore::new()),
//!     Arc::new(TranslatorRegistry::standard()),
//!     Arc::new(BridgeConfig::default()),
//! )
//! .unwrap();
//! let axiom = Axiom::sub_class_of(
//!     ClassExpr::class("http://example.org/Lion"),
//!     ClassExpr::class("http://example.org/Cat"),
//! );
//! onto.write_statement(&axiom).unwrap();
//! assert!(onto.contains_statement(&axiom).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod grounded;
pub mod model;
pub mod ontology;
pub mod registry;
pub mod store;
pub mod term;
pub mod tracker;
pub mod translate;
pub mod vocab;
