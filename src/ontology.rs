//! Caller-facing ontology: listing, materializing and editing statements
//! over one graph.
//!
//! An [`Ontology`] owns a store, the ontology header node and the loaded
//! imports. Reads build a fresh [`GraphReader`] whose schema includes every
//! transitively imported store. Edits serialize through an exclusive gate
//! and run inside a [`ChangeTracker`], so each edit either lands in full or
//! leaves the graph as it was.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult, EditError, StoreError};
use crate::grounded::{Grounded, TripleSet};
use crate::model::{Annotation, Axiom, AxiomKind, Entity};
use crate::registry::TranslatorRegistry;
use crate::store::{StoreResult, TripleStore};
use crate::term::{Iri, Node, Triple};
use crate::tracker::{ChangeTracker, Edit, EditRecord, RefCountTable};
use crate::translate::annotations::annotation_properties;
use crate::translate::{GraphReader, GraphWriter};
use crate::vocab::{owl, rdf};

/// Ontology IRI and version IRI; both absent for an anonymous ontology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyId {
    pub iri: Option<Iri>,
    pub version_iri: Option<Iri>,
}

impl OntologyId {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(iri: impl Into<Iri>) -> Self {
        Self {
            iri: Some(iri.into()),
            version_iri: None,
        }
    }

    pub fn with_version(mut self, version_iri: impl Into<Iri>) -> Self {
        self.version_iri = Some(version_iri.into());
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.iri.is_none()
    }
}

/// Outcome of an edit.
#[derive(Debug, Clone)]
pub enum ChangeApplied {
    Applied(Vec<EditRecord>),
    /// The graph already reflected the edit.
    NoOperation,
}

impl ChangeApplied {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn records(&self) -> &[EditRecord] {
        match self {
            Self::Applied(records) => records,
            Self::NoOperation => &[],
        }
    }
}

/// A statement found in the graph, plus the pairwise statements it was
/// assembled from when it had no single encoding.
struct Located {
    grounded: Grounded<Axiom>,
    parts: Vec<Axiom>,
}

pub struct Ontology {
    store: Arc<dyn TripleStore>,
    registry: Arc<TranslatorRegistry>,
    config: Arc<BridgeConfig>,
    id: RwLock<OntologyId>,
    header: RwLock<Node>,
    imports: RwLock<Vec<Arc<Ontology>>>,
    gate: RwLock<()>,
}

impl Ontology {
    /// Create an ontology with header `id` in `store`.
    pub fn new(
        id: OntologyId,
        store: Arc<dyn TripleStore>,
        registry: Arc<TranslatorRegistry>,
        config: Arc<BridgeConfig>,
    ) -> BridgeResult<Self> {
        config.validate()?;
        let header = match &id.iri {
            Some(iri) => Node::Iri(iri.clone()),
            None => Node::Blank(store.fresh_blank()?),
        };
        store.add(Triple::new(header.clone(), rdf::TYPE, Node::iri(owl::ONTOLOGY)))?;
        if let Some(version) = &id.version_iri {
            store.add(Triple::new(header.clone(), owl::VERSION_IRI, version.clone()))?;
        }
        info!(header = %header, "created ontology");
        Ok(Self::assemble(id, header, store, registry, config))
    }

    /// Open the ontology already in `store`, creating an anonymous header
    /// when the graph has none.
    pub fn open(
        store: Arc<dyn TripleStore>,
        registry: Arc<TranslatorRegistry>,
        config: Arc<BridgeConfig>,
    ) -> BridgeResult<Self> {
        config.validate()?;
        let mut headers = store.subjects(rdf::TYPE, &Node::iri(owl::ONTOLOGY))?;
        if headers.is_empty() {
            return Self::new(OntologyId::anonymous(), store, registry, config);
        }
        // Prefer named headers, then the first in store order.
        headers.sort_by_key(|h| h.is_blank());
        if headers.len() > 1 {
            warn!(count = headers.len(), chosen = %headers[0], "graph has several ontology headers");
        }
        let header = headers.swap_remove(0);
        let version_iri = store
            .objects(&header, owl::VERSION_IRI)?
            .into_iter()
            .find_map(|v| v.as_iri().cloned());
        let id = OntologyId {
            iri: header.as_iri().cloned(),
            version_iri,
        };
        info!(header = %header, triples = store.len()?, "opened ontology");
        Ok(Self::assemble(id, header, store, registry, config))
    }

    fn assemble(
        id: OntologyId,
        header: Node,
        store: Arc<dyn TripleStore>,
        registry: Arc<TranslatorRegistry>,
        config: Arc<BridgeConfig>,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            id: RwLock::new(id),
            header: RwLock::new(header),
            imports: RwLock::new(Vec::new()),
            gate: RwLock::new(()),
        }
    }

    pub fn id(&self) -> OntologyId {
        self.id.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn header(&self) -> Node {
        self.header.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn store(&self) -> &Arc<dyn TripleStore> {
        &self.store
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Reader over the local graph with every transitively imported store
    /// as schema.
    pub fn reader(&self) -> GraphReader {
        let mut schema: Vec<Arc<dyn TripleStore>> = Vec::new();
        let mut seen: Vec<*const Ontology> = vec![self as *const Ontology];
        let mut pending: Vec<Arc<Ontology>> = self.loaded_imports();
        while let Some(import) = pending.pop() {
            let ptr = Arc::as_ptr(&import);
            if seen.contains(&ptr) {
                continue;
            }
            seen.push(ptr);
            schema.push(Arc::clone(&import.store));
            pending.extend(import.loaded_imports());
        }
        GraphReader::new(Arc::clone(&self.store), Arc::clone(&self.config))
            .with_schema(schema)
            .with_header(self.header())
    }

    // An edit that panicked may have left a partial write behind, so a
    // poisoned gate refuses further reads and edits.
    fn read_gate(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        self.gate.read().map_err(|_| StoreError::Poisoned { what: "edit gate".into() })
    }

    fn write_gate(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        self.gate.write().map_err(|_| StoreError::Poisoned { what: "edit gate".into() })
    }

    fn loaded_imports(&self) -> Vec<Arc<Ontology>> {
        self.imports.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Every statement of `kind`, equal values merged.
    ///
    /// Annotation statement kinds come back empty when
    /// `load_annotation_axioms` is off.
    pub fn list_statements_of_kind(&self, kind: AxiomKind) -> BridgeResult<Vec<Grounded<Axiom>>> {
        if !self.config.load_annotation_axioms && kind.is_annotation_axiom() {
            return Ok(Vec::new());
        }
        let _read = self.read_gate()?;
        Ok(self.registry.lookup(kind).list(&self.reader())?)
    }

    /// Every statement of every enabled kind.
    pub fn statements(&self) -> BridgeResult<Vec<Grounded<Axiom>>> {
        let _read = self.read_gate()?;
        let reader = self.reader();
        let kinds: Vec<AxiomKind> = AxiomKind::ALL
            .iter()
            .copied()
            .filter(|k| self.config.load_annotation_axioms || !k.is_annotation_axiom())
            .collect();
        let lists: Vec<Vec<Grounded<Axiom>>> = if self.config.parallel_listing {
            kinds
                .par_iter()
                .map(|k| self.registry.lookup(*k).list(&reader))
                .collect::<StoreResult<_>>()?
        } else {
            kinds
                .iter()
                .map(|k| self.registry.lookup(*k).list(&reader))
                .collect::<StoreResult<_>>()?
        };
        Ok(lists.into_iter().flatten().collect())
    }

    /// Build the `kind` statement rooted at `root`.
    pub fn materialize(&self, kind: AxiomKind, root: &Triple) -> BridgeResult<Grounded<Axiom>> {
        let _read = self.read_gate()?;
        self.registry.lookup(kind).materialize(&self.reader(), root)
    }

    /// The grounded form of `axiom`, if the graph holds it.
    ///
    /// A symmetric statement over more than two operands is also found when
    /// the graph holds all of its pairwise statements.
    pub fn find_statement(&self, axiom: &Axiom) -> BridgeResult<Option<Grounded<Axiom>>> {
        let _read = self.read_gate()?;
        Ok(self.locate(&self.reader(), axiom)?.map(|l| l.grounded))
    }

    pub fn contains_statement(&self, axiom: &Axiom) -> BridgeResult<bool> {
        Ok(self.find_statement(axiom)?.is_some())
    }

    /// Named entities mentioned by any statement.
    pub fn signature(&self) -> BridgeResult<BTreeSet<Entity>> {
        Ok(self
            .statements()?
            .iter()
            .flat_map(|s| s.value().signature())
            .collect())
    }

    /// Ontology annotations on the header.
    pub fn annotations(&self) -> BridgeResult<Vec<Grounded<Annotation>>> {
        let _read = self.read_gate()?;
        Ok(self.reader().header_annotations(&self.header())?)
    }

    /// IRIs named by `owl:imports` on the header.
    pub fn imports(&self) -> BridgeResult<Vec<Iri>> {
        Ok(self
            .store
            .objects(&self.header(), owl::IMPORTS)?
            .into_iter()
            .filter_map(|o| o.as_iri().cloned())
            .collect())
    }

    fn locate(&self, reader: &GraphReader, axiom: &Axiom) -> StoreResult<Option<Located>> {
        let listed = self.registry.lookup(axiom.kind()).list(reader)?;
        if let Some(found) = listed.iter().find(|g| g.value() == axiom) {
            return Ok(Some(Located {
                grounded: found.clone(),
                parts: Vec::new(),
            }));
        }
        let parts = axiom.as_pairwise();
        if parts.len() < 2 {
            return Ok(None);
        }
        let mut triples = TripleSet::empty();
        for part in &parts {
            let Some(found) = listed.iter().find(|g| g.value() == part) else {
                return Ok(None);
            };
            triples = triples.append(found.triples());
        }
        Ok(Some(Located {
            grounded: Grounded::with_triples(axiom.clone(), triples),
            parts,
        }))
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    /// Triple owners surviving an edit: every statement not matched by
    /// `removed`, every ontology annotation other than `dropped`, and the
    /// header's type and version triples.
    fn owners(
        &self,
        reader: &GraphReader,
        removed: impl Fn(&Axiom) -> bool,
        dropped: Option<&Annotation>,
    ) -> StoreResult<RefCountTable> {
        let mut owned = Vec::new();
        for translator in self.registry.iter() {
            for statement in translator.list(reader)? {
                if !removed(statement.value()) {
                    owned.push(statement.triple_set());
                }
            }
        }
        let header = self.header();
        for annotation in reader.header_annotations(&header)? {
            if Some(annotation.value()) != dropped {
                owned.push(annotation.triple_set());
            }
        }
        let mut own = BTreeSet::new();
        own.insert(Triple::new(header.clone(), rdf::TYPE, Node::iri(owl::ONTOLOGY)));
        own.extend(self.store.find(Some(&header), Some(&Iri::new(owl::VERSION_IRI)), None)?);
        owned.push(own);
        Ok(RefCountTable::from_owners(owned))
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Run `apply` inside a tracker, rolling back on failure.
    fn tracked(
        &self,
        edit: Edit,
        apply: impl FnOnce(&mut ChangeTracker<'_>) -> BridgeResult<()>,
    ) -> BridgeResult<ChangeApplied> {
        let mut tracker = ChangeTracker::open(self.store.as_ref(), edit.clone());
        match apply(&mut tracker) {
            Ok(()) => {
                let record = tracker.reconcile();
                if record.is_empty() && record.retained.is_empty() {
                    return Ok(ChangeApplied::NoOperation);
                }
                Ok(ChangeApplied::Applied(vec![record]))
            }
            Err(err) => {
                tracker.abort()?;
                Err(EditError::RolledBack {
                    edit: edit.to_string(),
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    /// Add `axiom`, its declarations and annotations.
    pub fn write_statement(&self, axiom: &Axiom) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let reader = self.reader();
        if self.locate(&reader, axiom)?.is_some() {
            return Ok(ChangeApplied::NoOperation);
        }
        let edit = Edit::AddStatement(axiom.clone());
        let writer = GraphWriter::new(&reader);
        writer.validate(axiom).map_err(|e| rejected(&edit, e))?;
        let translator = self.registry.lookup(axiom.kind());
        let applied = self.tracked(edit, |_| {
            translator.write(&writer, axiom)?;
            Ok(())
        })?;
        debug!(statement = %axiom, "statement written");
        Ok(applied)
    }

    /// Remove `axiom`, deleting only triples no other statement needs.
    pub fn remove_statement(&self, axiom: &Axiom) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let reader = self.reader();
        let Some(located) = self.locate(&reader, axiom)? else {
            return Ok(ChangeApplied::NoOperation);
        };
        let owners = self.owners(&reader, |a| a == axiom || located.parts.contains(a), None)?;
        let triples = located.grounded.triple_set();
        self.tracked(Edit::RemoveStatement(axiom.clone()), |tracker| {
            tracker.release(triples, &owners)?;
            Ok(())
        })
    }

    /// Add an ontology annotation to the header.
    pub fn add_annotation(&self, annotation: &Annotation) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let reader = self.reader();
        let header = self.header();
        if reader
            .header_annotations(&header)?
            .iter()
            .any(|a| a.value() == annotation)
        {
            return Ok(ChangeApplied::NoOperation);
        }
        let edit = Edit::AddAnnotation(annotation.clone());
        let mut properties = Vec::new();
        annotation_properties(std::slice::from_ref(annotation), &mut properties);
        let entities: Vec<Entity> = properties.into_iter().map(Entity::annotation_property).collect();
        let writer = GraphWriter::new(&reader);
        writer
            .validate_entities(entities.iter().cloned())
            .map_err(|e| rejected(&edit, e))?;
        self.tracked(edit, |_| {
            for entity in entities.iter().filter(|e| !e.is_builtin()) {
                writer.declare_entity(entity)?;
            }
            writer.annotate_header(&header, annotation)?;
            Ok(())
        })
    }

    /// Remove an ontology annotation, wherever on the header it is asserted.
    pub fn remove_annotation(&self, annotation: &Annotation) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let reader = self.reader();
        let Some(found) = reader
            .header_annotations(&self.header())?
            .into_iter()
            .find(|a| a.value() == annotation)
        else {
            return Ok(ChangeApplied::NoOperation);
        };
        let owners = self.owners(&reader, |_| false, Some(annotation))?;
        let triples = found.triple_set();
        self.tracked(Edit::RemoveAnnotation(annotation.clone()), |tracker| {
            tracker.release(triples, &owners)?;
            Ok(())
        })
    }

    /// Import a loaded ontology; its declarations become schema for reads.
    pub fn add_import(&self, import: Arc<Ontology>) -> BridgeResult<ChangeApplied> {
        let Some(iri) = import.id().iri else {
            return Err(EditError::AnonymousImport.into());
        };
        if Arc::ptr_eq(&import.store, &self.store) {
            return Err(EditError::SelfImport { iri: iri.to_string() }.into());
        }
        let applied = self.add_import_iri(&iri)?;
        let mut imports = self.imports.write().unwrap_or_else(PoisonError::into_inner);
        if !imports.iter().any(|i| Arc::ptr_eq(i, &import)) {
            imports.push(import);
            return Ok(match applied {
                ChangeApplied::NoOperation => ChangeApplied::Applied(Vec::new()),
                applied => applied,
            });
        }
        Ok(applied)
    }

    /// Record an `owl:imports` triple without loading the target.
    pub fn add_import_iri(&self, iri: &Iri) -> BridgeResult<ChangeApplied> {
        if self.id().iri.as_ref() == Some(iri) {
            return Err(EditError::SelfImport { iri: iri.to_string() }.into());
        }
        let _write = self.write_gate()?;
        let triple = Triple::new(self.header(), owl::IMPORTS, iri.clone());
        self.tracked(Edit::AddImport(iri.clone()), |_| {
            self.store.add(triple)?;
            Ok(())
        })
    }

    /// Drop an import. Entities the local statements use but only the
    /// import declared are declared locally first, so those statements
    /// stay readable.
    pub fn remove_import(&self, iri: &Iri) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let reader = self.reader();
        let header = self.header();
        let triple = Triple::new(header, owl::IMPORTS, iri.clone());
        let loaded = self
            .loaded_imports()
            .into_iter()
            .find(|i| i.id().iri.as_ref() == Some(iri));
        if !self.store.contains(&triple)? && loaded.is_none() {
            return Ok(ChangeApplied::NoOperation);
        }

        let mut needed = BTreeSet::new();
        if loaded.is_some() {
            for translator in self.registry.iter() {
                for statement in translator.list(&reader)? {
                    needed.extend(statement.value().signature());
                }
            }
        }
        let mut missing = Vec::new();
        for entity in needed {
            if entity.is_builtin() || reader.local_declarations(&entity.iri)?.contains(&entity.entity_type) {
                continue;
            }
            missing.push(entity);
        }

        let owners = RefCountTable::default();
        let writer = GraphWriter::new(&reader);
        let applied = self.tracked(Edit::RemoveImport(iri.clone()), |tracker| {
            tracker.release([triple], &owners)?;
            for entity in &missing {
                writer.declare_entity(entity)?;
            }
            Ok(())
        })?;
        if !missing.is_empty() {
            debug!(import = %iri, redeclared = missing.len(), "declared imported entities locally");
        }
        self.imports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|i| i.id().iri.as_ref() != Some(iri));
        Ok(match applied {
            ChangeApplied::NoOperation if loaded.is_some() => ChangeApplied::Applied(Vec::new()),
            applied => applied,
        })
    }

    /// Rename the ontology, moving the header triples and the header's
    /// reifications onto the new header node.
    pub fn set_id(&self, id: OntologyId) -> BridgeResult<ChangeApplied> {
        let _write = self.write_gate()?;
        let current = self.id();
        if current == id {
            return Ok(ChangeApplied::NoOperation);
        }
        let old = self.header();
        let new = match (&id.iri, &current.iri) {
            (Some(iri), _) => Node::Iri(iri.clone()),
            (None, None) => old.clone(),
            (None, Some(_)) => Node::Blank(self.store.fresh_blank()?),
        };
        let edit = Edit::SetId {
            iri: id.iri.clone(),
            version_iri: id.version_iri.clone(),
        };
        let applied = self.tracked(edit, |_| {
            if new != old {
                for t in self.store.find(Some(&old), None, None)? {
                    self.store.remove(&t)?;
                    self.store.add(Triple::new(new.clone(), t.predicate, t.object))?;
                }
                let source = Iri::new(owl::ANNOTATED_SOURCE);
                for t in self.store.find(None, Some(&source), Some(&old))? {
                    self.store.remove(&t)?;
                    self.store.add(Triple::new(t.subject, t.predicate, new.clone()))?;
                }
            }
            let version = Iri::new(owl::VERSION_IRI);
            for t in self.store.find(Some(&new), Some(&version), None)? {
                self.store.remove(&t)?;
            }
            if let Some(v) = &id.version_iri {
                self.store.add(Triple::new(new.clone(), owl::VERSION_IRI, v.clone()))?;
            }
            Ok(())
        })?;
        *self.header.write().unwrap_or_else(PoisonError::into_inner) = new.clone();
        *self.id.write().unwrap_or_else(PoisonError::into_inner) = id;
        info!(from = %old, to = %new, "ontology id changed");
        Ok(applied)
    }
}

fn rejected(edit: &Edit, err: BridgeError) -> BridgeError {
    match err {
        BridgeError::Shape(source) => EditError::Rejected {
            edit: edit.to_string(),
            source,
        }
        .into(),
        other => other,
    }
}
