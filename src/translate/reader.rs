//! Graph reading: roles of named IRIs and readers for nested structure.
//!
//! Every reader returns `Ok(None)` when the structure at a node is missing,
//! ambiguous, or too deep. Store failures are the only errors. Results are
//! [`Grounded`] so nested triples compose into the enclosing statement.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::config::BridgeConfig;
use crate::grounded::{Grounded, TripleSet};
use crate::model::{
    Bound, ClassExpr, DataRange, EntityType, Facet, Individual, ObjectPropertyExpr, Operand,
    OperandType,
};
use crate::store::{StoreResult, TripleStore};
use crate::term::{Iri, Literal, Node, Triple};
use crate::vocab::{self, owl, rdf, rdfs, swrl};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Set of entity roles an IRI is declared (or built in) with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Roles(u8);

impl Roles {
    pub const NONE: Roles = Roles(0);
    pub const CLASS: Roles = Roles(1);
    pub const DATATYPE: Roles = Roles(1 << 1);
    pub const OBJECT_PROPERTY: Roles = Roles(1 << 2);
    pub const DATA_PROPERTY: Roles = Roles(1 << 3);
    pub const ANNOTATION_PROPERTY: Roles = Roles(1 << 4);
    pub const INDIVIDUAL: Roles = Roles(1 << 5);

    pub fn of(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Class => Self::CLASS,
            EntityType::Datatype => Self::DATATYPE,
            EntityType::ObjectProperty => Self::OBJECT_PROPERTY,
            EntityType::DataProperty => Self::DATA_PROPERTY,
            EntityType::AnnotationProperty => Self::ANNOTATION_PROPERTY,
            EntityType::NamedIndividual => Self::INDIVIDUAL,
        }
    }

    pub fn contains(self, other: Roles) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Property roles exclude each other, as do class and datatype.
    pub fn is_ambiguous(self) -> bool {
        let properties = [
            Self::OBJECT_PROPERTY,
            Self::DATA_PROPERTY,
            Self::ANNOTATION_PROPERTY,
        ]
        .into_iter()
        .filter(|r| self.contains(*r))
        .count();
        properties > 1 || (self.contains(Self::CLASS) && self.contains(Self::DATATYPE))
    }

    pub fn is_class(self) -> bool {
        self.contains(Self::CLASS) && !self.contains(Self::DATATYPE)
    }

    pub fn is_datatype(self) -> bool {
        self.contains(Self::DATATYPE) && !self.contains(Self::CLASS)
    }

    pub fn is_object_property(self) -> bool {
        self.contains(Self::OBJECT_PROPERTY)
            && !self.contains(Self::DATA_PROPERTY)
            && !self.contains(Self::ANNOTATION_PROPERTY)
    }

    pub fn is_data_property(self) -> bool {
        self.contains(Self::DATA_PROPERTY)
            && !self.contains(Self::OBJECT_PROPERTY)
            && !self.contains(Self::ANNOTATION_PROPERTY)
    }

    pub fn is_annotation_property(self) -> bool {
        self.contains(Self::ANNOTATION_PROPERTY)
            && !self.contains(Self::OBJECT_PROPERTY)
            && !self.contains(Self::DATA_PROPERTY)
    }

    pub fn names(self) -> String {
        let names: Vec<&str> = EntityType::ALL
            .into_iter()
            .filter(|t| self.contains(Self::of(*t)))
            .map(EntityType::name)
            .collect();
        if names.is_empty() {
            "nothing".to_string()
        } else {
            names.join(", ")
        }
    }
}

impl BitOr for Roles {
    type Output = Roles;

    fn bitor(self, rhs: Roles) -> Roles {
        Roles(self.0 | rhs.0)
    }
}

impl fmt::Debug for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Roles({})", self.names())
    }
}

fn builtin_roles(iri: &Iri) -> Roles {
    EntityType::ALL
        .into_iter()
        .filter(|t| t.is_builtin(iri))
        .fold(Roles::NONE, |acc, t| acc | Roles::of(t))
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read access to one ontology's graph plus the schema of its imports.
///
/// Cheap to clone; clones share the role cache.
#[derive(Clone)]
pub struct GraphReader {
    store: Arc<dyn TripleStore>,
    schema: Arc<[Arc<dyn TripleStore>]>,
    config: Arc<BridgeConfig>,
    header: Option<Node>,
    roles: Arc<DashMap<Iri, Roles>>,
}

impl GraphReader {
    pub fn new(store: Arc<dyn TripleStore>, config: Arc<BridgeConfig>) -> Self {
        Self {
            store,
            schema: Arc::from(Vec::new()),
            config,
            header: None,
            roles: Arc::new(DashMap::new()),
        }
    }

    /// Stores whose declarations also count when resolving roles.
    pub fn with_schema(mut self, schema: Vec<Arc<dyn TripleStore>>) -> Self {
        self.schema = Arc::from(schema);
        self.roles = Arc::new(DashMap::new());
        self
    }

    /// Subject of the ontology header, excluded from annotation assertions.
    pub fn with_header(mut self, header: Node) -> Self {
        self.header = Some(header);
        self
    }

    /// Same sources, empty role cache.
    pub fn detached(&self) -> Self {
        Self {
            roles: Arc::new(DashMap::new()),
            ..self.clone()
        }
    }

    pub fn store(&self) -> &Arc<dyn TripleStore> {
        &self.store
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn header(&self) -> Option<&Node> {
        self.header.as_ref()
    }

    /// Roles of `iri` from declarations in the local graph, the import
    /// schema, and the builtin vocabulary.
    pub fn roles(&self, iri: &Iri) -> StoreResult<Roles> {
        if let Some(cached) = self.roles.get(iri) {
            return Ok(*cached);
        }
        let subject = Node::Iri(iri.clone());
        let mut roles = builtin_roles(iri);
        for store in std::iter::once(&self.store).chain(self.schema.iter()) {
            for object in store.objects(&subject, rdf::TYPE)? {
                if let Some(t) = object.as_iri().and_then(|o| EntityType::from_type_iri(o.as_str())) {
                    roles = roles | Roles::of(t);
                }
            }
        }
        self.roles.insert(iri.clone(), roles);
        Ok(roles)
    }

    /// Drop the cached roles of `iri` after its declarations change.
    pub(crate) fn forget(&self, iri: &Iri) {
        self.roles.remove(iri);
    }

    /// Entity types `iri` is declared with in the local graph alone.
    pub fn local_declarations(&self, iri: &Iri) -> StoreResult<Vec<EntityType>> {
        Ok(self
            .store
            .objects(&Node::Iri(iri.clone()), rdf::TYPE)?
            .iter()
            .filter_map(|o| o.as_iri().and_then(|o| EntityType::from_type_iri(o.as_str())))
            .collect())
    }

    // -- triple access ------------------------------------------------------

    pub(crate) fn find(
        &self,
        subject: Option<&Node>,
        predicate: &str,
        object: Option<&Node>,
    ) -> StoreResult<Vec<Triple>> {
        self.store.find(subject, Some(&Iri::new(predicate)), object)
    }

    /// The only `subject predicate ?o` triple; `None` when absent or repeated.
    pub(crate) fn single(&self, subject: &Node, predicate: &str) -> StoreResult<Option<Triple>> {
        let mut found = self.find(Some(subject), predicate, None)?;
        Ok(if found.len() == 1 { found.pop() } else { None })
    }

    /// The `node rdf:type type_iri` triple, when present.
    pub(crate) fn typed(&self, node: &Node, type_iri: &str) -> StoreResult<Option<Triple>> {
        let triple = Triple::new(node.clone(), rdf::TYPE, Node::iri(type_iri));
        Ok(self.store.contains(&triple)?.then_some(triple))
    }

    /// The local `iri rdf:type <entity_type>` triple, if asserted.
    pub(crate) fn declaration(&self, iri: &Iri, entity_type: EntityType) -> StoreResult<TripleSet> {
        Ok(match self.typed(&Node::Iri(iri.clone()), entity_type.type_iri())? {
            Some(t) => TripleSet::one(t),
            None => TripleSet::empty(),
        })
    }

    /// `value` for the named entity `iri`, grounded by its local declaration
    /// so that statements using it also own that declaration.
    fn declared<T>(&self, iri: &Iri, entity_type: EntityType, value: T) -> StoreResult<Grounded<T>> {
        Ok(Grounded::with_triples(value, self.declaration(iri, entity_type)?))
    }

    pub(crate) fn types(&self, node: &Node) -> StoreResult<Vec<Iri>> {
        Ok(self
            .store
            .objects(node, rdf::TYPE)?
            .into_iter()
            .filter_map(|o| o.as_iri().cloned())
            .collect())
    }

    /// Returns `true` for blank nodes that carry statement or expression
    /// structure instead of standing for an anonymous individual.
    pub fn is_structural(&self, node: &Node) -> StoreResult<bool> {
        if !node.is_blank() {
            return Ok(false);
        }
        for t in self.types(node)? {
            if vocab::STRUCTURAL_TYPES.contains(&t.as_str()) || t.in_namespace(swrl::NS) {
                return Ok(true);
            }
        }
        for predicate in [
            rdf::FIRST,
            owl::INVERSE_OF,
            owl::ON_PROPERTY,
            owl::ANNOTATED_SOURCE,
            owl::MEMBERS,
            owl::DISTINCT_MEMBERS,
        ] {
            if !self.find(Some(node), predicate, None)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn too_deep(&self, depth: usize, node: &Node) -> bool {
        if depth > self.config.max_expression_depth {
            debug!(%node, depth, "expression nesting exceeds max_expression_depth");
            true
        } else {
            false
        }
    }

    // -- lists --------------------------------------------------------------

    /// Members of the `rdf:List` starting at `head`, with its backbone
    /// triples. Cycles and malformed cells yield `None`.
    pub fn list(&self, head: &Node) -> StoreResult<Option<(Vec<Node>, TripleSet)>> {
        let mut members = Vec::new();
        let mut backbone = Vec::new();
        let mut seen = BTreeSet::new();
        let mut cell = head.clone();
        while !cell.is(rdf::NIL) {
            if !cell.is_blank() || !seen.insert(cell.clone()) {
                return Ok(None);
            }
            let (Some(first), Some(rest)) =
                (self.single(&cell, rdf::FIRST)?, self.single(&cell, rdf::REST)?)
            else {
                return Ok(None);
            };
            if let Some(typed) = self.typed(&cell, rdf::LIST)? {
                backbone.push(typed);
            }
            members.push(first.object.clone());
            cell = rest.object.clone();
            backbone.push(first);
            backbone.push(rest);
        }
        Ok(Some((members, TripleSet::many(backbone))))
    }

    /// Read every node with `read`; `None` if any of them fails.
    pub(crate) fn each<T>(
        &self,
        nodes: &[Node],
        mut read: impl FnMut(&Node) -> StoreResult<Option<Grounded<T>>>,
    ) -> StoreResult<Option<Vec<Grounded<T>>>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match read(node)? {
                Some(g) => out.push(g),
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    }

    // -- named things and individuals --------------------------------------

    pub fn individual(&self, node: &Node) -> StoreResult<Option<Grounded<Individual>>> {
        Ok(match node {
            Node::Iri(iri) if !vocab::is_reserved(iri) => {
                Some(self.declared(iri, EntityType::NamedIndividual, Individual::Named(iri.clone()))?)
            }
            Node::Blank(id) if !self.is_structural(node)? => {
                Some(Grounded::new(Individual::Anonymous(id.clone())))
            }
            _ => None,
        })
    }

    pub fn object_property_expr(&self, node: &Node) -> StoreResult<Option<Grounded<ObjectPropertyExpr>>> {
        match node {
            Node::Iri(iri) => {
                if !self.roles(iri)?.is_object_property() {
                    return Ok(None);
                }
                Ok(Some(self.declared(iri, EntityType::ObjectProperty, ObjectPropertyExpr::Named(iri.clone()))?))
            }
            Node::Blank(_) => {
                let Some(link) = self.single(node, owl::INVERSE_OF)? else {
                    return Ok(None);
                };
                match &link.object {
                    Node::Iri(iri) if self.roles(iri)?.is_object_property() => Ok(Some(
                        Grounded::rooted(ObjectPropertyExpr::Inverse(iri.clone()), link.clone())
                            .append_triples(&self.declaration(iri, EntityType::ObjectProperty)?),
                    )),
                    _ => Ok(None),
                }
            }
            Node::Literal(_) => Ok(None),
        }
    }

    fn named_with(
        &self,
        node: &Node,
        test: fn(Roles) -> bool,
        entity_type: EntityType,
    ) -> StoreResult<Option<Grounded<Iri>>> {
        match node {
            Node::Iri(iri) if test(self.roles(iri)?) => Ok(Some(self.declared(iri, entity_type, iri.clone())?)),
            _ => Ok(None),
        }
    }

    pub fn data_property(&self, node: &Node) -> StoreResult<Option<Grounded<Iri>>> {
        self.named_with(node, Roles::is_data_property, EntityType::DataProperty)
    }

    pub fn annotation_property(&self, node: &Node) -> StoreResult<Option<Grounded<Iri>>> {
        self.named_with(node, Roles::is_annotation_property, EntityType::AnnotationProperty)
    }

    // -- class expressions --------------------------------------------------

    pub fn class_expr(&self, node: &Node) -> StoreResult<Option<Grounded<ClassExpr>>> {
        self.class_at(node, 0)
    }

    pub(crate) fn class_at(&self, node: &Node, depth: usize) -> StoreResult<Option<Grounded<ClassExpr>>> {
        match node {
            Node::Iri(iri) => {
                if !self.roles(iri)?.is_class() {
                    return Ok(None);
                }
                Ok(Some(self.declared(iri, EntityType::Class, ClassExpr::Class(iri.clone()))?))
            }
            Node::Literal(_) => Ok(None),
            Node::Blank(_) => {
                if self.too_deep(depth, node) {
                    return Ok(None);
                }
                if let Some(typed) = self.typed(node, owl::RESTRICTION)? {
                    return self.restriction(node, typed, depth + 1);
                }
                match self.typed(node, owl::CLASS)? {
                    Some(typed) => self.boolean_class(node, typed, depth + 1),
                    None => Ok(None),
                }
            }
        }
    }

    fn boolean_class(&self, node: &Node, typed: Triple, depth: usize) -> StoreResult<Option<Grounded<ClassExpr>>> {
        let base = TripleSet::one(typed);
        if let Some(link) = self.single(node, owl::INTERSECTION_OF)? {
            return self.class_members(link, base, depth, ClassExpr::IntersectionOf);
        }
        if let Some(link) = self.single(node, owl::UNION_OF)? {
            return self.class_members(link, base, depth, ClassExpr::UnionOf);
        }
        if let Some(link) = self.single(node, owl::COMPLEMENT_OF)? {
            let Some(inner) = self.class_at(&link.object, depth)? else {
                return Ok(None);
            };
            let value = ClassExpr::complement_of(inner.value().clone());
            return Ok(Some(Grounded::with_triples(value, base.with(link).append(inner.triples()))));
        }
        if let Some(link) = self.single(node, owl::ONE_OF)? {
            let Some((nodes, backbone)) = self.list(&link.object)? else {
                return Ok(None);
            };
            let Some(members) = self.each(&nodes, |n| self.individual(n))? else {
                return Ok(None);
            };
            let value = ClassExpr::one_of(members.iter().map(|m| m.value().clone()));
            return Ok(Some(Grounded::with_triples(value, base.with(link).append(&backbone))));
        }
        Ok(None)
    }

    fn class_members(
        &self,
        link: Triple,
        base: TripleSet,
        depth: usize,
        build: fn(Vec<ClassExpr>) -> ClassExpr,
    ) -> StoreResult<Option<Grounded<ClassExpr>>> {
        let Some((nodes, backbone)) = self.list(&link.object)? else {
            return Ok(None);
        };
        let Some(members) = self.each(&nodes, |n| self.class_at(n, depth))? else {
            return Ok(None);
        };
        let value = build(members.iter().map(|m| m.value().clone()).collect()).normalized();
        let triples = base.with(link).append(&backbone);
        Ok(Some(Grounded::with_triples(value, triples).append_all(&members)))
    }

    fn restriction(&self, node: &Node, typed: Triple, depth: usize) -> StoreResult<Option<Grounded<ClassExpr>>> {
        let Some(on) = self.single(node, owl::ON_PROPERTY)? else {
            return Ok(None);
        };
        let base = TripleSet::one(typed).with(on.clone());
        if let Some(property) = self.object_property_expr(&on.object)? {
            return self.object_restriction(node, property, base, depth);
        }
        if let Some(property) = self.data_property(&on.object)? {
            let base = base.append(property.triples());
            return self.data_restriction(node, property.value().clone(), base, depth);
        }
        Ok(None)
    }

    fn object_restriction(
        &self,
        node: &Node,
        property: Grounded<ObjectPropertyExpr>,
        base: TripleSet,
        depth: usize,
    ) -> StoreResult<Option<Grounded<ClassExpr>>> {
        let base = base.append(property.triples());
        let p = property.value().clone();
        if let Some(t) = self.single(node, owl::SOME_VALUES_FROM)? {
            return Ok(self.class_at(&t.object, depth)?.map(|c| {
                Grounded::with_triples(ClassExpr::some_values_from(p, c.value().clone()), base.with(t.clone()))
                    .append(&c)
            }));
        }
        if let Some(t) = self.single(node, owl::ALL_VALUES_FROM)? {
            return Ok(self.class_at(&t.object, depth)?.map(|c| {
                Grounded::with_triples(ClassExpr::all_values_from(p, c.value().clone()), base.with(t.clone()))
                    .append(&c)
            }));
        }
        if let Some(t) = self.single(node, owl::HAS_VALUE)? {
            return Ok(self.individual(&t.object)?.map(|i| {
                Grounded::with_triples(ClassExpr::ObjectHasValue(p, i.value().clone()), base.with(t.clone()))
            }));
        }
        if let Some(t) = self.single(node, owl::HAS_SELF)? {
            let is_true = t.object.as_literal().and_then(Literal::as_bool) == Some(true);
            return Ok(is_true.then(|| Grounded::with_triples(ClassExpr::ObjectHasSelf(p), base.with(t))));
        }
        for bound in Bound::ALL {
            if let Some(t) = self.single(node, bound.qualified_predicate())? {
                let Some(n) = cardinality(&t.object) else {
                    return Ok(None);
                };
                let Some(on_class) = self.single(node, owl::ON_CLASS)? else {
                    return Ok(None);
                };
                let Some(filler) = self.class_at(&on_class.object, depth)? else {
                    return Ok(None);
                };
                let value = ClassExpr::ObjectCardinality {
                    bound,
                    n,
                    property: p,
                    filler: Some(Box::new(filler.value().clone())),
                };
                return Ok(Some(Grounded::with_triples(value, base.with(t).with(on_class)).append(&filler)));
            }
            if let Some(t) = self.single(node, bound.unqualified_predicate())? {
                let Some(n) = cardinality(&t.object) else {
                    return Ok(None);
                };
                let value = ClassExpr::ObjectCardinality {
                    bound,
                    n,
                    property: p,
                    filler: None,
                };
                return Ok(Some(Grounded::with_triples(value, base.with(t))));
            }
        }
        Ok(None)
    }

    fn data_restriction(
        &self,
        node: &Node,
        property: Iri,
        base: TripleSet,
        depth: usize,
    ) -> StoreResult<Option<Grounded<ClassExpr>>> {
        if let Some(t) = self.single(node, owl::SOME_VALUES_FROM)? {
            return Ok(self.range_at(&t.object, depth)?.map(|d| {
                let value = ClassExpr::DataSomeValuesFrom(property, Box::new(d.value().clone()));
                Grounded::with_triples(value, base.with(t.clone())).append(&d)
            }));
        }
        if let Some(t) = self.single(node, owl::ALL_VALUES_FROM)? {
            return Ok(self.range_at(&t.object, depth)?.map(|d| {
                let value = ClassExpr::DataAllValuesFrom(property, Box::new(d.value().clone()));
                Grounded::with_triples(value, base.with(t.clone())).append(&d)
            }));
        }
        if let Some(t) = self.single(node, owl::HAS_VALUE)? {
            return Ok(t.object.as_literal().cloned().map(|lit| {
                Grounded::with_triples(ClassExpr::DataHasValue(property, lit), base.with(t.clone()))
            }));
        }
        for bound in Bound::ALL {
            if let Some(t) = self.single(node, bound.qualified_predicate())? {
                let Some(n) = cardinality(&t.object) else {
                    return Ok(None);
                };
                let Some(on_range) = self.single(node, owl::ON_DATA_RANGE)? else {
                    return Ok(None);
                };
                let Some(filler) = self.range_at(&on_range.object, depth)? else {
                    return Ok(None);
                };
                let value = ClassExpr::DataCardinality {
                    bound,
                    n,
                    property,
                    filler: Some(Box::new(filler.value().clone())),
                };
                return Ok(Some(Grounded::with_triples(value, base.with(t).with(on_range)).append(&filler)));
            }
            if let Some(t) = self.single(node, bound.unqualified_predicate())? {
                let Some(n) = cardinality(&t.object) else {
                    return Ok(None);
                };
                let value = ClassExpr::DataCardinality {
                    bound,
                    n,
                    property,
                    filler: None,
                };
                return Ok(Some(Grounded::with_triples(value, base.with(t))));
            }
        }
        Ok(None)
    }

    // -- data ranges --------------------------------------------------------

    pub fn data_range(&self, node: &Node) -> StoreResult<Option<Grounded<DataRange>>> {
        self.range_at(node, 0)
    }

    pub(crate) fn range_at(&self, node: &Node, depth: usize) -> StoreResult<Option<Grounded<DataRange>>> {
        match node {
            Node::Iri(iri) => {
                if !self.roles(iri)?.is_datatype() {
                    return Ok(None);
                }
                Ok(Some(self.declared(iri, EntityType::Datatype, DataRange::Datatype(iri.clone()))?))
            }
            Node::Literal(_) => Ok(None),
            Node::Blank(_) => {
                if self.too_deep(depth, node) {
                    return Ok(None);
                }
                match self.typed(node, rdfs::DATATYPE)? {
                    Some(typed) => self.compound_range(node, typed, depth + 1),
                    None => Ok(None),
                }
            }
        }
    }

    fn compound_range(&self, node: &Node, typed: Triple, depth: usize) -> StoreResult<Option<Grounded<DataRange>>> {
        let base = TripleSet::one(typed);
        if let Some(link) = self.single(node, owl::INTERSECTION_OF)? {
            return self.range_members(link, base, depth, DataRange::IntersectionOf);
        }
        if let Some(link) = self.single(node, owl::UNION_OF)? {
            return self.range_members(link, base, depth, DataRange::UnionOf);
        }
        if let Some(link) = self.single(node, owl::DATATYPE_COMPLEMENT_OF)? {
            return Ok(self.range_at(&link.object, depth)?.map(|inner| {
                let value = DataRange::ComplementOf(Box::new(inner.value().clone()));
                Grounded::with_triples(value, base.with(link.clone())).append(&inner)
            }));
        }
        if let Some(link) = self.single(node, owl::ONE_OF)? {
            let Some((nodes, backbone)) = self.list(&link.object)? else {
                return Ok(None);
            };
            let literals: Option<Vec<Literal>> = nodes.iter().map(|n| n.as_literal().cloned()).collect();
            return Ok(literals.map(|lits| {
                Grounded::with_triples(DataRange::one_of(lits), base.with(link).append(&backbone))
            }));
        }
        if let Some(on) = self.single(node, owl::ON_DATATYPE)? {
            let Some(datatype) = self.named_with(&on.object, Roles::is_datatype, EntityType::Datatype)? else {
                return Ok(None);
            };
            let Some(link) = self.single(node, owl::WITH_RESTRICTIONS)? else {
                return Ok(None);
            };
            let Some((nodes, backbone)) = self.list(&link.object)? else {
                return Ok(None);
            };
            let Some(facets) = self.each(&nodes, |n| self.facet(n))? else {
                return Ok(None);
            };
            let value = DataRange::restriction(datatype.value().clone(), facets.iter().map(|f| f.value().clone()));
            let triples = base.with(on).with(link).append(&backbone).append(datatype.triples());
            return Ok(Some(Grounded::with_triples(value, triples).append_all(&facets)));
        }
        Ok(None)
    }

    fn range_members(
        &self,
        link: Triple,
        base: TripleSet,
        depth: usize,
        build: fn(Vec<DataRange>) -> DataRange,
    ) -> StoreResult<Option<Grounded<DataRange>>> {
        let Some((nodes, backbone)) = self.list(&link.object)? else {
            return Ok(None);
        };
        let Some(members) = self.each(&nodes, |n| self.range_at(n, depth))? else {
            return Ok(None);
        };
        let value = build(members.iter().map(|m| m.value().clone()).collect()).normalized();
        let triples = base.with(link).append(&backbone);
        Ok(Some(Grounded::with_triples(value, triples).append_all(&members)))
    }

    fn facet(&self, node: &Node) -> StoreResult<Option<Grounded<Facet>>> {
        if !node.is_blank() {
            return Ok(None);
        }
        let mut facets: Vec<Triple> = self
            .store
            .find(Some(node), None, None)?
            .into_iter()
            .filter(|t| vocab::is_facet(&t.predicate))
            .collect();
        if facets.len() != 1 {
            return Ok(None);
        }
        let Some(t) = facets.pop() else {
            return Ok(None);
        };
        Ok(t.object.as_literal().cloned().map(|value| {
            let facet = Facet {
                facet: t.predicate.clone(),
                value,
            };
            Grounded::rooted(facet, t.clone())
        }))
    }

    // -- operands -----------------------------------------------------------

    /// Read `node` as an operand of type `ty`.
    pub fn operand(&self, ty: OperandType, node: &Node) -> StoreResult<Option<Grounded<Operand>>> {
        use OperandType as T;
        let read = match ty {
            T::Class => self.class_expr(node)?.map(|g| g.map(|c| Operand::Class(c.clone()))),
            T::NamedClass => self
                .named_with(node, Roles::is_class, EntityType::Class)?
                .map(|g| g.map(|iri| Operand::Class(ClassExpr::Class(iri.clone())))),
            T::ObjectProperty => self
                .object_property_expr(node)?
                .map(|g| g.map(|p| Operand::ObjectProperty(p.clone()))),
            T::NamedObjectProperty => self
                .named_with(node, Roles::is_object_property, EntityType::ObjectProperty)?
                .map(|g| g.map(|iri| Operand::ObjectProperty(ObjectPropertyExpr::Named(iri.clone())))),
            T::DataProperty => self
                .data_property(node)?
                .map(|g| g.map(|iri| Operand::DataProperty(iri.clone()))),
            T::AnnotationProperty => self
                .annotation_property(node)?
                .map(|g| g.map(|iri| Operand::AnnotationProperty(iri.clone()))),
            T::KeyProperty => match self.operand(T::ObjectProperty, node)? {
                Some(p) => Some(p),
                None => self.operand(T::DataProperty, node)?,
            },
            T::Individual => self.individual(node)?.map(|g| g.map(|i| Operand::Individual(i.clone()))),
            T::Literal => node.as_literal().map(|l| Grounded::new(Operand::Literal(l.clone()))),
            T::DataRange => self.data_range(node)?.map(|g| g.map(|d| Operand::DataRange(d.clone()))),
            T::Datatype => self
                .named_with(node, Roles::is_datatype, EntityType::Datatype)?
                .map(|g| g.map(|iri| Operand::DataRange(DataRange::Datatype(iri.clone())))),
            T::Iri => node.as_iri().map(|iri| Grounded::new(Operand::Iri(iri.clone()))),
            T::AnnotationSubject => match node {
                Node::Iri(iri) => Some(Grounded::new(Operand::Iri(iri.clone()))),
                Node::Blank(id) if !self.is_structural(node)? => {
                    Some(Grounded::new(Operand::Individual(Individual::Anonymous(id.clone()))))
                }
                _ => None,
            },
            T::AnnotationValue => match node {
                Node::Iri(iri) => Some(Grounded::new(Operand::Iri(iri.clone()))),
                Node::Literal(lit) => Some(Grounded::new(Operand::Literal(lit.clone()))),
                Node::Blank(id) if !self.is_structural(node)? => {
                    Some(Grounded::new(Operand::Individual(Individual::Anonymous(id.clone()))))
                }
                Node::Blank(_) => None,
            },
            T::Entity | T::Atoms => None,
        };
        Ok(read)
    }
}

impl fmt::Debug for GraphReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphReader")
            .field("schema", &self.schema.len())
            .field("header", &self.header)
            .field("cached_roles", &self.roles.len())
            .finish()
    }
}

fn cardinality(node: &Node) -> Option<u32> {
    node.as_literal().and_then(Literal::as_cardinality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use crate::vocab::xsd;

    fn reader_over(triples: Vec<Triple>) -> GraphReader {
        let store = MemStore::from_triples(triples).unwrap();
        GraphReader::new(Arc::new(store), Arc::new(BridgeConfig::default()))
    }

    fn declare(iri: &str, t: EntityType) -> Triple {
        Triple::new(Node::iri(iri), rdf::TYPE, Node::iri(t.type_iri()))
    }

    #[test]
    fn roles_combine_declarations_and_builtins() {
        let reader = reader_over(vec![
            declare("http://ex/p", EntityType::ObjectProperty),
            declare("http://ex/q", EntityType::ObjectProperty),
            declare("http://ex/q", EntityType::DataProperty),
        ]);
        assert!(reader.roles(&Iri::new("http://ex/p")).unwrap().is_object_property());
        let q = reader.roles(&Iri::new("http://ex/q")).unwrap();
        assert!(q.is_ambiguous());
        assert!(!q.is_object_property());
        assert!(reader.roles(&Iri::new(owl::THING)).unwrap().is_class());
        assert!(reader.roles(&Iri::new(xsd::STRING)).unwrap().is_datatype());
    }

    #[test]
    fn lists_are_read_in_order() {
        let cells = [Node::blank("l0"), Node::blank("l1")];
        let reader = reader_over(vec![
            Triple::new(cells[0].clone(), rdf::FIRST, Node::iri("http://ex/a")),
            Triple::new(cells[0].clone(), rdf::REST, cells[1].clone()),
            Triple::new(cells[1].clone(), rdf::FIRST, Node::iri("http://ex/b")),
            Triple::new(cells[1].clone(), rdf::REST, Node::iri(rdf::NIL)),
        ]);
        let (members, backbone) = reader.list(&cells[0]).unwrap().unwrap();
        assert_eq!(members, vec![Node::iri("http://ex/a"), Node::iri("http://ex/b")]);
        assert_eq!(backbone.to_set().len(), 4);
    }

    #[test]
    fn cyclic_lists_are_rejected() {
        let cell = Node::blank("l0");
        let reader = reader_over(vec![
            Triple::new(cell.clone(), rdf::FIRST, Node::iri("http://ex/a")),
            Triple::new(cell.clone(), rdf::REST, cell.clone()),
        ]);
        assert!(reader.list(&cell).unwrap().is_none());
    }

    #[test]
    fn restriction_is_grounded_by_its_triples() {
        let r = Node::blank("r");
        let reader = reader_over(vec![
            declare("http://ex/p", EntityType::ObjectProperty),
            declare("http://ex/C", EntityType::Class),
            Triple::new(r.clone(), rdf::TYPE, Node::iri(owl::RESTRICTION)),
            Triple::new(r.clone(), owl::ON_PROPERTY, Node::iri("http://ex/p")),
            Triple::new(r.clone(), owl::SOME_VALUES_FROM, Node::iri("http://ex/C")),
        ]);
        let expr = reader.class_expr(&r).unwrap().unwrap();
        assert_eq!(
            expr.value(),
            &ClassExpr::some_values_from(ObjectPropertyExpr::named("http://ex/p"), ClassExpr::class("http://ex/C"))
        );
        // the declarations of p and C are part of the grounding
        assert_eq!(expr.triple_set().len(), 5);
    }

    #[test]
    fn nesting_beyond_the_limit_is_dropped() {
        let mut triples = vec![declare("http://ex/C", EntityType::Class)];
        for i in 0..5 {
            let node = Node::blank(format!("c{i}"));
            let inner = if i == 4 { Node::iri("http://ex/C") } else { Node::blank(format!("c{}", i + 1)) };
            triples.push(Triple::new(node.clone(), rdf::TYPE, Node::iri(owl::CLASS)));
            triples.push(Triple::new(node, owl::COMPLEMENT_OF, inner));
        }
        let store: Arc<dyn TripleStore> = Arc::new(MemStore::from_triples(triples).unwrap());
        let shallow = BridgeConfig {
            max_expression_depth: 2,
            ..BridgeConfig::default()
        };
        let reader = GraphReader::new(Arc::clone(&store), Arc::new(shallow));
        assert!(reader.class_expr(&Node::blank("c0")).unwrap().is_none());
        let reader = GraphReader::new(store, Arc::new(BridgeConfig::default()));
        assert!(reader.class_expr(&Node::blank("c0")).unwrap().is_some());
    }

    #[test]
    fn structural_blanks_are_not_individuals() {
        let x = Node::blank("x");
        let reader = reader_over(vec![Triple::new(x.clone(), rdf::TYPE, Node::iri(owl::AXIOM))]);
        assert!(reader.individual(&x).unwrap().is_none());
        assert!(reader.individual(&Node::blank("y")).unwrap().is_some());
        assert!(reader.individual(&Node::iri(owl::THING)).unwrap().is_none());
    }
}
