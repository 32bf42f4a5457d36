//! SWRL rules: a `swrl:Imp` blank node with `swrl:body` and `swrl:head`
//! lists of atoms.

use crate::grounded::{Grounded, TripleSet};
use crate::model::{Arg, Atom, Axiom, Operand};
use crate::store::StoreResult;
use crate::term::{Node, Triple};
use crate::vocab::{rdf, swrl};

use super::reader::GraphReader;
use super::writer::{GraphWriter, individual};
use super::{Anchor, Reading};

pub(crate) fn read(reader: &GraphReader, root: &Triple) -> StoreResult<Option<Reading>> {
    let rule = &root.subject;
    if !rule.is_blank() {
        return Ok(None);
    }
    let (Some(body), Some(head)) = (reader.single(rule, swrl::BODY)?, reader.single(rule, swrl::HEAD)?) else {
        return Ok(None);
    };
    let (Some(body_atoms), Some(head_atoms)) = (atoms(reader, &body.object)?, atoms(reader, &head.object)?) else {
        return Ok(None);
    };
    Ok(Some(Reading {
        operands: vec![body_atoms, head_atoms],
        triples: TripleSet::many(vec![root.clone(), body, head]),
        anchor: Anchor::Node(rule.clone()),
    }))
}

fn atoms(reader: &GraphReader, head: &Node) -> StoreResult<Option<Grounded<Operand>>> {
    let Some((nodes, backbone)) = reader.list(head)? else {
        return Ok(None);
    };
    let Some(atoms) = reader.each(&nodes, |n| atom(reader, n))? else {
        return Ok(None);
    };
    let value = Operand::Atoms(atoms.iter().map(|a| a.value().clone()).collect()).normalized();
    Ok(Some(Grounded::with_triples(value, backbone).append_all(&atoms)))
}

fn atom(reader: &GraphReader, node: &Node) -> StoreResult<Option<Grounded<Atom>>> {
    if !node.is_blank() {
        return Ok(None);
    }
    let types: Vec<_> = reader
        .types(node)?
        .into_iter()
        .filter(|t| t.in_namespace(swrl::NS))
        .collect();
    let [atom_type] = types.as_slice() else {
        return Ok(None);
    };
    let typed = Triple::new(node.clone(), rdf::TYPE, atom_type.clone());
    let mut triples = vec![typed];
    let mut parts: Vec<Grounded<Arg>> = Vec::new();

    let mut arg_at = |predicate: &str, triples: &mut Vec<Triple>| -> StoreResult<Option<Arg>> {
        let Some(t) = reader.single(node, predicate)? else {
            return Ok(None);
        };
        let read = arg(reader, &t.object)?;
        triples.push(t);
        Ok(read.map(|a| {
            let value = a.value().clone();
            parts.push(a);
            value
        }))
    };

    let value = match atom_type.as_str() {
        swrl::CLASS_ATOM => {
            let Some(link) = reader.single(node, swrl::CLASS_PREDICATE)? else {
                return Ok(None);
            };
            let Some(class) = reader.class_expr(&link.object)? else {
                return Ok(None);
            };
            let Some(a) = arg_at(swrl::ARGUMENT1, &mut triples)? else {
                return Ok(None);
            };
            triples.push(link);
            triples.extend(class.triple_set());
            Atom::Class(class.value().clone(), a)
        }
        swrl::INDIVIDUAL_PROPERTY_ATOM => {
            let Some(link) = reader.single(node, swrl::PROPERTY_PREDICATE)? else {
                return Ok(None);
            };
            let Some(property) = reader.object_property_expr(&link.object)? else {
                return Ok(None);
            };
            let (Some(a), Some(b)) = (
                arg_at(swrl::ARGUMENT1, &mut triples)?,
                arg_at(swrl::ARGUMENT2, &mut triples)?,
            ) else {
                return Ok(None);
            };
            triples.push(link);
            triples.extend(property.triple_set());
            Atom::ObjectProperty(property.value().clone(), a, b)
        }
        swrl::DATAVALUED_PROPERTY_ATOM => {
            let Some(link) = reader.single(node, swrl::PROPERTY_PREDICATE)? else {
                return Ok(None);
            };
            let Some(property) = reader.data_property(&link.object)? else {
                return Ok(None);
            };
            let (Some(a), Some(b)) = (
                arg_at(swrl::ARGUMENT1, &mut triples)?,
                arg_at(swrl::ARGUMENT2, &mut triples)?,
            ) else {
                return Ok(None);
            };
            triples.push(link);
            triples.extend(property.triple_set());
            Atom::DataProperty(property.value().clone(), a, b)
        }
        swrl::DATA_RANGE_ATOM => {
            let Some(link) = reader.single(node, swrl::DATA_RANGE)? else {
                return Ok(None);
            };
            let Some(range) = reader.data_range(&link.object)? else {
                return Ok(None);
            };
            let Some(a) = arg_at(swrl::ARGUMENT1, &mut triples)? else {
                return Ok(None);
            };
            triples.push(link);
            triples.extend(range.triple_set());
            Atom::DataRange(range.value().clone(), a)
        }
        swrl::SAME_INDIVIDUAL_ATOM | swrl::DIFFERENT_INDIVIDUALS_ATOM => {
            let (Some(a), Some(b)) = (
                arg_at(swrl::ARGUMENT1, &mut triples)?,
                arg_at(swrl::ARGUMENT2, &mut triples)?,
            ) else {
                return Ok(None);
            };
            if atom_type == swrl::SAME_INDIVIDUAL_ATOM {
                Atom::SameIndividual(a, b)
            } else {
                Atom::DifferentIndividuals(a, b)
            }
        }
        swrl::BUILTIN_ATOM => {
            let Some(builtin) = reader.single(node, swrl::BUILTIN)? else {
                return Ok(None);
            };
            let Some(iri) = builtin.object.as_iri().cloned() else {
                return Ok(None);
            };
            let Some(link) = reader.single(node, swrl::ARGUMENTS)? else {
                return Ok(None);
            };
            let Some((nodes, backbone)) = reader.list(&link.object)? else {
                return Ok(None);
            };
            let mut args = Vec::with_capacity(nodes.len());
            for n in &nodes {
                let Some(a) = arg(reader, n)? else {
                    return Ok(None);
                };
                args.push(a.value().clone());
                parts.push(a);
            }
            triples.push(builtin);
            triples.push(link);
            triples.extend(backbone.iter());
            Atom::BuiltIn(iri, args)
        }
        _ => return Ok(None),
    };
    Ok(Some(Grounded::with_triples(value, TripleSet::many(triples)).append_all(&parts)))
}

/// An IRI typed `swrl:Variable` is a variable; other IRIs are individuals.
fn arg(reader: &GraphReader, node: &Node) -> StoreResult<Option<Grounded<Arg>>> {
    match node {
        Node::Iri(iri) => {
            if let Some(typed) = reader.typed(node, swrl::VARIABLE)? {
                return Ok(Some(Grounded::rooted(Arg::Variable(iri.clone()), typed)));
            }
            Ok(reader.individual(node)?.map(|i| i.map(|i| Arg::Individual(i.clone()))))
        }
        Node::Blank(_) => Ok(reader.individual(node)?.map(|i| i.map(|i| Arg::Individual(i.clone())))),
        Node::Literal(lit) => Ok(Some(Grounded::new(Arg::Literal(lit.clone())))),
    }
}

pub(crate) fn write(writer: &GraphWriter<'_>, axiom: &Axiom) -> StoreResult<Anchor> {
    let rule = writer.fresh()?;
    writer.add(rule.clone(), rdf::TYPE, Node::iri(swrl::IMP))?;
    let body = writer.operand(&axiom.operands()[0])?;
    let head = writer.operand(&axiom.operands()[1])?;
    writer.add(rule.clone(), swrl::BODY, body)?;
    writer.add(rule.clone(), swrl::HEAD, head)?;
    Ok(Anchor::Node(rule))
}

pub(crate) fn write_atom(writer: &GraphWriter<'_>, atom: &Atom) -> StoreResult<Node> {
    let node = writer.fresh()?;
    let set_args = |args: &[&Arg]| -> StoreResult<()> {
        for (arg, predicate) in args.iter().zip([swrl::ARGUMENT1, swrl::ARGUMENT2]) {
            writer.add(node.clone(), predicate, write_arg(writer, arg)?)?;
        }
        Ok(())
    };
    let atom_type = match atom {
        Atom::Class(class, a) => {
            let class = writer.class_expr(class)?;
            writer.add(node.clone(), swrl::CLASS_PREDICATE, class)?;
            set_args(&[a])?;
            swrl::CLASS_ATOM
        }
        Atom::ObjectProperty(p, a, b) => {
            let p = writer.object_property(p)?;
            writer.add(node.clone(), swrl::PROPERTY_PREDICATE, p)?;
            set_args(&[a, b])?;
            swrl::INDIVIDUAL_PROPERTY_ATOM
        }
        Atom::DataProperty(p, a, b) => {
            writer.add(node.clone(), swrl::PROPERTY_PREDICATE, p.clone())?;
            set_args(&[a, b])?;
            swrl::DATAVALUED_PROPERTY_ATOM
        }
        Atom::DataRange(range, a) => {
            let range = writer.data_range(range)?;
            writer.add(node.clone(), swrl::DATA_RANGE, range)?;
            set_args(&[a])?;
            swrl::DATA_RANGE_ATOM
        }
        Atom::SameIndividual(a, b) => {
            set_args(&[a, b])?;
            swrl::SAME_INDIVIDUAL_ATOM
        }
        Atom::DifferentIndividuals(a, b) => {
            set_args(&[a, b])?;
            swrl::DIFFERENT_INDIVIDUALS_ATOM
        }
        Atom::BuiltIn(builtin, args) => {
            let nodes = args
                .iter()
                .map(|a| write_arg(writer, a))
                .collect::<StoreResult<Vec<_>>>()?;
            let list = writer.list(nodes)?;
            writer.add(node.clone(), swrl::BUILTIN, builtin.clone())?;
            writer.add(node.clone(), swrl::ARGUMENTS, list)?;
            swrl::BUILTIN_ATOM
        }
    };
    writer.add(node.clone(), rdf::TYPE, Node::iri(atom_type))?;
    Ok(node)
}

fn write_arg(writer: &GraphWriter<'_>, arg: &Arg) -> StoreResult<Node> {
    match arg {
        Arg::Variable(iri) => {
            writer.add(iri.clone(), rdf::TYPE, Node::iri(swrl::VARIABLE))?;
            Ok(Node::Iri(iri.clone()))
        }
        Arg::Individual(i) => Ok(individual(i)),
        Arg::Literal(lit) => Ok(Node::Literal(lit.clone())),
    }
}
