//! Rich diagnostic error types for the translation engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for onto-bridge.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum BridgeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling the translator registry or loading
/// configuration. These are fatal at startup.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("no translator registered for statement kind {kind}")]
    #[diagnostic(
        code(onto::config::missing_translator),
        help(
            "Every statement kind needs exactly one translator. \
             Register one with `RegistryBuilder::register` before calling `build()`."
        )
    )]
    MissingTranslator { kind: String },

    #[error("statement kind {kind} has more than one translator")]
    #[diagnostic(
        code(onto::config::duplicate_translator),
        help("Remove one of the registrations so the kind-to-translator mapping stays injective.")
    )]
    DuplicateTranslator { kind: String },

    #[error("translator for {kind} uses shape {shape}, expected {expected}")]
    #[diagnostic(
        code(onto::config::shape_mismatch),
        help("Register `Translator::for_kind` for this kind; its shape matches the operand signature.")
    )]
    ShapeMismatch {
        kind: String,
        shape: String,
        expected: String,
    },

    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(onto::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}")]
    #[diagnostic(
        code(onto::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(onto::config::parse),
        help("The config file must be valid TOML. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(onto::config::invalid), help("Fix the offending value and retry."))]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Shape errors
// ---------------------------------------------------------------------------

/// A statement or graph fragment does not have the shape a kind requires.
#[derive(Debug, Error, Diagnostic)]
pub enum ShapeError {
    #[error("{kind} expects {expected} operands, got {actual}")]
    #[diagnostic(
        code(onto::shape::arity),
        help("Check the operand count for this statement kind.")
    )]
    Arity {
        kind: String,
        expected: String,
        actual: usize,
    },

    #[error("{kind} operand {position} must be {expected}")]
    #[diagnostic(
        code(onto::shape::operand_type),
        help("Each operand position accepts one category of logical object.")
    )]
    OperandType {
        kind: String,
        position: usize,
        expected: String,
    },

    #[error("triple {triple} is not a root of a {kind} statement")]
    #[diagnostic(
        code(onto::shape::not_an_instance),
        help("Use the kind's candidate list to find valid roots before materializing.")
    )]
    NotAnInstance { kind: String, triple: String },

    #[error("{kind} statement rooted at {triple} is only partially formed")]
    #[diagnostic(
        code(onto::shape::unreadable),
        help(
            "The root triple matches but the surrounding structure is broken \
             (missing list cells, undeclared entities, or nested expressions too deep)."
        )
    )]
    Unreadable { kind: String, triple: String },

    #[error("{iri} is already used as {existing}, cannot also be used as {requested}")]
    #[diagnostic(
        code(onto::shape::role_conflict),
        help(
            "Object, data and annotation properties must stay disjoint, as must classes \
             and datatypes. Writing this statement would make the name ambiguous."
        )
    )]
    RoleConflict {
        iri: String,
        existing: String,
        requested: String,
    },

    #[error("{iri} is reserved vocabulary and cannot be used as {role}")]
    #[diagnostic(
        code(onto::shape::reserved),
        help("Names in the rdf, rdfs, owl and xsd namespaces are only usable as their builtin meaning.")
    )]
    ReservedVocabulary { iri: String, role: String },
}

// ---------------------------------------------------------------------------
// Edit errors
// ---------------------------------------------------------------------------

/// An edit could not be applied. The graph is left as it was before the edit.
#[derive(Debug, Error, Diagnostic)]
pub enum EditError {
    #[error("edit rejected: {edit}")]
    #[diagnostic(
        code(onto::edit::rejected),
        help("The statement failed validation; nothing was written.")
    )]
    Rejected {
        edit: String,
        #[source]
        source: ShapeError,
    },

    #[error("edit failed and was rolled back: {edit}: {message}")]
    #[diagnostic(
        code(onto::edit::rolled_back),
        help("The store reported an error mid-edit. All triples touched by the edit were restored.")
    )]
    RolledBack { edit: String, message: String },

    #[error("cannot import an anonymous ontology")]
    #[diagnostic(
        code(onto::edit::anonymous_import),
        help("Give the imported ontology an IRI with `set_id` first.")
    )]
    AnonymousImport,

    #[error("ontology {iri} cannot import itself")]
    #[diagnostic(code(onto::edit::self_import))]
    SelfImport { iri: String },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("triple store backend error: {message}")]
    #[diagnostic(
        code(onto::store::backend),
        help("The underlying store failed. Check disk space and directory permissions.")
    )]
    Backend { message: String },

    #[error("literal {literal} cannot be the subject of a triple")]
    #[diagnostic(code(onto::store::literal_subject))]
    LiteralSubject { literal: String },

    #[error("{what} lock poisoned")]
    #[diagnostic(
        code(onto::store::poisoned),
        help("An earlier edit panicked while holding this lock. Reopen the store before editing again.")
    )]
    Poisoned { what: String },
}

// ---------------------------------------------------------------------------
// Graph warnings
// ---------------------------------------------------------------------------

/// A candidate structure was skipped during lenient reading.
///
/// Never returned as an error; emitted through `tracing` so dropped
/// statements leave a trail.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphWarning {
    #[error("dropping partially formed {kind} rooted at {triple}")]
    #[diagnostic(code(onto::graph::partial), severity(Warning))]
    PartiallyFormed { kind: String, triple: String },

    #[error("dropping {kind} rooted at {triple}: {reason}")]
    #[diagnostic(code(onto::graph::invalid), severity(Warning))]
    Invalid {
        kind: String,
        triple: String,
        reason: String,
    },
}

/// Convenience result type for onto-bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
