//! onto-bridge CLI: inspect the OWL 2 statements stored in an RDF graph.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use onto_bridge::config::BridgeConfig;
use onto_bridge::export::OntologyExport;
use onto_bridge::model::AxiomKind;
use onto_bridge::ontology::Ontology;
use onto_bridge::registry::TranslatorRegistry;
use onto_bridge::store::{DurableStore, TripleStore};

#[derive(Parser)]
#[command(name = "onto-bridge", version, about = "OWL 2 statement / RDF triple translation")]
struct Cli {
    /// Directory of the persistent graph store. In-memory when omitted.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML file with reader and writer settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every statement kind and its graph shape.
    Kinds,

    /// List statements in functional syntax.
    List {
        /// Only statements of this kind, e.g. "SubClassOf".
        #[arg(long)]
        kind: Option<String>,
    },

    /// Show ontology header and per-kind counts.
    Stats,

    /// Export the ontology as JSON.
    Export,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    let registry = Arc::new(TranslatorRegistry::standard());

    if let Commands::Kinds = cli.command {
        for translator in registry.iter() {
            println!("  {:<36} {:?}", translator.kind().to_string(), translator.shape());
        }
        return Ok(());
    }

    let store: Arc<dyn TripleStore> = match &cli.data_dir {
        Some(dir) => Arc::new(DurableStore::open(dir)?),
        None => Arc::new(DurableStore::in_memory()?),
    };
    let ontology = Ontology::open(store, registry, Arc::new(config))?;

    match cli.command {
        Commands::Kinds => {}

        Commands::List { kind } => {
            let statements = match kind {
                Some(name) => {
                    let kind: AxiomKind = name.parse().map_err(|e: String| miette::miette!("{e}"))?;
                    ontology.list_statements_of_kind(kind)?
                }
                None => ontology.statements()?,
            };
            if statements.is_empty() {
                println!("No statements.");
            }
            for statement in &statements {
                println!("{}", statement.value());
            }
        }

        Commands::Stats => {
            let id = ontology.id();
            match &id.iri {
                Some(iri) => println!("Ontology: {iri}"),
                None => println!("Ontology: (anonymous)"),
            }
            if let Some(version) = &id.version_iri {
                println!("  version:  {version}");
            }
            println!("  triples:  {}", ontology.store().len()?);
            println!("  imports:  {}", ontology.imports()?.len());
            let statements = ontology.statements()?;
            println!("  statements: {}", statements.len());
            for kind in AxiomKind::ALL {
                let count = statements.iter().filter(|s| s.value().kind() == *kind).count();
                if count > 0 {
                    println!("    {:<36} {count}", kind.to_string());
                }
            }
        }

        Commands::Export => {
            let export = OntologyExport::from_ontology(&ontology)?;
            let json = export.to_json().into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

