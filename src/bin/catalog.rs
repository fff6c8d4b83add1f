//! Schema Catalog CLI
//!
//! Inspects the namespace catalog the property tree validates against.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xmptree::{QualifiedName, SchemaRegistry, XmpConfig};

#[derive(Parser)]
#[command(name = "xmp-catalog")]
#[command(about = "Inspect the XMP schema catalog")]
struct Cli {
    /// Path to a config file with extra namespaces
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered namespaces
    Namespaces,

    /// Show the declared properties of a namespace
    Describe {
        /// Namespace URI or preferred prefix
        namespace: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve the declared kind of a qualified name
    Check {
        /// Qualified name (e.g. xmpRights:Marked)
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = match cli.config.as_deref() {
        Some(path) => XmpConfig::load_from(Some(path))?.build_registry()?,
        None => SchemaRegistry::builtin(),
    };

    match cli.command {
        Commands::Namespaces => {
            for descriptor in registry.namespaces() {
                println!(
                    "{:12} {} ({} properties)",
                    descriptor.preferred_prefix,
                    descriptor.namespace_uri,
                    descriptor.property_kinds.len()
                );
            }
            Ok(())
        }

        Commands::Describe { namespace, json } => {
            let descriptor = registry
                .lookup(&namespace)
                .or_else(|| registry.lookup_prefix(&namespace))
                .ok_or_else(|| anyhow::anyhow!("unknown namespace: {}", namespace))?;

            if json {
                println!("{}", serde_json::to_string_pretty(descriptor)?);
            } else {
                println!("{} ({})", descriptor.namespace_uri, descriptor.preferred_prefix);
                for local in descriptor.property_names() {
                    let kind = descriptor
                        .declared_kind(local)
                        .map(|k| k.label())
                        .unwrap_or_default();
                    println!("  {:20} {}", local, kind);
                }
            }
            Ok(())
        }

        Commands::Check { name } => {
            let qname = QualifiedName::parse(&name)?;
            match registry.declared_kind_for(&qname) {
                Some(kind) => println!("✅ {} is declared as {}", qname, kind),
                None => println!("❌ {} is not declared in the catalog", qname),
            }
            Ok(())
        }
    }
}
