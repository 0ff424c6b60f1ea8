use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{load_generator_config, resolve_config_path, GeneratorConfig};
use crate::error::GeneratorError;
use crate::generator::OpenApiGenerator;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::runtime_config::RuntimeConfig;
use crate::source::ServerManifest;
use crate::spec::OutputFormat;
use crate::validator::print_issues;

/// Default manifest file looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "routes.yaml";

/// Command-line interface for the JSON:API OpenAPI generator
#[derive(Parser, Debug)]
#[command(name = "jsonapi-openapi")]
#[command(about = "Generate OpenAPI documents for JSON:API servers", long_about = None)]
pub struct Cli {
    /// Log at debug level with source locations
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the OpenAPI document of one server
    Generate {
        /// Server key in the manifest and configuration
        server: String,

        /// Output format; falls back to JSONAPI_OAS_FORMAT, then yaml
        #[arg(value_enum)]
        format: Option<OutputFormat>,

        /// Route table and server manifest (YAML or JSON)
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Generator configuration (default: openapi.toml next to the manifest)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory receiving the document; falls back to JSONAPI_OAS_OUTPUT_DIR
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// List the classified routes of one server
    Routes {
        /// Server key in the manifest
        server: String,

        /// Route table and server manifest (YAML or JSON)
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Generator configuration (default: openapi.toml next to the manifest)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse arguments, initialize logging and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = if cli.verbose {
        LogConfig::default_dev()
    } else {
        LogConfig::from_env()
    };
    if let Err(e) = init_logging_with_config(&log_config) {
        eprintln!("Warning: logging not initialized: {e}");
    }
    run(cli, &RuntimeConfig::from_env())
}

/// Run a parsed command.
pub fn run(cli: Cli, runtime: &RuntimeConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            server,
            format,
            manifest,
            config,
            output_dir,
        } => {
            let routes = ServerManifest::load(&manifest)?;
            let config = load_config(config.as_deref(), &manifest)?;
            let named = routes.server(&server)?;
            let format = format.unwrap_or(runtime.format);
            let output_dir = output_dir.unwrap_or_else(|| runtime.output_dir.clone());

            match OpenApiGenerator::new(&server, &routes, &named, &config).write(format, &output_dir)
            {
                Ok(path) => {
                    println!("✅ OpenAPI document written to {}", path.display());
                    Ok(())
                }
                Err(GeneratorError::Validation(issues)) => {
                    print_issues(&issues);
                    bail!("generated document for '{}' failed validation", server)
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Routes {
            server,
            manifest,
            config,
        } => {
            let routes = ServerManifest::load(&manifest)?;
            let config = load_config(config.as_deref(), &manifest)?;
            let named = routes.server(&server)?;
            let descriptors = OpenApiGenerator::new(&server, &routes, &named, &config).routes()?;
            info!(server = %server, routes = descriptors.len(), "Listing routes");
            for route in descriptors {
                let method = route
                    .method
                    .as_ref()
                    .map(|m| m.as_str())
                    .unwrap_or("HEAD");
                println!(
                    "{:<7} {:<50} {:<40} {}",
                    method,
                    route.uri,
                    route.operation_id(),
                    route.kind
                );
            }
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>, manifest: &Path) -> anyhow::Result<GeneratorConfig> {
    let path = resolve_config_path(explicit, manifest).ok_or_else(|| {
        anyhow!(
            "No generator configuration found; pass --config or add {} next to {}",
            crate::config::DEFAULT_CONFIG_FILE,
            manifest.display()
        )
    })?;
    load_generator_config(&path)?
        .with_context(|| format!("Generator configuration {} does not exist", path.display()))
}
