//! Modelkit CLI - Inspect and edit packaged ML models.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flavor` | Print a flavor's configuration as JSON |
//! | `info` | Print model info for a model URI |
//! | `signature show` | Print the signature recorded for a model |
//! | `signature set` | Replace a model's signature from a JSON file |
//! | `code-path` | Register a flavor's bundled code and list the search path |

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modelkit_core::config::ModelkitConfig;
use modelkit_core::store::ArtifactResolver;
use std::path::PathBuf;

/// Modelkit CLI - Inspect and edit packaged ML models
#[derive(Parser)]
#[command(name = "modelkit")]
#[command(about = "Modelkit CLI - Inspect and edit packaged ML models", long_about = None)]
struct Cli {
    /// Tracking store used to resolve runs:/ URIs
    #[arg(long, global = true, env = "MODELKIT_TRACKING_URI")]
    tracking_uri: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a flavor's configuration as JSON
    Flavor {
        /// Local model directory
        #[arg(value_name = "MODEL_PATH")]
        model_path: PathBuf,

        /// Flavor name (e.g. "sklearn")
        #[arg(value_name = "FLAVOR")]
        flavor: String,
    },
    /// Print model info for a model URI
    Info {
        /// Local path, file://, or runs:/ URI
        #[arg(value_name = "MODEL_URI")]
        model_uri: String,
    },
    /// Show or replace a model's signature
    Signature {
        #[command(subcommand)]
        command: SignatureCommand,
    },
    /// Add a flavor's bundled code to the module search path and list it
    CodePath {
        /// Local model directory
        #[arg(value_name = "MODEL_PATH")]
        model_path: PathBuf,

        /// Flavor whose code key is used
        #[arg(value_name = "FLAVOR")]
        flavor: String,
    },
}

#[derive(Subcommand)]
enum SignatureCommand {
    /// Print the signature recorded for a model
    Show {
        #[arg(value_name = "MODEL_URI")]
        model_uri: String,

        /// Print the raw signature dict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a model's signature with one read from a JSON file
    Set {
        #[arg(value_name = "MODEL_URI")]
        model_uri: String,

        /// File holding {"inputs": "...", "outputs": "..."}
        #[arg(value_name = "SIGNATURE_JSON_FILE")]
        signature_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_command(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config(tracking_uri: Option<String>) -> ModelkitConfig {
    let config = ModelkitConfig::default();
    match tracking_uri {
        Some(uri) => config.with_tracking_uri(uri),
        None => config,
    }
}

fn resolver(config: &ModelkitConfig) -> ArtifactResolver {
    log::debug!("Using tracking store at {}", config.tracking_uri);
    ArtifactResolver::from_config(config)
}

fn run_command(cli: Cli) -> Result<()> {
    let config = config(cli.tracking_uri);
    match cli.command {
        Commands::Flavor { model_path, flavor } => {
            commands::handle_flavor_command(&model_path, &flavor)
        }
        Commands::Info { model_uri } => {
            commands::handle_info_command(&resolver(&config), &model_uri)
        }
        Commands::Signature { command } => {
            let resolver = resolver(&config);
            match command {
                SignatureCommand::Show { model_uri, json } => {
                    commands::handle_signature_show(&resolver, &model_uri, json)
                }
                SignatureCommand::Set {
                    model_uri,
                    signature_file,
                } => commands::handle_signature_set(&resolver, &model_uri, &signature_file),
            }
        }
        Commands::CodePath { model_path, flavor } => {
            commands::handle_code_path_command(&config, &model_path, &flavor)
        }
    }
}
