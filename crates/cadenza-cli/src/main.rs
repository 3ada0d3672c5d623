use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cadenza_core::model::{ComposerId, CompositionFilter, CompositionId, CompositionRequest};
use cadenza_core::taxonomy::{Format, KeySignature};
use cadenza_server::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/cadenza/cadenza.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Serve the composition catalog over HTTP
    ///
    /// Exposes compositions and composers as a JSON API:
    ///
    /// - GET/POST        /api/composition
    /// - GET/PATCH/DELETE /api/composition/{id}
    /// - GET             /api/composer
    /// - GET/DELETE      /api/composer/{id}
    /// - GET             /health
    ///
    /// Listing accepts the query parameters name, keySignature,
    /// keySignatureDisplayName, format and composerName.
    Serve {
        /// Address to listen on (default from config: 127.0.0.1:5080)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Create, edit, remove and search compositions
    #[command(subcommand)]
    Composition(CompositionCommand),
    /// List or remove composers
    #[command(subcommand)]
    Composer(ComposerCommand),
    /// Show catalog statistics
    Status,
    /// Inspect and edit the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Fields shared by `composition add` and `composition edit`.
#[derive(Debug, clap::Args)]
struct CompositionFields {
    /// Key signature code, by name (e.g. CMinor) or number
    #[arg(long)]
    key: Option<KeySignature>,

    /// Key signature display name (e.g. "C Minor"); overrides --key
    #[arg(long)]
    key_name: Option<String>,

    /// Musical form (e.g. Symphony, StringQuartet)
    #[arg(long)]
    format: Option<Format>,

    /// Number of movements (0 leaves an existing count unchanged)
    #[arg(long)]
    movements: Option<i64>,

    /// Composer name; created if no composer has this name yet
    #[arg(long)]
    composer: Option<String>,

    /// Composer id; takes precedence over --composer
    #[arg(long)]
    composer_id: Option<ComposerId>,
}

#[derive(Debug, clap::Subcommand)]
enum CompositionCommand {
    /// Add a new composition
    Add {
        /// Composition name
        name: String,
        #[command(flatten)]
        fields: CompositionFields,
    },
    /// Change some fields of an existing composition
    Edit {
        id: CompositionId,
        /// New composition name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: CompositionFields,
    },
    /// Remove a composition (its composer is kept)
    Remove { id: CompositionId },
    /// Show one composition
    Show {
        id: CompositionId,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List compositions matching every given filter
    List {
        /// Substring of the composition name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        key: Option<KeySignature>,
        /// Key signature display name (e.g. "F# Minor")
        #[arg(long)]
        key_name: Option<String>,
        #[arg(long)]
        format: Option<Format>,
        /// Substring of the composer name
        #[arg(long)]
        composer: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ComposerCommand {
    /// List all composers
    List,
    /// Remove a composer and every composition it owns
    Remove { id: ComposerId },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            let config = Config::load()?.with_overrides(cli.db, listen);
            commands::run_server(config).await?;
        }
        Commands::Composition(command) => {
            let catalog = commands::open_catalog(&database_path(cli.db)?)?;
            match command {
                CompositionCommand::Add { name, fields } => {
                    let request = fields.into_request(Some(name));
                    commands::composition::add(&catalog, &request)?;
                }
                CompositionCommand::Edit { id, name, fields } => {
                    let request = fields.into_request(name);
                    commands::composition::edit(&catalog, id, &request)?;
                }
                CompositionCommand::Remove { id } => {
                    commands::composition::remove(&catalog, id)?;
                }
                CompositionCommand::Show { id, json } => {
                    commands::composition::show(&catalog, id, json)?;
                }
                CompositionCommand::List {
                    name,
                    key,
                    key_name,
                    format,
                    composer,
                    json,
                } => {
                    let filter = CompositionFilter {
                        name,
                        key_signature: key,
                        key_signature_display_name: key_name,
                        format,
                        composer_name: composer,
                    };
                    commands::composition::list(&catalog, &filter, json)?;
                }
            }
        }
        Commands::Composer(command) => {
            let catalog = commands::open_catalog(&database_path(cli.db)?)?;
            match command {
                ComposerCommand::List => commands::composer::list(&catalog)?,
                ComposerCommand::Remove { id } => commands::composer::remove(&catalog, id)?,
            }
        }
        Commands::Status => {
            commands::show_status(&database_path(cli.db)?)?;
        }
        Commands::Config(command) => match command {
            ConfigCommand::Show => commands::config::show_config()?,
            ConfigCommand::Get { key } => commands::config::get_config(key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path()?,
            ConfigCommand::Example => commands::config::show_example()?,
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

/// Resolve the database path from config, with `--db` taking precedence.
fn database_path(db: Option<PathBuf>) -> Result<PathBuf> {
    Ok(Config::load()?.with_overrides(db, None).database_path)
}

impl CompositionFields {
    fn into_request(self, name: Option<String>) -> CompositionRequest {
        CompositionRequest {
            name,
            key_signature: self.key,
            key_signature_display_name: self.key_name,
            number_of_movements: self.movements,
            format: self.format,
            composer_id: self.composer_id,
            composer_name: self.composer,
        }
    }
}
