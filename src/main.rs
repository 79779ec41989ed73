//! Cognet CLI - import cognate data, query chains, and run the HTTP API

mod commands;

use clap::{Parser, Subcommand};
use cognet::config::{self, CognetConfig};
use cognet::output::{self, OutputMode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cognet")]
#[command(version)]
#[command(about = "Cognate chain service - explore related words across languages on a map")]
#[command(long_about = r#"
Cognet turns pairwise cognate records into connected word chains, each word
placed on a map at its language's coordinates.

Example usage:
  cognet import --file cognates.tsv
  cognet import-languages --file languages.json
  cognet chains --concept 1234 --word mother --lang eng
  cognet serve --port 3000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of styled text
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to ./cognet.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config and COGNET_DATABASE)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Import cognate pairs from a TSV file
    Import {
        /// TSV file (header line, then concept, lang1, word1, lang2, word2[, translit1[, translit2]])
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Import language records from a JSON array
    ImportLanguages {
        /// JSON file with code, name, coordinates, flag and country per language
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Suggest words starting with a prefix
    Suggest {
        /// Word prefix (at least two characters)
        prefix: String,
    },

    /// List the raw cognate pairs of a concept
    Concept {
        /// Concept ID
        id: String,
    },

    /// Discover the cognate chains of a concept
    Chains {
        /// Concept ID
        #[arg(long)]
        concept: String,

        /// Only return the chain holding this word (requires --lang)
        #[arg(short, long, requires = "lang")]
        word: Option<String>,

        /// Language code of --word
        #[arg(short, long, requires = "word")]
        lang: Option<String>,
    },

    /// Show statistics about the database
    Stats,

    /// Delete every stored record
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Serve { .. } => "serve",
            Commands::Import { .. } => "import",
            Commands::ImportLanguages { .. } => "import-languages",
            Commands::Suggest { .. } => "suggest",
            Commands::Concept { .. } => "concept",
            Commands::Chains { .. } => "chains",
            Commands::Stats => "stats",
            Commands::Clear { .. } => "clear",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = OutputMode::from_json_flag(cli.json);
    let command = cli.command.name();

    match run(cli, output_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{} failed: {:?}", command, err);
            output::emit_failure(output_mode, command, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut settings = config::load_config(cli.config.as_deref())?
        .unwrap_or_default()
        .with_env_overrides()?;
    if let Some(database) = &cli.database {
        settings.database = Some(database.to_string_lossy().into_owned());
    }

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            commands::run_init(output_mode, &path, &settings, force)?;
        }

        Commands::Serve { host, port } => {
            let settings = CognetConfig {
                host: host.or(settings.host),
                port: port.or(settings.port),
                ..settings
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cognet::server::start_server(&settings))?;
        }

        Commands::Import { file } => {
            commands::run_import(output_mode, &settings, &file)?;
        }

        Commands::ImportLanguages { file } => {
            commands::run_import_languages(output_mode, &settings, &file)?;
        }

        Commands::Suggest { prefix } => {
            commands::run_suggest(output_mode, &settings, &prefix)?;
        }

        Commands::Concept { id } => {
            commands::run_concept(output_mode, &settings, &id)?;
        }

        Commands::Chains { concept, word, lang } => {
            commands::run_chains(output_mode, &settings, &concept, word.as_deref(), lang.as_deref())?;
        }

        Commands::Stats => {
            commands::run_stats(output_mode, &settings)?;
        }

        Commands::Clear { yes } => {
            commands::run_clear(output_mode, &settings, yes)?;
        }
    }

    Ok(())
}
