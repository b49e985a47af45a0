use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;
mod config;
mod export;
mod init;
mod search;
mod source;
mod syntax;

use check::check;
use config::Config;
use export::{ExportFormat, export};
use init::init_config;
use search::{DisplayOptions, interactive_search, lookup, resolve};
use source::Source;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "doxsearch")]
#[command(about = "Query and maintain Doxygen search indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Search table to load (e.g. html/search/classes_5.js)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Doxygen search directory containing searchdata.js
    #[arg(long, global = true, conflicts_with = "file")]
    dir: Option<PathBuf>,

    /// Index section to use with --dir (all, classes, functions, ...)
    #[arg(long, global = true)]
    section: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List symbols whose search key starts with a prefix
    Lookup {
        /// Symbol name prefix as typed (e.g. "Factory<")
        query: String,
        /// Treat the query as an already-normalized key prefix
        #[arg(long)]
        raw: bool,
        /// Maximum number of results (defaults to max_results from doxsearch.toml)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print Doxygen search result markup instead of terminal output
        #[arg(long)]
        html: bool,
    },
    /// Show the link target(s) of an exact key
    Resolve {
        key: String,
        /// Variant index; all variants are shown if omitted
        #[arg(long)]
        variant: Option<usize>,
    },
    /// Verify key normalization, ordering and duplicates
    Check,
    /// Write the loaded table as Doxygen JavaScript or JSON
    Export {
        #[arg(long, value_enum, default_value = "js")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive prefix search
    Interactive,
    /// List the sections of a search directory
    Sections,
    /// Initialize a new doxsearch.toml configuration file
    Init {
        /// Overwrite existing doxsearch.toml if present
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load();

    let result = match cli.command {
        Commands::Init { force } => init_config(force),
        command => Source::select(cli.file, cli.dir, cli.section, &config)
            .and_then(|source| run(command, &source, &config, cli.verbose)),
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.red());
        std::process::exit(1);
    }
}

fn run(command: Commands, source: &Source, config: &Config, verbose: bool) -> Result<(), String> {
    let mut opts = DisplayOptions {
        base_url: config.base_url.clone(),
        highlight: config.highlight,
        max_results: config.max_results,
    };

    if verbose {
        eprintln!("{} Using {}", "📚".cyan(), source.describe());
    }

    match command {
        Commands::Lookup {
            query,
            raw,
            limit,
            html,
        } => {
            if let Some(limit) = limit {
                opts.max_results = limit;
            }
            lookup(source, &query, raw, html, &opts)
        }
        Commands::Resolve { key, variant } => resolve(source, &key, variant, &opts),
        Commands::Check => check(source, verbose),
        Commands::Export { format, output } => export(source, format, output.as_deref()),
        Commands::Interactive => interactive_search(source, &opts),
        Commands::Sections => list_sections(source),
        Commands::Init { .. } => unreachable!("init runs before a source is selected"),
    }
}

fn list_sections(source: &Source) -> Result<(), String> {
    let Source::Catalog { catalog, section } = source else {
        return Err("Sections are only available with --dir or search_dir".to_string());
    };

    println!("{} Sections in {}:\n", "📂".cyan(), catalog.dir().display());
    for s in catalog.sections() {
        let marker = if s.name == *section { "▸" } else { " " };
        println!(
            "  {} {:<12} {:<14} {} fragment(s)",
            marker.green(),
            s.name.green(),
            s.label,
            catalog.fragment_paths(s).len().to_string().dimmed()
        );
    }
    Ok(())
}
