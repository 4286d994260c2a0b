//! nestql CLI - Main entry point

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use nestql::Dialect;
use nestql_cli::commands;
use nestql_cli::config::{CONFIG_FILE, Config, Overrides};
use nestql_cli::error::CliError;
use nestql_cli::output;

/// nestql - compile nested relational filters into one SQL statement
#[derive(Parser, Debug)]
#[command(name = "nestql")]
#[command(author, version, about = "Compile nested relational filters into one SQL statement", long_about = None)]
struct Cli {
    /// Path to config file (default: nestql.config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the dialect from config (sqlite, postgresql, mysql)
    #[arg(long, global = true, value_parser = parse_dialect)]
    dialect: Option<Dialect>,

    /// Override the schema file from config
    #[arg(long, global = true, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Override the database from config
    #[arg(long, global = true, env = "NESTQL_DATABASE")]
    database: Option<String>,

    /// Log compiled SQL and query timings to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SQL a filter compiles to
    Compile {
        /// Root entity name
        entity: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Aggregate the root rows into one JSON array
        #[arg(long)]
        multiple: bool,
    },

    /// Run a filter and print the entity graph as JSON
    Query {
        /// Root entity name
        entity: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate the configuration and schema
    Check,

    /// Create a new nestql.config.toml
    Init {
        /// Database dialect (sqlite, postgresql, mysql)
        #[arg(short, long, default_value = "sqlite", value_parser = parse_dialect)]
        dialect: Dialect,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Filter as JSON, e.g. '{"where": {"id": 1}, "include": "orders"}'
    #[arg(short, long, conflicts_with = "filter_file")]
    filter: Option<String>,

    /// Read the filter from a JSON file
    #[arg(long, value_name = "PATH")]
    filter_file: Option<PathBuf>,
}

fn parse_dialect(s: &str) -> Result<Dialect, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::err_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = Overrides {
        dialect: cli.dialect,
        schema: cli.schema,
        database: cli.database,
    };
    let load = || Config::resolve(cli.config.as_deref(), &overrides);

    match cli.command {
        Command::Init { dialect } => run_init(dialect),
        Command::Check => commands::check::run(&load()?),
        Command::Compile {
            entity,
            filter,
            multiple,
        } => {
            let config = load()?;
            let filter = commands::read_filter(filter.filter.as_deref(), filter.filter_file.as_deref())?;
            commands::compile::run(&config, &entity, &filter, multiple)
        }
        Command::Query {
            entity,
            filter,
            pretty,
        } => {
            let config = load()?;
            let filter = commands::read_filter(filter.filter.as_deref(), filter.filter_file.as_deref())?;
            commands::query::run(&config, &entity, &filter, pretty)
        }
    }
}

/// Initialize a new nestql.config.toml file
fn run_init(dialect: Dialect) -> Result<(), CliError> {
    let config_path = PathBuf::from(CONFIG_FILE);

    if config_path.exists() {
        return Err(CliError::Other(format!(
            "{CONFIG_FILE} already exists. Delete it first to reinitialize."
        )));
    }

    let database = match dialect {
        Dialect::SQLite => "./dev.db",
        Dialect::PostgreSQL => "host=localhost user=postgres dbname=app",
        Dialect::MySQL => "mysql://root@localhost:3306/app",
    };
    let content = format!(
        r#"# nestql configuration

dialect = "{dialect}"
schema = "schema.toml"
database = "{database}"
"#
    );

    std::fs::write(&config_path, content).map_err(|e| CliError::IoError(e.to_string()))?;

    println!("{}", output::success(&format!("Created {CONFIG_FILE}")));
    println!();
    println!("Next steps:");
    println!("  1. Describe your entities in {}", "schema.toml".bright_cyan());
    println!("  2. Run {} to validate them", "nestql check".bright_cyan());
    println!(
        "  3. Run {} to see the SQL",
        "nestql compile <ENTITY> --filter '{}'".bright_cyan()
    );

    Ok(())
}
