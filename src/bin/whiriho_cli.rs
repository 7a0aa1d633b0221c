//! Command-line shell for the whiriho catalog manager.
//!
//! Usage:
//!   whiriho --config whiriho.json list
//!   whiriho meta app
//!   whiriho get app
//!   whiriho set app '{"port": 8080}'
//!   whiriho init --format json
//!
//! Each command loads the catalog (except `init`), calls exactly one catalog
//! operation, and prints the result; any catalog error aborts with a
//! non-zero status and the error's message on stderr.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use whiriho::{DEFAULT_CATALOG_PATH, Format, FormatChoice, Whiriho};

#[derive(Parser, Debug)]
#[command(name = "whiriho", version, about = "Manage a configuration file catalog")]
struct Cli {
    /// Catalog file path.
    #[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CATALOG_PATH)]
    config: PathBuf,
    /// Force the catalog codec format instead of inferring it from the
    /// file extension.
    #[arg(long, value_parser = ["yaml", "json", "ini"])]
    format: Option<String>,
    /// Permit entries with absolute paths (also needs --allow-unsafe).
    #[arg(long, global = true)]
    allow_absolute: bool,
    /// Skip the containment check on resolved entry paths.
    #[arg(long, global = true)]
    allow_unsafe: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the logical paths in the catalog.
    List,
    /// Print uri, format and schema of a catalog entry.
    Meta { path: String },
    /// Print the configuration data behind a logical path as JSON.
    Get { path: String },
    /// Write JSON configuration data to a logical path.
    Set {
        path: String,
        data: String,
        /// Skip schema validation before writing.
        #[arg(long)]
        no_validate: bool,
    },
    /// Print the JSON Schema attached to a logical path.
    Schema { path: String },
    /// Create a new empty catalog.
    Init {
        /// Codec format for the new catalog document.
        #[arg(long, value_parser = ["yaml", "json", "ini"])]
        format: Option<String>,
        /// Catalog version to declare.
        #[arg(long, default_value = "1.0.0")]
        version: String,
        /// Overwrite an existing catalog.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Whiriho::new(&cli.config, forced_format(cli.format.as_deref())?)
        .with_absolute_access(cli.allow_absolute)
        .with_unsafe_access(cli.allow_unsafe);

    match cli.command {
        Command::Init {
            format,
            version,
            force,
        } => {
            catalog.initialize(forced_format(format.as_deref())?, &version, force)?;
        }
        Command::List => {
            let catalog = load(catalog)?;
            for path in catalog.get_paths()? {
                println!("{path}");
            }
        }
        Command::Meta { path } => {
            let catalog = load(catalog)?;
            let meta = catalog.get_config_meta(&path)?;
            println!("URI: {}", meta.uri);
            println!("Format: {}", meta.format.map_or("none", |format| format.as_str()));
            println!("Schema: {}", meta.schema.as_deref().unwrap_or("none"));
        }
        Command::Get { path } => {
            let catalog = load(catalog)?;
            let data = catalog.get_config_data(&path)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Set {
            path,
            data,
            no_validate,
        } => {
            let catalog = load(catalog)?;
            let value: Value =
                serde_json::from_str(&data).context("parsing configuration data as JSON")?;
            catalog.set_config_data(&path, &value, !no_validate)?;
        }
        Command::Schema { path } => {
            let catalog = load(catalog)?;
            match catalog.get_config_schema(&path)? {
                Some(schema) => println!("{}", serde_json::to_string_pretty(&schema)?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}

fn load(mut catalog: Whiriho) -> Result<Whiriho> {
    catalog.load()?;
    Ok(catalog)
}

fn forced_format(name: Option<&str>) -> Result<FormatChoice> {
    match name {
        None => Ok(FormatChoice::Infer),
        Some(name) => Format::from_name(name)
            .map(FormatChoice::Forced)
            .ok_or_else(|| anyhow!("unknown format '{name}'")),
    }
}
