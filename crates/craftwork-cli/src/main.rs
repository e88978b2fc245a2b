//! # Craftwork
//!
//! Command-line entry point: lists recipes from the recipe directory and
//! checks or crafts them against inventory snapshot files.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use craftwork_cli::commands;
use craftwork_cli::config::{CraftworkConfig, CONFIG_FILE};
use craftwork_cli::recipe_loader::RecipeLoader;
use craftwork_cli::snapshot::InventorySnapshot;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "craftwork", author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Override the recipe directory from the configuration file
    #[arg(short, long)]
    recipes: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded recipes
    List,
    /// Check whether a recipe can be crafted from an inventory snapshot
    Check {
        /// Recipe ID or name
        recipe: String,
        /// Inventory snapshot file
        #[arg(short, long)]
        inventory: PathBuf,
    },
    /// Craft a recipe against an inventory snapshot
    Craft {
        /// Recipe ID or name
        recipe: String,
        /// Inventory snapshot file
        #[arg(short, long)]
        inventory: PathBuf,
        /// Where to write the updated snapshot (defaults to the input file)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(args: &Args, config: &CraftworkConfig) -> Result<()> {
    let default_directive = if args.debug {
        "craftwork=debug"
    } else {
        config.log_filter.as_str()
    };
    let filter = EnvFilter::from_default_env().add_directive(default_directive.parse()?);

    // Logs go to stderr so command output stays machine-readable.
    if args.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = CraftworkConfig::load_from(&args.config);
    if let Some(dir) = &args.recipes {
        config.recipe_dir.clone_from(dir);
    }

    init_tracing(&args, &config)?;
    info!("Craftwork {}", env!("CARGO_PKG_VERSION"));

    let mut loader = RecipeLoader::new(&config.recipe_dir);
    loader
        .load_all()
        .with_context(|| format!("loading recipes from {}", config.recipe_dir.display()))?;

    match args.command {
        Command::List => {
            for line in commands::list(loader.registry()) {
                println!("{line}");
            }
        },
        Command::Check { recipe, inventory } => {
            let recipe = loader.recipe(&recipe)?;
            let snapshot = InventorySnapshot::load(&inventory)
                .with_context(|| format!("reading {}", inventory.display()))?;
            let outcome = commands::check(&recipe, &snapshot, &config)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        },
        Command::Craft {
            recipe,
            inventory,
            out,
        } => {
            let recipe = loader.recipe(&recipe)?;
            let snapshot = InventorySnapshot::load(&inventory)
                .with_context(|| format!("reading {}", inventory.display()))?;
            let (updated, output) = commands::craft(&recipe, &snapshot, &config)?;

            let out = out.unwrap_or(inventory);
            updated
                .save_to(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        },
    }

    Ok(())
}
