//! Orbita command-line interface.
//!
//! Compute hybrid-orbital isosurface meshes from TOML job files:
//! ```sh
//! orbita-cli run job.toml
//! orbita-cli validate job.toml
//! orbita-cli elements
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orbita_data::elements;

#[derive(Parser)]
#[command(name = "orbita-cli")]
#[command(about = "Orbita: Hybrid-Orbital Isosurface Pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the meshes for a job described in a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides the config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without computing anything.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the built-in element table.
    Elements,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Orbita Isosurface Pipeline");
            println!("==========================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            runner::run_job(&job, &out_dir)?;

            println!("Job complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate_job(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Elements => {
            println!("Available elements (Clementi–Raimondi exponents):");
            println!();
            for element in elements::all() {
                let zeta = &element.zeta;
                let mut exponents = Vec::new();
                if let Some(s) = zeta.s {
                    exponents.push(format!("ζs={s}"));
                }
                if let Some(p) = zeta.p {
                    exponents.push(format!("ζp={p}"));
                }
                if let Some(d) = zeta.d {
                    exponents.push(format!("ζd={d}"));
                }
                let schemes = if element.schemes.is_empty() {
                    "— (bonding partner only)".to_string()
                } else {
                    element
                        .schemes
                        .iter()
                        .map(|k| k.tag())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!(
                    "  {:2} — {:10} Z={:2}, {}, {}",
                    element.symbol,
                    element.name,
                    element.atomic_number,
                    element.valence_config,
                    exponents.join(", ")
                );
                println!("       hybridizations: {schemes}");
            }
            Ok(())
        }
    }
}
