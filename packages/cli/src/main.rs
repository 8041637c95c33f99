#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the heat vulnerability map generator.
//!
//! `generate` runs the full pipeline for one city (attributes, tract
//! polygons, CSV and `GeoJSON` outputs), `list-cities` shows the embedded
//! registry, and `probe` records upstream data-source availability.

mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "heat_vuln_cli",
    about = "Generate synthetic heat vulnerability maps for Connecticut cities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the tract map and attribute table for one city
    Generate {
        /// City id from the registry (e.g. "hartford")
        #[arg(long)]
        city: String,

        /// Tract partition algorithm: "grid" or "voronoi"
        #[arg(long, default_value = "voronoi")]
        algorithm: String,

        /// Output directory for the CSV and GeoJSON artifacts
        #[arg(long, default_value = "data/generated")]
        out: PathBuf,

        /// Optional ACS-shaped CSV with real demographic rows
        #[arg(long)]
        acs_csv: Option<PathBuf>,

        /// Optional GeoJSON file overriding the embedded city boundary
        #[arg(long)]
        boundary: Option<PathBuf>,

        /// Override the city's configured random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the cities available in the embedded registry
    ListCities,

    /// Probe upstream data sources and record availability metadata
    Probe {
        /// Output directory for the metadata JSON files
        #[arg(long, default_value = "data/generated")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            city,
            algorithm,
            out,
            acs_csv,
            boundary,
            seed,
        } => {
            pipeline::generate(&pipeline::GenerateArgs {
                city,
                algorithm,
                out,
                acs_csv,
                boundary,
                seed,
            })?;
        }
        Commands::ListCities => {
            for config in heat_vuln_city::registry::all_cities() {
                println!(
                    "{:<12} {} ({} tracts, seed {})",
                    config.id, config.name, config.tract_count, config.seed
                );
            }
        }
        Commands::Probe { out } => {
            let written = heat_vuln_acs::probe::run_probes(&out).await?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
