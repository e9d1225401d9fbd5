use clap::{Parser, Subcommand};
use cli::{CliConfig, InspectReport};
use color_eyre::eyre::Result;
use roi::{RegionCollection, regroup, upload};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML or JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a collection and report its planes, axes and bounds
    Inspect {
        /// Path to the collection JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Export a collection as GeoJSON in image coordinates
    Geojson {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Decode, re-assemble and reconcile a collection against itself
    Reupload {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print job parameter prototypes
    Params,
    /// Print the JSON schema of the settings file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    match &cli.command {
        Commands::Inspect { input } => inspect(input, &config)?,
        Commands::Geojson { input, output } => export_geojson(input, output, &config)?,
        Commands::Reupload { input, output } => reupload(input, output, &config)?,
        Commands::Params => {
            for (name, param) in config.job_params() {
                println!("{name}: {}", serde_json::to_string(&param)?);
            }
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&schemars::schema_for!(CliConfig))?);
        }
    }

    Ok(())
}

fn inspect(input: &Path, config: &CliConfig) -> Result<()> {
    let collection = RegionCollection::load_json(input)?;
    let decoded = regroup(&collection, &config.conversion.raster);
    let report = InspectReport::from(&decoded);
    for skipped in decoded.skipped() {
        warn!("Record {} not decoded: {}", skipped.index, skipped.reason);
    }
    info!("Decoded {} shapes on {} planes", report.shapes, report.planes.len());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn export_geojson(input: &Path, output: &Path, config: &CliConfig) -> Result<()> {
    let collection = RegionCollection::load_json(input)?;
    collection.save_geojson(output, &config.conversion)?;
    info!("Exported {} features to {:?}", collection.len(), output);
    Ok(())
}

fn reupload(input: &Path, output: &Path, config: &CliConfig) -> Result<()> {
    let previous = RegionCollection::load_json(input)?;
    let options = &config.conversion.raster;
    let decoded = regroup(&previous, options);
    let region = decoded.to_region()?;
    let (mut collection, report) = upload(&region, Some(&previous), options)?;

    // Undecodable records are passed through as stored.
    for skipped in decoded.skipped() {
        warn!("Record {} passed through undecoded: {}", skipped.index, skipped.reason);
        collection.push(skipped.record.clone());
    }

    if report.new > 0 {
        warn!("{} shapes could not be paired with a stored shape", report.new);
    }
    info!(
        "Reconciled {} shapes: {} exact, {} by order",
        collection.len(),
        report.exact,
        report.by_order
    );
    collection.save_json(output)?;
    info!("Collection saved to: {:?}", output);
    Ok(())
}
