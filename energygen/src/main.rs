use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use energyprep_core::{PipelineConfig, generate_energy_data};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "energygen")]
#[command(about = "Builds the state and national energy tables from SEDS and MER inputs", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root that relative input and output paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Log filter (e.g. "info", "debug", "energyprep_core=trace")
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("Invalid log filter")?)
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig::discover(&cli.root, cli.config.as_deref())
        .context("Failed to load configuration")?;

    let summary = generate_energy_data(&cli.root, &config)?;

    println!(
        "{} {} state rows and {} national rows to {}",
        "Wrote".green().bold(),
        summary.state_rows,
        summary.national_rows,
        summary.output.display()
    );

    Ok(())
}
