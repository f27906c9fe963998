use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use energyprep_core::{PipelineConfig, generate_petroleum_shares};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "sharegen")]
#[command(about = "Builds the petroleum share table from the curated share CSV", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root that relative input and output paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Log filter (e.g. "info", "debug")
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

    let summary = generate_petroleum_shares(&cli.root, &config)?;

    println!(
        "{} {} petroleum share entries and default={:.2} to {}",
        "Wrote".green().bold(),
        summary.entries,
        summary.default.value,
        summary.output.display()
    );

    Ok(())
}
