//! Pile fixture generator.
//!
//! Writes `pile.bin`: a synthetic 11x21 geoid grid followed by the matching
//! datum grid, as raw little-endian `f32`. With no arguments it writes
//! `pile.bin` in the working directory.
//!
//! Usage:
//!   pile-generator [--output pile.bin] [--descriptor pile.gys] [--verify]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use pile::{verify_pile_file, write_descriptor_file, write_pile_file, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "pile-generator")]
#[command(about = "Generate the pile.bin geoid/datum test fixture")]
struct Args {
    /// Output file [default: pile.bin, or $PILE_OUTPUT]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write grid descriptors to this file [$PILE_DESCRIPTOR]
    #[arg(short, long)]
    descriptor: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the file back and verify every value after writing [$PILE_VERIFY]
    #[arg(long)]
    verify: bool,

    /// Print positive infinity and NaN to stdout
    #[arg(long)]
    print_special_values: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Merge defaults, config file, environment and flags, in that order.
fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    resolve_config_with(args, |key| std::env::var(key).ok())
}

/// Same as [`resolve_config`], resolving environment variables through `lookup`.
fn resolve_config_with<F>(args: &Args, lookup: F) -> Result<GeneratorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    config.apply_env_with(lookup);

    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(descriptor) = &args.descriptor {
        config.descriptor_path = Some(descriptor.clone());
    }
    if args.verify {
        config.verify = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Write the pile and any requested extras.
fn run(config: &GeneratorConfig) -> Result<()> {
    let result = write_pile_file(&config.output_path).with_context(|| {
        format!("Failed to write {}", config.output_path.display())
    })?;
    debug!(bytes = result.bytes_written, "Pile written");

    if let Some(descriptor) = &config.descriptor_path {
        write_descriptor_file(descriptor)
            .with_context(|| format!("Failed to write {}", descriptor.display()))?;
    }

    if config.verify {
        verify_pile_file(&config.output_path).with_context(|| {
            format!("Verification of {} failed", config.output_path.display())
        })?;
    }

    Ok(())
}

/// The two values the fixture tool has always printed after writing.
fn special_values() -> (f64, f64) {
    (f64::INFINITY, f64::NAN)
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    info!(
        output = %config.output_path.display(),
        descriptor = ?config.descriptor_path,
        verify = config.verify,
        "Generating pile"
    );

    run(&config)?;

    if args.print_special_values {
        let (infinity, nan) = special_values();
        println!("{:.6}\n{:.6}", infinity, nan);
    }

    Ok(())
}
