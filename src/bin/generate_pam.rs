//! Generate a PAMx score matrix from a PAM1 table
//!
//! Usage:
//!   cargo run --release --bin generate_pam -- [x] [input] [output] [config.json]
//!
//! Missing arguments fall back to PAM_DISTANCE (250), PAM_INPUT
//! (data/pam1_dayhoff.txt), PAM_OUTPUT (pam250.txt) and PAM_CONFIG (none).
//! Without a config file the Dayhoff background frequencies are used.

use anyhow::{Context, Result};
use pam_builder::{FrequencySource, PamConfig, PamGenerator};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pam_builder=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let mut setting = |env_key: &str, default: Option<&str>| -> Option<String> {
        args.next()
            .or_else(|| std::env::var(env_key).ok())
            .or_else(|| default.map(str::to_string))
    };

    let distance_arg = setting("PAM_DISTANCE", Some("250")).unwrap_or_default();
    let input = PathBuf::from(setting("PAM_INPUT", Some("data/pam1_dayhoff.txt")).unwrap_or_default());
    let output = PathBuf::from(setting("PAM_OUTPUT", Some("pam250.txt")).unwrap_or_default());
    let config_path = setting("PAM_CONFIG", None).map(PathBuf::from);

    let distance: u32 = distance_arg
        .parse()
        .with_context(|| format!("Evolutionary distance must be a positive integer, got '{}'", distance_arg))?;

    println!("\n{}", "=".repeat(70));
    println!("PAM{} MATRIX GENERATION", distance);
    println!("{}", "=".repeat(70));

    let config = match &config_path {
        Some(path) => {
            println!("Config:  {}", path.display());
            PamConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => {
            println!("Config:  defaults (Dayhoff background frequencies)");
            PamConfig {
                frequencies: FrequencySource::Dayhoff,
                ..PamConfig::default()
            }
        }
    };
    println!("Input:   {}", input.display());
    println!("Output:  {}", output.display());

    let start = Instant::now();
    let generator = PamGenerator::new(config)?;
    let table = generator
        .generate(distance, &input, &output)
        .with_context(|| format!("Failed to generate PAM{} from {}", distance, input.display()))?;

    println!("\n{}", "=".repeat(70));
    println!("SUMMARY");
    println!("{}", "=".repeat(70));
    println!(
        "Score range:     [{}, {}]",
        table.scores.min().unwrap_or(0),
        table.scores.max().unwrap_or(0)
    );
    println!("Symmetric:       {}", table.scores.is_symmetric());
    println!("Expected score:  {:.4}", table.expected_score()?);
    println!("Elapsed:         {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);
    println!("\n✓ Saved: {}", output.display());

    Ok(())
}
