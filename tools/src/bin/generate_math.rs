//! generate-math: build the math library for every configured mode.
//!
//! Usage:
//!   generate-math --seed 12345
//!   generate-math --entries 10000 --library /tmp/library --config data/math_modes.json

use anyhow::Result;
use math_runner::{load_config, parse_arg, str_arg, DEFAULT_LIBRARY_DIR};
use rtp_core::GenerationEngine;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = load_config(&args)?;
    let seed = parse_arg(&args, "--seed", 42u64);
    config.total_entries = parse_arg(&args, "--entries", config.total_entries);
    config.compression_level = parse_arg(&args, "--level", config.compression_level);
    let library = str_arg(&args, "--library").unwrap_or(DEFAULT_LIBRARY_DIR);

    println!("Math library generator");
    println!("  seed:     {seed}");
    println!("  entries:  {}", config.total_entries);
    println!("  modes:    {}", config.modes.len());
    println!("  library:  {library}");
    println!();

    let engine = GenerationEngine::new(config, seed, library)?;
    let summary = engine.run()?;
    println!("{summary}");
    println!("✓ All math files generated successfully!");
    Ok(())
}
