//! verify-math: cross-check the flat tables against the record streams.
//!
//! Usage:
//!   verify-math
//!   verify-math --library /tmp/library --config data/math_modes.json
//!
//! Exits 1 if any mode has a count, positional, domain or I/O failure.

use anyhow::Result;
use math_runner::{load_config, str_arg, DEFAULT_LIBRARY_DIR};
use rtp_core::Verifier;
use std::{env, process::ExitCode};

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;
    let library = str_arg(&args, "--library").unwrap_or(DEFAULT_LIBRARY_DIR);

    let report = Verifier::new(library, &config).verify()?;
    println!("{report}");

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        log::error!("verification failed for: {}", report.failed_modes().join(", "));
        Ok(ExitCode::FAILURE)
    }
}
