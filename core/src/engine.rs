//! The generation engine: tier tables in, library directory out.
//!
//! EXECUTION ORDER (fixed, per mode, in config order):
//!   1. Sanity-check the tier table (warnings only)
//!   2. Generate + shuffle the population with the mode's RNG stream
//!   3. Enforce the zero rule for modes that forbid zero payouts
//!   4. Write the flat table and the record stream from that population
//! Before the first mode: remove any index.json from an earlier run.
//! After all modes: write index.json.
//!
//! RULES:
//!   - Any error aborts the whole run. There is no partial library: a
//!     run that fails leaves no index, so nothing verifies against it.
//!   - All randomness flows through the RngBank.

use crate::{
    codec::ZstdCodec,
    config::{ConfigWarning, MathConfig, ModeConfig},
    error::{MathError, MathResult},
    manifest::{Index, ModeManifestEntry},
    population::{self, Population},
    rng::RngBank,
    writer::LibraryWriter,
};
use std::{fmt, path::PathBuf};

pub struct GenerationEngine {
    pub config: MathConfig,
    pub rng_bank: RngBank,
    writer: LibraryWriter,
}

/// What one mode's generation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSummary {
    pub name: String,
    pub entries: usize,
    pub padded: usize,
    pub truncated: usize,
    pub zero_count: usize,
    pub table_rtp: f64,
    pub measured_rtp: f64,
    pub warnings: Vec<ConfigWarning>,
    pub manifest: ModeManifestEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub seed: u64,
    pub index_path: PathBuf,
    pub modes: Vec<ModeSummary>,
}

impl GenerationEngine {
    /// Prepare the output directory. Fails if it cannot be created.
    pub fn new(config: MathConfig, seed: u64, library_dir: impl Into<PathBuf>) -> MathResult<Self> {
        let codec = ZstdCodec::new(config.compression_level);
        let writer = LibraryWriter::create(library_dir, codec)?;
        Ok(Self {
            config,
            rng_bank: RngBank::new(seed),
            writer,
        })
    }

    /// Generate the shuffled population for the mode at `index`.
    pub fn population_for(&self, index: usize, mode: &ModeConfig) -> MathResult<Population> {
        let mut rng = self.rng_bank.for_mode(index);
        population::generate(mode, self.config.total_entries, &mut rng)
    }

    /// Generate every mode and write the index.
    pub fn run(&self) -> MathResult<GenerationSummary> {
        self.writer.remove_index()?;

        let mut modes = Vec::with_capacity(self.config.modes.len());
        for (index, mode) in self.config.modes.iter().enumerate() {
            modes.push(self.run_mode(index, mode)?);
        }

        let index = Index::new(modes.iter().map(|m| m.manifest.clone()).collect());
        let index_path = self.writer.write_index(&index)?;

        Ok(GenerationSummary {
            seed: self.rng_bank.master_seed(),
            index_path,
            modes,
        })
    }

    fn run_mode(&self, index: usize, mode: &ModeConfig) -> MathResult<ModeSummary> {
        let warnings = mode.tiers.check(self.config.target_rtp);
        for warning in &warnings {
            log::warn!("mode={} config: {warning}", mode.name);
        }

        let population = self.population_for(index, mode)?;
        let stats = population.stats();

        if !mode.allows_zero && stats.zero_count() > 0 {
            return Err(MathError::DomainViolation {
                mode: mode.name.clone(),
                zeros: stats.zero_count(),
            });
        }

        let manifest = self.writer.write_mode(&mode.name, population.values())?;
        log::info!(
            "mode={} generated {} entries (padded {}, measured RTP {:.4})",
            mode.name,
            population.len(),
            population.padded,
            stats.measured_rtp()
        );

        Ok(ModeSummary {
            name: mode.name.clone(),
            entries: population.len(),
            padded: population.padded,
            truncated: population.truncated,
            zero_count: stats.zero_count(),
            table_rtp: mode.tiers.expected_value(),
            measured_rtp: stats.measured_rtp(),
            warnings,
            manifest,
        })
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GENERATION SUMMARY ===")?;
        writeln!(f, "  seed:  {}", self.seed)?;
        writeln!(f, "  index: {}", self.index_path.display())?;
        for m in &self.modes {
            writeln!(f)?;
            writeln!(f, "  [{}]", m.name.to_uppercase())?;
            writeln!(f, "    {} -> {} entries", m.manifest.weights, m.entries)?;
            writeln!(f, "    {}", m.manifest.events)?;
            writeln!(
                f,
                "    table RTP: {:.4} | measured RTP: {:.4} | zeros: {}",
                m.table_rtp, m.measured_rtp, m.zero_count
            )?;
            if m.padded > 0 || m.truncated > 0 {
                writeln!(f, "    padded: {} | truncated: {}", m.padded, m.truncated)?;
            }
            for w in &m.warnings {
                writeln!(f, "    [!] warning: {w}")?;
            }
        }
        Ok(())
    }
}
