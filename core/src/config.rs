//! Mode and tier configuration.
//!
//! Tier tables are immutable values. They are built once (from the
//! reference tables or a JSON file) and passed explicitly to the
//! generator and verifier.

use crate::{
    error::{MathError, MathResult},
    types::{fits_scaled, scale_multiplier, ModeName, ScaledMultiplier},
};
use serde::{Deserialize, Serialize};

/// Global RTP target shared by every mode.
pub const TARGET_RTP: f64 = 0.96;
/// Population size of the reference configuration.
pub const TOTAL_ENTRIES: usize = 1_000_000;
/// zstd level used for record streams.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Allowed drift of a table's probability sum from 1.0.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;
/// Allowed drift of a table's expected value from the RTP target.
pub const RTP_TOLERANCE: f64 = 1e-2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    #[serde(default)]
    pub label: String,
    pub multiplier: f64,
    pub probability: f64,
}

impl Tier {
    pub fn new(label: &str, multiplier: f64, probability: f64) -> Self {
        Self {
            label: label.to_string(),
            multiplier,
            probability,
        }
    }

    pub fn scaled_multiplier(&self) -> ScaledMultiplier {
        scale_multiplier(self.multiplier)
    }

    /// Number of population slots this tier claims before padding.
    pub fn floored_count(&self, total_entries: usize) -> usize {
        (self.probability * total_entries as f64).floor() as usize
    }
}

/// Ordered tier list for one mode. Order is observable: the last
/// tier absorbs any floor-rounding shortfall during generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable(Vec<Tier>);

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self(tiers)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Tier> {
        self.0.last()
    }

    pub fn probability_sum(&self) -> f64 {
        self.0.iter().map(|t| t.probability).sum()
    }

    /// Σ multiplier·probability, the table's theoretical RTP.
    pub fn expected_value(&self) -> f64 {
        self.0.iter().map(|t| t.multiplier * t.probability).sum()
    }

    pub fn has_zero_tier(&self) -> bool {
        self.0.iter().any(|t| t.scaled_multiplier() == 0)
    }

    /// Sanity-check the table against the RTP target. Never fails;
    /// out-of-tolerance tables only produce warnings.
    pub fn check(&self, target_rtp: f64) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let probability_sum = self.probability_sum();
        if (probability_sum - 1.0).abs() >= PROBABILITY_SUM_TOLERANCE {
            warnings.push(ConfigWarning::ProbabilitySum {
                actual: probability_sum,
            });
        }
        let rtp = self.expected_value();
        if (rtp - target_rtp).abs() >= RTP_TOLERANCE {
            warnings.push(ConfigWarning::Rtp {
                actual: rtp,
                target: target_rtp,
            });
        }
        warnings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    ProbabilitySum { actual: f64 },
    Rtp { actual: f64, target: f64 },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProbabilitySum { actual } => {
                write!(f, "probability sum {actual:.4} is not 1.0")
            }
            Self::Rtp { actual, target } => {
                write!(f, "RTP {actual:.4} is off target {target:.4}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub name: ModeName,
    /// Whether zero-payout entries may appear in this mode's population.
    pub allows_zero: bool,
    pub tiers: TierTable,
}

impl ModeConfig {
    pub fn new(name: &str, allows_zero: bool, tiers: Vec<Tier>) -> Self {
        Self {
            name: name.to_string(),
            allows_zero,
            tiers: TierTable::new(tiers),
        }
    }

    /// Reject tables the generator cannot expand.
    pub fn validate(&self) -> MathResult<()> {
        if self.tiers.is_empty() {
            return Err(MathError::EmptyTierTable {
                mode: self.name.clone(),
            });
        }
        for (index, tier) in self.tiers.tiers().iter().enumerate() {
            let reason = if !tier.multiplier.is_finite() || tier.multiplier < 0.0 {
                format!("multiplier {} must be finite and >= 0", tier.multiplier)
            } else if !fits_scaled(tier.multiplier) {
                format!("multiplier {} overflows the fixed-point range", tier.multiplier)
            } else if !(0.0..=1.0).contains(&tier.probability) {
                format!("probability {} must be within [0, 1]", tier.probability)
            } else {
                continue;
            };
            return Err(MathError::InvalidTier {
                mode: self.name.clone(),
                index,
                reason,
            });
        }
        Ok(())
    }

    pub fn flat_table_file(&self) -> String {
        flat_table_file(&self.name)
    }

    pub fn record_stream_file(&self) -> String {
        record_stream_file(&self.name)
    }
}

pub fn flat_table_file(mode: &str) -> String {
    format!("lookUpTable_{mode}_0.csv")
}

pub fn record_stream_file(mode: &str) -> String {
    format!("books_{mode}.jsonl.zst")
}

/// Zero rule for modes that are not described by a config.
pub fn builtin_allows_zero(mode: &str) -> bool {
    !matches!(mode, "no_zero" | "bonus")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathConfig {
    pub target_rtp: f64,
    pub total_entries: usize,
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
    pub modes: Vec<ModeConfig>,
}

fn default_compression_level() -> i32 {
    DEFAULT_COMPRESSION_LEVEL
}

impl MathConfig {
    /// Load from a JSON file shaped like `data/math_modes.json`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: MathConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        for mode in &config.modes {
            mode.validate()?;
        }
        Ok(config)
    }

    /// The three production modes at 1,000,000 entries.
    pub fn reference() -> Self {
        Self {
            target_rtp: TARGET_RTP,
            total_entries: TOTAL_ENTRIES,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            modes: vec![
                ModeConfig::new(
                    "base",
                    true,
                    vec![
                        Tier::new("insane", 100.0, 0.0002),
                        Tier::new("big", 20.0, 0.005),
                        Tier::new("medium", 6.0, 0.04),
                        Tier::new("small", 2.0, 0.30),
                        Tier::new("lose", 0.0, 0.6548),
                    ],
                ),
                ModeConfig::new(
                    "no_zero",
                    false,
                    vec![
                        Tier::new("insane", 100.0, 0.0005),
                        Tier::new("big", 20.0, 0.01),
                        Tier::new("medium", 6.0, 0.05),
                        Tier::new("small", 2.0, 0.20),
                        Tier::new("tiny", 1.0, 0.7395),
                    ],
                ),
                ModeConfig::new(
                    "bonus",
                    false,
                    vec![
                        Tier::new("insane", 100.0, 0.001),
                        Tier::new("big", 20.0, 0.015),
                        Tier::new("medium", 6.0, 0.06),
                        Tier::new("small", 2.0, 0.15),
                        Tier::new("tiny", 1.0, 0.774),
                    ],
                ),
            ],
        }
    }

    /// Reference tables with a small population, for unit tests.
    pub fn default_test() -> Self {
        Self {
            total_entries: 10_000,
            ..Self::reference()
        }
    }

    pub fn with_total_entries(mut self, total_entries: usize) -> Self {
        self.total_entries = total_entries;
        self
    }

    pub fn mode(&self, name: &str) -> Option<&ModeConfig> {
        self.modes.iter().find(|m| m.name == name)
    }

    pub fn require_mode(&self, name: &str) -> MathResult<&ModeConfig> {
        self.mode(name).ok_or_else(|| MathError::ModeNotFound {
            name: name.to_string(),
        })
    }
}

impl Default for MathConfig {
    fn default() -> Self {
        Self::reference()
    }
}
