//! Population generation: tier table → exact shuffled multiset of N
//! scaled multipliers.
//!
//! RULES:
//!   - Tier counts are floor(probability × N), applied in table order.
//!   - A shortfall is padded with the LAST tier's value, never spread
//!     proportionally. Tier order is therefore part of the contract.
//!   - An over-full table is truncated at N in table order; the number
//!     of dropped entries is recorded and logged.
//!   - One uniform shuffle over the whole population, driven by the
//!     caller's RNG.

use crate::{
    config::{ModeConfig, TierTable},
    error::{MathError, MathResult},
    types::{ScaledMultiplier, MULTIPLIER_SCALE},
};
use rand::{seq::SliceRandom, Rng};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    values: Vec<ScaledMultiplier>,
    /// Entries appended with the last tier's value to reach N.
    pub padded: usize,
    /// Entries dropped because floored tier counts exceeded N.
    pub truncated: usize,
}

impl Population {
    pub fn values(&self) -> &[ScaledMultiplier] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats::from_values(&self.values)
    }
}

/// Build the unshuffled population for `tiers` at size `total_entries`.
pub fn expand(tiers: &TierTable, total_entries: usize) -> MathResult<Population> {
    let last = tiers.last().ok_or_else(|| MathError::EmptyTierTable {
        mode: "<unnamed>".to_string(),
    })?;

    let mut values = Vec::with_capacity(total_entries);
    let mut truncated = 0usize;
    for tier in tiers.tiers() {
        let count = tier.floored_count(total_entries);
        let room = total_entries - values.len();
        let take = count.min(room);
        truncated += count - take;
        values.extend(std::iter::repeat(tier.scaled_multiplier()).take(take));
    }

    let padded = total_entries - values.len();
    values.resize(total_entries, last.scaled_multiplier());

    Ok(Population {
        values,
        padded,
        truncated,
    })
}

/// Expand a mode's tier table to `total_entries` values and shuffle it.
pub fn generate<R: Rng + ?Sized>(
    mode: &ModeConfig,
    total_entries: usize,
    rng: &mut R,
) -> MathResult<Population> {
    mode.validate()?;
    let mut population = expand(&mode.tiers, total_entries)?;

    if population.truncated > 0 {
        log::warn!(
            "mode={} tier counts exceed {total_entries} entries: truncated {} trailing entries",
            mode.name,
            population.truncated
        );
    }
    if population.padded > 0 {
        log::debug!(
            "mode={} padded {} entries with last tier value",
            mode.name,
            population.padded
        );
    }

    population.values.shuffle(rng);
    Ok(population)
}

/// Composition summary of a population or a reloaded flat table.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStats {
    pub entries: usize,
    pub histogram: BTreeMap<ScaledMultiplier, usize>,
}

impl PopulationStats {
    pub fn from_values(values: &[ScaledMultiplier]) -> Self {
        let mut histogram = BTreeMap::new();
        for &v in values {
            *histogram.entry(v).or_insert(0) += 1;
        }
        Self {
            entries: values.len(),
            histogram,
        }
    }

    pub fn count_of(&self, value: ScaledMultiplier) -> usize {
        self.histogram.get(&value).copied().unwrap_or(0)
    }

    pub fn zero_count(&self) -> usize {
        self.count_of(0)
    }

    /// Mean real multiplier across the population.
    pub fn measured_rtp(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        let total: u64 = self
            .histogram
            .iter()
            .map(|(&v, &n)| v as u64 * n as u64)
            .sum();
        total as f64 / MULTIPLIER_SCALE / self.entries as f64
    }
}
