//! The structured outcome record ("book") shared by the writer and the
//! verifier. Field order is the on-disk key order.

use crate::types::{unscale_multiplier, ScaledMultiplier};
use serde::{Deserialize, Serialize};

/// Per-spin event detail. No events are produced yet, so this has no
/// variants and every record carries an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookEvent {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutcomeRecord {
    /// Position in the population. Always equals the line index.
    pub id: u64,
    pub payout_multiplier: ScaledMultiplier,
    pub events: Vec<BookEvent>,
    pub criteria: String,
    pub base_game_wins: f64,
    pub free_game_wins: f64,
}

impl OutcomeRecord {
    pub fn new(id: usize, payout_multiplier: ScaledMultiplier, criteria: &str) -> Self {
        Self {
            id: id as u64,
            payout_multiplier,
            events: Vec::new(),
            criteria: criteria.to_string(),
            base_game_wins: unscale_multiplier(payout_multiplier),
            free_game_wins: 0.0,
        }
    }
}
