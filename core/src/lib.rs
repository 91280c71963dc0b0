//! rtp-core: weighted-outcome math library generation and verification.
//!
//! Tier tables (config) expand into fixed-size shuffled populations
//! (population), which are written as a flat lookup table plus a zstd
//! record stream (writer) and listed in index.json (manifest). The
//! verifier reloads both artifacts and cross-checks them.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod population;
pub mod record;
pub mod rng;
pub mod types;
pub mod verifier;
pub mod writer;

pub use config::{MathConfig, ModeConfig, Tier, TierTable};
pub use engine::{GenerationEngine, GenerationSummary};
pub use error::{MathError, MathResult};
pub use verifier::{VerificationReport, Verifier};
