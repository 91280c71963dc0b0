//! Shared primitive types used across the math library.

/// A payout multiplier in fixed-point hundredths (2.5x is stored as 250).
pub type ScaledMultiplier = u32;

/// The canonical mode name ("base", "no_zero", "bonus", ...).
pub type ModeName = String;

/// Fixed-point scale applied to every multiplier before it is persisted.
pub const MULTIPLIER_SCALE: f64 = 100.0;

/// Convert a real multiplier to its persisted fixed-point form.
pub fn scale_multiplier(multiplier: f64) -> ScaledMultiplier {
    (multiplier * MULTIPLIER_SCALE).round() as ScaledMultiplier
}

/// Whether `multiplier` scales to a value a ScaledMultiplier can hold.
pub fn fits_scaled(multiplier: f64) -> bool {
    (multiplier * MULTIPLIER_SCALE).round() <= ScaledMultiplier::MAX as f64
}

/// Recover the real multiplier from its fixed-point form.
pub fn unscale_multiplier(scaled: ScaledMultiplier) -> f64 {
    scaled as f64 / MULTIPLIER_SCALE
}
