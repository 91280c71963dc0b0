//! Population generation tests against the reference tier tables.

use rtp_core::{
    config::{MathConfig, ModeConfig, Tier},
    population,
    rng::RngBank,
};

const SEED: u64 = 0xFEED_BEEF_1234_ABCD;

#[test]
fn no_zero_reference_composition_is_exact() {
    let config = MathConfig::reference();
    let mode = config.require_mode("no_zero").unwrap();
    let mut rng = RngBank::new(SEED).for_mode(1);

    let pop = population::generate(mode, 1_000_000, &mut rng).unwrap();
    let stats = pop.stats();

    assert_eq!(pop.len(), 1_000_000);
    assert_eq!(stats.count_of(10_000), 500);
    assert_eq!(stats.count_of(2_000), 10_000);
    assert_eq!(stats.count_of(600), 50_000);
    assert_eq!(stats.count_of(200), 200_000);
    assert_eq!(stats.count_of(100), 739_500);
    assert_eq!(stats.zero_count(), 0);
    assert_eq!(pop.padded, 0);
    assert_eq!(pop.truncated, 0);
}

#[test]
fn every_reference_mode_has_exact_size_and_tier_counts() {
    let config = MathConfig::reference();
    let bank = RngBank::new(SEED);
    for n in [1_000_000usize, 9_999, 777] {
        for (i, mode) in config.modes.iter().enumerate() {
            let pop = population::generate(mode, n, &mut bank.for_mode(i)).unwrap();
            assert_eq!(pop.len(), n, "{} at N={n}", mode.name);

            let stats = pop.stats();
            let tiers = mode.tiers.tiers();
            let last = tiers.len() - 1;
            for (t, tier) in tiers.iter().enumerate() {
                let expected = tier.floored_count(n);
                let actual = stats.count_of(tier.scaled_multiplier());
                if t == last {
                    assert_eq!(actual, expected + pop.padded, "{} last tier", mode.name);
                } else {
                    assert_eq!(actual, expected, "{} tier {t} at N={n}", mode.name);
                }
            }
        }
    }
}

#[test]
fn no_zero_modes_never_generate_zero() {
    let config = MathConfig::reference();
    let bank = RngBank::new(SEED);
    for (i, mode) in config.modes.iter().enumerate() {
        let pop = population::generate(mode, 100_000, &mut bank.for_mode(i)).unwrap();
        if mode.allows_zero {
            assert!(pop.stats().zero_count() > 0, "{} should lose sometimes", mode.name);
        } else {
            assert_eq!(pop.stats().zero_count(), 0, "{}", mode.name);
        }
    }
}

#[test]
fn base_population_measures_target_rtp() {
    let config = MathConfig::reference();
    let mode = config.require_mode("base").unwrap();
    let pop = population::generate(mode, 1_000_000, &mut RngBank::new(SEED).for_mode(0))
        .unwrap();
    let rtp = pop.stats().measured_rtp();
    assert!((rtp - 0.96).abs() < 1e-9, "measured RTP {rtp}");
}

#[test]
fn overfull_table_is_truncated_at_n() {
    let mode = ModeConfig::new(
        "greedy",
        true,
        vec![Tier::new("a", 2.0, 0.8), Tier::new("b", 1.0, 0.8)],
    );
    let pop = population::generate(&mode, 1_000, &mut RngBank::new(1).for_mode(0)).unwrap();
    assert_eq!(pop.len(), 1_000);
    assert_eq!(pop.truncated, 600);
    assert_eq!(pop.stats().count_of(200), 800);
    assert_eq!(pop.stats().count_of(100), 200);
}

#[test]
fn shuffled_population_is_not_in_tier_order() {
    let config = MathConfig::reference();
    let mode = config.require_mode("bonus").unwrap();
    let pop = population::generate(mode, 10_000, &mut RngBank::new(SEED).for_mode(2)).unwrap();
    let mut sorted = pop.values().to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_ne!(pop.values(), &sorted[..]);
}
