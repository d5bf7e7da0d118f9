//! Rewards for the stock catalog, as shown on the submission form.

use dmeter_registry::SourceRegistry;
use dmeter_scoring::{calculate_reward, reward_amount};

#[test]
fn sentinel_temperature_pays_thirteen() {
    let reg = SourceRegistry::builtin();
    let sentinel = reg.find_source_by_name("Sentinel-2").unwrap();
    assert_eq!(reward_amount("Temperature", sentinel), 13);
}

#[test]
fn community_network_gets_consensus_and_engagement_bonuses() {
    let reg = SourceRegistry::builtin();
    let net = reg.find_source_by_name("dMeter Community Network").unwrap();
    let r = calculate_reward("Air Quality", net);
    assert!((r.decentralization_bonus - 1.05).abs() < 1e-12);
    assert!((r.engagement_bonus - 1.092 * 1.2).abs() < 1e-12);
    // 15 · 1.3 · 0.85 · 0.8767 · 1.05 · 1.3104 ≈ 20.0
    assert_eq!(r.amount, 20);
}

#[test]
fn every_builtin_source_pays_for_every_known_type() {
    let reg = SourceRegistry::builtin();
    for source in reg.iter() {
        for dt in dmeter_core::DataType::ALL {
            assert!(reward_amount(dt.name(), source) > 0, "{} / {dt}", source.name);
        }
        assert_eq!(reward_amount("Unknown", source), 0);
    }
}
