use serde::{Deserialize, Serialize};

use dmeter_core::constants::{
    COMMUNITY_SCALE, CONSENSUS_NODE_REFERENCE, DECENTRALIZATION_SCALE, REWARD_COMPLIANCE_BONUS,
    REWARD_PEER_REVIEW_BONUS, UNKNOWN_DATA_TYPE_RATE,
};
use dmeter_core::source::DataSource;
use dmeter_core::types::{non_negative, unit_interval, DataType, TokenAmount};

use crate::trust::quality_terms;

/// Every factor that went into a reward, in the order applied.
///
/// Bonus factors are 1.0 when the corresponding block is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Tokens per submission for the data type; 0 for unknown types.
    pub base_rate: TokenAmount,
    pub source_multiplier: f64,
    pub trust: f64,
    pub quality: f64,
    pub decentralization_bonus: f64,
    pub engagement_bonus: f64,
    pub compliance_bonus: f64,
    pub peer_review_bonus: f64,
    /// Product of all of the above before rounding.
    pub total: f64,
    pub amount: TokenAmount,
}

/// Reward for one submission of `data_type` from `source`.
///
/// Uses the source's static trust prior, not the per-submission trust score.
/// Prior, quality and community score are clamped into [0, 1]; the
/// reputation multiplier is floored at 0.
pub fn calculate_reward(data_type: &str, source: &DataSource) -> RewardBreakdown {
    let base_rate = DataType::from_name(data_type)
        .map(|t| t.reward_rate())
        .unwrap_or(UNKNOWN_DATA_TYPE_RATE);
    let source_multiplier = source.kind.reward_multiplier();
    let trust = unit_interval(source.trust_score);
    let quality = source
        .data_quality
        .as_ref()
        .map(|q| {
            let (a, p, r) = quality_terms(q);
            (a + p + r) / 3.0
        })
        .unwrap_or(1.0);

    let decentralization_bonus = source
        .decentralization
        .as_ref()
        .filter(|d| d.consensus_required)
        .map(|d| 1.0 + d.node_count as f64 / CONSENSUS_NODE_REFERENCE * DECENTRALIZATION_SCALE)
        .unwrap_or(1.0);

    let engagement_bonus = source
        .engagement
        .as_ref()
        .map(|e| {
            (1.0 + unit_interval(e.community_score) * COMMUNITY_SCALE)
                * non_negative(e.reputation_multiplier)
        })
        .unwrap_or(1.0);

    let compliance_bonus = if source.regulatory_compliance.is_some() {
        REWARD_COMPLIANCE_BONUS
    } else {
        1.0
    };
    let peer_review_bonus = if source.peer_review.is_some() {
        REWARD_PEER_REVIEW_BONUS
    } else {
        1.0
    };

    let total = base_rate as f64
        * source_multiplier
        * trust
        * quality
        * decentralization_bonus
        * engagement_bonus
        * compliance_bonus
        * peer_review_bonus;

    RewardBreakdown {
        base_rate,
        source_multiplier,
        trust,
        quality,
        decentralization_bonus,
        engagement_bonus,
        compliance_bonus,
        peer_review_bonus,
        total,
        amount: round_tokens(total),
    }
}

/// Shorthand for `calculate_reward(..).amount`.
pub fn reward_amount(data_type: &str, source: &DataSource) -> TokenAmount {
    calculate_reward(data_type, source).amount
}

/// Round half away from zero; negative or non-finite totals pay nothing.
fn round_tokens(total: f64) -> TokenAmount {
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }
    let rounded = total.round();
    if rounded >= TokenAmount::MAX as f64 {
        TokenAmount::MAX
    } else {
        rounded as TokenAmount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmeter_core::source::{
        DataQuality, Decentralization, Engagement, PeerReviewPolicy, RegulatoryCompliance,
    };
    use dmeter_core::types::SourceKind;

    fn satellite() -> DataSource {
        let mut s = DataSource::new("Sat", SourceKind::Satellite, 0.95, "API");
        s.data_quality = Some(DataQuality {
            accuracy: 0.95,
            precision: 0.90,
            reliability: 0.98,
        });
        s
    }

    #[test]
    fn temperature_from_satellite() {
        let r = calculate_reward("Temperature", &satellite());
        assert_eq!(r.base_rate, 10);
        assert!((r.total - 13.44).abs() < 0.01);
        assert_eq!(r.amount, 13);
    }

    #[test]
    fn compliance_lifts_reward() {
        let mut s = satellite();
        s.regulatory_compliance = Some(RegulatoryCompliance::default());
        let r = calculate_reward("Temperature", &s);
        assert_eq!(r.compliance_bonus, 1.1);
        assert_eq!(r.amount, 15);
    }

    #[test]
    fn unknown_type_pays_nothing() {
        let mut s = satellite();
        s.regulatory_compliance = Some(RegulatoryCompliance::default());
        s.peer_review = Some(PeerReviewPolicy::default());
        let r = calculate_reward("Radiation", &s);
        assert_eq!(r.base_rate, 0);
        assert_eq!(r.amount, 0);
    }

    #[test]
    fn missing_quality_counts_as_one() {
        let s = DataSource::new("Plain", SourceKind::Human, 1.0, "manual");
        let r = calculate_reward("Air Quality", &s);
        assert_eq!(r.quality, 1.0);
        assert_eq!(r.amount, 15);
    }

    #[test]
    fn decentralization_needs_consensus() {
        let mut s = DataSource::new("Net", SourceKind::Community, 1.0, "consensus");
        s.decentralization = Some(Decentralization {
            node_count: 1000,
            consensus_required: false,
            ..Default::default()
        });
        assert_eq!(calculate_reward("Soil Quality", &s).decentralization_bonus, 1.0);

        s.decentralization.as_mut().unwrap().consensus_required = true;
        let r = calculate_reward("Soil Quality", &s);
        assert!((r.decentralization_bonus - 1.05).abs() < 1e-12);
        // 20 · 1.3 · 1.05 = 27.3
        assert_eq!(r.amount, 27);
    }

    #[test]
    fn engagement_and_peer_review() {
        let mut s = DataSource::new("Crowd", SourceKind::Human, 1.0, "manual");
        s.engagement = Some(Engagement {
            community_score: 0.5,
            reputation_multiplier: 2.0,
            ..Default::default()
        });
        s.peer_review = Some(PeerReviewPolicy::default());
        let r = calculate_reward("Pressure", &s);
        assert!((r.engagement_bonus - 2.1).abs() < 1e-12);
        assert_eq!(r.peer_review_bonus, 1.085);
        // 10 · 2.1 · 1.085 = 22.785
        assert_eq!(r.amount, 23);
    }

    #[test]
    fn negative_multiplier_pays_nothing() {
        let mut s = DataSource::new("Odd", SourceKind::Iot, 0.9, "sig");
        s.engagement = Some(Engagement {
            reputation_multiplier: -1.0,
            ..Default::default()
        });
        assert_eq!(reward_amount("Humidity", &s), 0);
    }

    #[test]
    fn out_of_range_prior_and_quality_are_clamped() {
        let mut s = DataSource::new("Loud", SourceKind::Human, 3.0, "manual");
        s.data_quality = Some(DataQuality {
            accuracy: 2.0,
            precision: 2.0,
            reliability: 2.0,
        });
        let r = calculate_reward("Temperature", &s);
        assert_eq!(r.trust, 1.0);
        assert_eq!(r.quality, 1.0);
        assert_eq!(r.amount, 10);

        s.engagement = Some(Engagement {
            community_score: 5.0,
            reputation_multiplier: 1.0,
            ..Default::default()
        });
        assert!((calculate_reward("Temperature", &s).engagement_bonus - 1.1).abs() < 1e-12);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let s = satellite();
        assert_eq!(
            calculate_reward("Water Quality", &s),
            calculate_reward("Water Quality", &s)
        );
    }
}
