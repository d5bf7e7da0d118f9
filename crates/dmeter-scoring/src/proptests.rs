//! Property-based tests for the calculators.
//!
//! - Trust is always within [0, 1]
//! - Trust never decreases when confidence, the source prior or data quality rises
//! - Rewards are deterministic and never depend on hidden state
//! - Out-of-range inputs score exactly like their clamped form

use proptest::prelude::*;

use dmeter_core::source::{
    ContributionHistory, DataQuality, DataSource, Decentralization, EcosystemServices,
    Engagement, GovernanceParticipation, PeerReviewPolicy, QualityMetrics, RegulatoryCompliance,
};
use dmeter_core::types::{DataType, SourceKind};
use dmeter_core::verification::{
    AuditStatus, CrossValidation, EcosystemAssessment, PeerReviewStatus, RegulatoryStatus,
    VerificationRecord,
};

use crate::{calculate_reward, trust_score};

fn kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::Satellite),
        Just(SourceKind::Iot),
        Just(SourceKind::Human),
        Just(SourceKind::Community),
    ]
}

fn quality() -> impl Strategy<Value = Option<DataQuality>> {
    prop::option::of((0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64).prop_map(
        |(accuracy, precision, reliability)| DataQuality {
            accuracy,
            precision,
            reliability,
        },
    ))
}

fn decentralization() -> impl Strategy<Value = Option<Decentralization>> {
    prop::option::of(
        (
            0u64..5_000,
            any::<bool>(),
            0u64..200,
            0u64..200,
            0.0..=1.0f64,
            0.0..=1.0f64,
        )
            .prop_map(
                |(node_count, consensus_required, validator_count, active, health, score)| {
                    Decentralization {
                        node_count,
                        consensus_required,
                        validator_count,
                        active_validators: active,
                        network_health: health,
                        decentralization_score: score,
                        ..Default::default()
                    }
                },
            ),
    )
}

fn engagement() -> impl Strategy<Value = Option<Engagement>> {
    prop::option::of(
        (
            0u64..1_000,
            0u64..1_000,
            0.0..=1.0f64,
            0.0..=2.0f64,
            0u64..500,
            0u64..500,
            0u64..50,
            0u64..50,
            0.0..=1.0f64,
        )
            .prop_map(
                |(contributors, active, community, rep, month, quarter, sub, passed, power)| {
                    Engagement {
                        contributor_count: contributors,
                        active_contributors: active,
                        community_score: community,
                        reputation_multiplier: rep,
                        contribution_history: ContributionHistory {
                            last_month: month,
                            last_quarter: quarter,
                            last_year: 0,
                        },
                        governance_participation: GovernanceParticipation {
                            proposals_submitted: sub,
                            proposals_passed: passed,
                            voting_power: power,
                        },
                        ..Default::default()
                    }
                },
            ),
    )
}

fn ecosystem() -> impl Strategy<Value = Option<EcosystemServices>> {
    prop::option::of(
        (
            0.0..=1.0f64,
            0.0..=1.0f64,
            (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64),
        )
            .prop_map(|(spatial, temporal, (a, p, r, c))| EcosystemServices {
                spatial_coverage: spatial,
                temporal_coverage: temporal,
                quality_metrics: QualityMetrics {
                    accuracy: a,
                    precision: p,
                    reliability: r,
                    completeness: c,
                },
                ..Default::default()
            }),
    )
}

fn source() -> impl Strategy<Value = DataSource> {
    (
        kind(),
        0.0..=1.0f64,
        quality(),
        decentralization(),
        engagement(),
        ecosystem(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(kind, trust, data_quality, decentralization, engagement, es, regulated, reviewed)| {
                let mut s = DataSource::new("prop", kind, trust, "prop");
                s.data_quality = data_quality;
                s.decentralization = decentralization;
                s.engagement = engagement;
                s.ecosystem_services = es;
                s.regulatory_compliance = regulated.then(RegulatoryCompliance::default);
                s.peer_review = reviewed.then(PeerReviewPolicy::default);
                s
            },
        )
}

/// Per-submission attestations, independent of confidence.
#[derive(Debug, Clone, Default)]
struct Attestations {
    agreement: Option<f64>,
    compliant: Option<bool>,
    review: Option<(bool, f64)>,
    assessed: Option<bool>,
}

fn attestations() -> impl Strategy<Value = Attestations> {
    (
        prop::option::of(0.0..=1.0f64),
        prop::option::of(any::<bool>()),
        prop::option::of((any::<bool>(), 0.0..=1.0f64)),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(agreement, compliant, review, assessed)| Attestations {
            agreement,
            compliant,
            review,
            assessed,
        })
}

fn record(confidence: f64, att: &Attestations) -> VerificationRecord {
    VerificationRecord {
        source: "prop".into(),
        timestamp: 0,
        signature: String::new(),
        proof: String::new(),
        method: "prop".into(),
        confidence,
        cross_validation: att.agreement.map(|agreement| CrossValidation {
            sources: vec![],
            agreement,
        }),
        calibration: None,
        regulatory_status: att.compliant.map(|compliant| RegulatoryStatus {
            compliant,
            standards: vec![],
            audit_status: if compliant {
                AuditStatus::Passed
            } else {
                AuditStatus::Failed
            },
        }),
        peer_review_status: att.review.map(|(completed, average_score)| PeerReviewStatus {
            completed,
            reviewers: 3,
            average_score,
            comments: vec![],
        }),
        ecosystem_services: att.assessed.map(|assessed| EcosystemAssessment {
            assessed,
            ..Default::default()
        }),
    }
}

fn bare(confidence: f64) -> VerificationRecord {
    record(confidence, &Attestations::default())
}

/// Values well outside [0, 1], including the non-finite ones.
fn wild() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -5.0..5.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn data_type() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..DataType::ALL.len()).prop_map(|i| DataType::ALL[i].name().to_string()),
        "[A-Za-z ]{0,16}",
    ]
}

proptest! {
    #[test]
    fn trust_is_bounded(
        s in source(),
        confidence in 0.0..=1.0f64,
        att in attestations(),
    ) {
        let t = trust_score(&s, &record(confidence, &att));
        prop_assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn trust_is_bounded_for_out_of_range_inputs(
        s in source(),
        prior in wild(),
        confidence in wild(),
        (a, p, r) in (wild(), wild(), wild()),
        agreement in wild(),
        review in wild(),
    ) {
        let mut s = s;
        s.trust_score = prior;
        s.data_quality = Some(DataQuality { accuracy: a, precision: p, reliability: r });
        let att = Attestations {
            agreement: Some(agreement),
            compliant: Some(true),
            review: Some((true, review)),
            assessed: Some(true),
        };
        let t = trust_score(&s, &record(confidence, &att));
        prop_assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn trust_is_monotone_in_prior(
        s in source(),
        confidence in 0.0..=1.0f64,
        att in attestations(),
        bump in 0.0..=1.0f64,
    ) {
        let rec = record(confidence, &att);
        let mut higher = s.clone();
        higher.trust_score = (s.trust_score + bump).min(1.0);
        prop_assert!(trust_score(&higher, &rec) >= trust_score(&s, &rec));
    }

    #[test]
    fn trust_is_monotone_in_quality(
        s in source(),
        confidence in 0.0..=1.0f64,
        att in attestations(),
        bump in 0.0..=1.0f64,
    ) {
        let rec = record(confidence, &att);
        let mut higher = s.clone();
        let q = s.data_quality.unwrap_or(DataQuality {
            accuracy: 0.0,
            precision: 0.0,
            reliability: 0.0,
        });
        higher.data_quality = Some(DataQuality {
            accuracy: (q.accuracy + bump).min(1.0),
            ..q
        });
        prop_assert!(trust_score(&higher, &rec) >= trust_score(&s, &rec));
    }

    #[test]
    fn trust_is_monotone_in_confidence(
        s in source(),
        att in attestations(),
        lo in 0.0..=1.0f64,
        hi in 0.0..=1.0f64,
    ) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        prop_assert!(trust_score(&s, &record(hi, &att)) >= trust_score(&s, &record(lo, &att)));
    }

    #[test]
    fn bare_source_scores_weighted_prior(
        k in kind(),
        prior in 0.0..=1.0f64,
        confidence in 0.0..=1.0f64,
    ) {
        let s = DataSource::new("bare", k, prior, "prop");
        let t = trust_score(&s, &bare(confidence));
        prop_assert!((t - 0.3 * prior * confidence).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_prior_and_confidence_score_as_clamped(
        k in kind(),
        prior in wild(),
        confidence in wild(),
    ) {
        let wild_source = DataSource::new("wild", k, prior, "prop");
        let clamped_source = DataSource::new("wild", k, clamp01(prior), "prop");
        prop_assert_eq!(
            trust_score(&wild_source, &bare(confidence)),
            trust_score(&clamped_source, &bare(clamp01(confidence)))
        );
    }

    #[test]
    fn out_of_range_prior_and_quality_reward_as_clamped(
        s in source(),
        dt in data_type(),
        prior in wild(),
        (a, p, r) in (wild(), wild(), wild()),
    ) {
        let mut wild_source = s.clone();
        wild_source.trust_score = prior;
        wild_source.data_quality = Some(DataQuality { accuracy: a, precision: p, reliability: r });

        let mut clamped = s;
        clamped.trust_score = clamp01(prior);
        clamped.data_quality = Some(DataQuality {
            accuracy: clamp01(a),
            precision: clamp01(p),
            reliability: clamp01(r),
        });
        prop_assert_eq!(
            calculate_reward(&dt, &wild_source).amount,
            calculate_reward(&dt, &clamped).amount
        );
    }

    #[test]
    fn reward_is_deterministic(s in source(), dt in data_type()) {
        prop_assert_eq!(calculate_reward(&dt, &s), calculate_reward(&dt, &s));
    }

    #[test]
    fn unknown_types_pay_nothing(s in source(), dt in "[a-z]{1,12}") {
        prop_assume!(DataType::from_name(&dt).is_none());
        prop_assert_eq!(calculate_reward(&dt, &s).amount, 0);
    }
}
