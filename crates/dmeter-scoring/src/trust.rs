use dmeter_core::constants::{
    COMMUNITY_SCALE, CONSENSUS_NODE_REFERENCE, CROSS_VALIDATION_SCALE, DECENTRALIZATION_SCALE,
    ECOSYSTEM_COVERAGE_SCALE, ECOSYSTEM_QUALITY_SCALE, ENGAGEMENT_SCALE, PEER_REVIEW_SCALE,
    REGULATORY_BONUS, TRUST_SCORE_MAX, TRUST_SCORE_MIN, TRUST_WEIGHT_PRIOR, TRUST_WEIGHT_QUALITY,
};
use dmeter_core::source::{
    DataQuality, DataSource, Decentralization, EcosystemServices, Engagement, QualityMetrics,
};
use dmeter_core::types::{non_negative, ratio_or_zero, unit_interval};
use dmeter_core::verification::VerificationRecord;

/// Trust in one verified submission, in [0, 1].
///
/// Starts from a weighted base of the source's prior and data quality scaled
/// by the record's confidence, then multiplies in each bonus whose block is
/// present. Absent blocks are skipped; there is no failure path.
///
/// Probability-like inputs are clamped into [0, 1] and multipliers floored
/// at 0 before use, so sources that bypassed registry normalisation score
/// the same as their normalised form.
pub fn trust_score(source: &DataSource, verification: &VerificationRecord) -> f64 {
    let mut score = base_score(source, verification.confidence);

    if verification
        .regulatory_status
        .as_ref()
        .is_some_and(|r| r.compliant)
    {
        score *= REGULATORY_BONUS;
    }

    if let Some(review) = verification
        .peer_review_status
        .as_ref()
        .filter(|r| r.completed)
    {
        score *= 1.0 + unit_interval(review.average_score) * PEER_REVIEW_SCALE;
    }

    if let Some(d) = &source.decentralization {
        score *= decentralization_factor(d);
    }

    if let Some(e) = &source.engagement {
        score *= engagement_factor(e);
    }

    if let Some(cv) = &verification.cross_validation {
        score *= 1.0 + unit_interval(cv.agreement) * CROSS_VALIDATION_SCALE;
    }

    if let Some(es) = source
        .ecosystem_services
        .as_ref()
        .filter(|_| verification.ecosystem_services_assessed())
    {
        score *= ecosystem_factor(es);
    }

    clamp_trust(score)
}

/// `(0.3·prior + 0.15·(accuracy + precision + reliability)) · confidence`.
/// Missing quality terms count as 0.
pub fn base_score(source: &DataSource, confidence: f64) -> f64 {
    let quality_sum = source
        .data_quality
        .as_ref()
        .map(|q| {
            let (a, p, r) = quality_terms(q);
            a + p + r
        })
        .unwrap_or(0.0);
    (TRUST_WEIGHT_PRIOR * unit_interval(source.trust_score) + TRUST_WEIGHT_QUALITY * quality_sum)
        * unit_interval(confidence)
}

/// Accuracy, precision and reliability, each clamped into [0, 1].
pub fn quality_terms(q: &DataQuality) -> (f64, f64, f64) {
    (
        unit_interval(q.accuracy),
        unit_interval(q.precision),
        unit_interval(q.reliability),
    )
}

pub fn decentralization_factor(d: &Decentralization) -> f64 {
    let consensus_strength = d.node_count as f64 / CONSENSUS_NODE_REFERENCE;
    let validator_ratio = ratio_or_zero(d.active_validators as f64, d.validator_count as f64);
    let network = unit_interval(d.network_health) * unit_interval(d.decentralization_score);

    (1.0 + consensus_strength * DECENTRALIZATION_SCALE)
        * (1.0 + validator_ratio * DECENTRALIZATION_SCALE)
        * (1.0 + network * DECENTRALIZATION_SCALE)
}

pub fn engagement_factor(e: &Engagement) -> f64 {
    let active_ratio = ratio_or_zero(e.active_contributors as f64, e.contributor_count as f64);
    let history = &e.contribution_history;
    let growth = ratio_or_zero(history.last_month as f64, history.last_quarter as f64);
    let gov = &e.governance_participation;
    let governance = unit_interval(gov.voting_power)
        * ratio_or_zero(gov.proposals_passed as f64, gov.proposals_submitted as f64);

    (1.0 + unit_interval(e.community_score) * COMMUNITY_SCALE)
        * non_negative(e.reputation_multiplier)
        * (1.0 + active_ratio * ENGAGEMENT_SCALE)
        * (1.0 + growth * ENGAGEMENT_SCALE)
        * (1.0 + governance * ENGAGEMENT_SCALE)
}

pub fn ecosystem_factor(es: &EcosystemServices) -> f64 {
    let quality = quality_metrics_mean(&es.quality_metrics);
    let coverage = (unit_interval(es.spatial_coverage) + unit_interval(es.temporal_coverage)) / 2.0;
    (1.0 + quality * ECOSYSTEM_QUALITY_SCALE) * (1.0 + coverage * ECOSYSTEM_COVERAGE_SCALE)
}

fn quality_metrics_mean(m: &QualityMetrics) -> f64 {
    (unit_interval(m.accuracy)
        + unit_interval(m.precision)
        + unit_interval(m.reliability)
        + unit_interval(m.completeness))
        / 4.0
}

fn clamp_trust(x: f64) -> f64 {
    if x.is_nan() {
        TRUST_SCORE_MIN
    } else {
        x.clamp(TRUST_SCORE_MIN, TRUST_SCORE_MAX)
    }
}
