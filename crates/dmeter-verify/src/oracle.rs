//! Pluggable attestation sources.
//!
//! Regulatory audits, peer review and ecosystem-service valuation all happen
//! outside this system. The builder asks these ports for their verdicts; the
//! default implementations report fixed, deterministic results.

use dmeter_core::constants::DEFAULT_PEER_REVIEW_SCORE;
use dmeter_core::source::{DataSource, EcosystemServices, PeerReviewPolicy, RegulatoryCompliance};
use dmeter_core::submission::Submission;
use dmeter_core::types::{unit_interval, Timestamp};
use dmeter_core::verification::{
    AssessedService, AuditStatus, EcosystemAssessment, PeerReviewStatus, RegulatoryStatus,
};

// ── Regulatory compliance ─────────────────────────────────────────────────────

pub trait ComplianceOracle: Send + Sync {
    fn assess(
        &self,
        source: &DataSource,
        compliance: &RegulatoryCompliance,
        now: Timestamp,
    ) -> RegulatoryStatus;
}

/// Reports every source that declares standards as compliant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeCompliant;

impl ComplianceOracle for AssumeCompliant {
    fn assess(&self, _: &DataSource, compliance: &RegulatoryCompliance, _: Timestamp) -> RegulatoryStatus {
        RegulatoryStatus {
            compliant: true,
            standards: compliance.standards.clone(),
            audit_status: AuditStatus::Passed,
        }
    }
}

/// Compliant only while the source's next audit is not overdue.
///
/// A `next_audit_due` of 0 means no audit has been scheduled; the status is
/// then `Pending` and the source is not treated as compliant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditScheduleCompliance;

impl ComplianceOracle for AuditScheduleCompliance {
    fn assess(&self, _: &DataSource, compliance: &RegulatoryCompliance, now: Timestamp) -> RegulatoryStatus {
        let audit_status = match compliance.next_audit_due {
            0 => AuditStatus::Pending,
            due if due >= now => AuditStatus::Passed,
            _ => AuditStatus::Failed,
        };
        RegulatoryStatus {
            compliant: audit_status == AuditStatus::Passed,
            standards: compliance.standards.clone(),
            audit_status,
        }
    }
}

// ── Peer review ───────────────────────────────────────────────────────────────

pub trait PeerReviewOracle: Send + Sync {
    fn review(
        &self,
        submission: &Submission,
        source: &DataSource,
        policy: &PeerReviewPolicy,
    ) -> PeerReviewStatus;
}

/// Reports a completed review with a fixed average score.
#[derive(Debug, Clone, Copy)]
pub struct FixedPeerReview {
    average_score: f64,
}

impl FixedPeerReview {
    pub fn new(average_score: f64) -> Self {
        Self {
            average_score: unit_interval(average_score),
        }
    }

    pub fn average_score(&self) -> f64 {
        self.average_score
    }
}

impl Default for FixedPeerReview {
    fn default() -> Self {
        Self::new(DEFAULT_PEER_REVIEW_SCORE)
    }
}

impl PeerReviewOracle for FixedPeerReview {
    fn review(&self, _: &Submission, _: &DataSource, policy: &PeerReviewPolicy) -> PeerReviewStatus {
        PeerReviewStatus {
            completed: true,
            reviewers: policy.min_reviewers,
            average_score: self.average_score,
            comments: vec![
                "Data quality verified".into(),
                "Methodology sound".into(),
                "Results reproducible".into(),
            ],
        }
    }
}

// ── Ecosystem services ────────────────────────────────────────────────────────

pub trait EcosystemAssessor: Send + Sync {
    /// `None` leaves the record without an assessment (no ecosystem bonus).
    fn assess(
        &self,
        source: &DataSource,
        services: &EcosystemServices,
        now: Timestamp,
    ) -> Option<EcosystemAssessment>;
}

/// Never assesses ecosystem services.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssessment;

impl EcosystemAssessor for NoAssessment {
    fn assess(&self, _: &DataSource, _: &EcosystemServices, _: Timestamp) -> Option<EcosystemAssessment> {
        None
    }
}

/// Accepts the source's own catalogue valuation as assessed.
///
/// The total value is split evenly across the listed services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedAssessment;

impl EcosystemAssessor for ReportedAssessment {
    fn assess(
        &self,
        _: &DataSource,
        services: &EcosystemServices,
        _: Timestamp,
    ) -> Option<EcosystemAssessment> {
        let share = if services.services.is_empty() {
            0.0
        } else {
            services.total_value / services.services.len() as f64
        };
        Some(EcosystemAssessment {
            assessed: true,
            services: services
                .services
                .iter()
                .map(|svc| AssessedService {
                    name: svc.name.clone(),
                    value: share,
                    confidence: svc.confidence,
                    verification_method: svc.measurement_method.clone(),
                    last_verified: services.last_assessment,
                })
                .collect(),
            total_value: services.total_value,
            valuation_method: services.valuation_method.clone(),
            spatial_coverage: services.spatial_coverage,
            temporal_coverage: services.temporal_coverage,
        })
    }
}
