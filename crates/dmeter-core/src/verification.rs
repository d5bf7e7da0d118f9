use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Attestations produced once per (submission, source) pair.
///
/// Never mutated after creation; re-verification produces a new record.
/// Absent attestations serialize as `null` so the record stays bincode-safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Name of the source this record was built against.
    pub source: String,
    pub timestamp: Timestamp,
    pub signature: String,
    pub proof: String,
    pub method: String,
    /// Base confidence in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub cross_validation: Option<CrossValidation>,
    #[serde(default)]
    pub calibration: Option<CalibrationStatus>,
    #[serde(default)]
    pub regulatory_status: Option<RegulatoryStatus>,
    #[serde(default)]
    pub peer_review_status: Option<PeerReviewStatus>,
    #[serde(default)]
    pub ecosystem_services: Option<EcosystemAssessment>,
}

impl VerificationRecord {
    /// True if an ecosystem-service assessment is attached and complete.
    pub fn ecosystem_services_assessed(&self) -> bool {
        self.ecosystem_services
            .as_ref()
            .map(|e| e.assessed)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub sources: Vec<String>,
    pub agreement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationStatus {
    pub last_calibrated: Timestamp,
    pub next_calibration_due: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryStatus {
    pub compliant: bool,
    pub standards: Vec<String>,
    pub audit_status: AuditStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReviewStatus {
    pub completed: bool,
    pub reviewers: u32,
    /// Mean reviewer score in [0, 1].
    pub average_score: f64,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// A valued ecosystem service within an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessedService {
    pub name: String,
    pub value: f64,
    pub confidence: f64,
    pub verification_method: String,
    pub last_verified: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EcosystemAssessment {
    /// Gates the ecosystem-service trust bonus.
    pub assessed: bool,
    pub services: Vec<AssessedService>,
    pub total_value: f64,
    pub valuation_method: String,
    pub spatial_coverage: f64,
    pub temporal_coverage: f64,
}
