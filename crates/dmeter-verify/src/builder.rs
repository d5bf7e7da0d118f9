use std::sync::Arc;

use dmeter_core::constants::{
    CALIBRATION_INTERVAL_SECS, DEFAULT_CONFIDENCE, HUMAN_AGREEMENT, SATELLITE_AGREEMENT,
};
use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::submission::Submission;
use dmeter_core::types::{unit_interval, SourceKind};
use dmeter_core::verification::{CalibrationStatus, CrossValidation, VerificationRecord};

use crate::attest::{sign_submission, verification_proof};
use crate::clock::{Clock, SystemClock};
use crate::oracle::{
    AssumeCompliant, ComplianceOracle, EcosystemAssessor, FixedPeerReview, NoAssessment,
    PeerReviewOracle,
};

/// Synthesizes a `VerificationRecord` for a (submission, source) pair.
///
/// Output is fully determined by the inputs, the clock and the oracles.
pub struct VerificationBuilder {
    clock: Arc<dyn Clock>,
    compliance: Arc<dyn ComplianceOracle>,
    peer_review: Arc<dyn PeerReviewOracle>,
    ecosystem: Arc<dyn EcosystemAssessor>,
}

impl VerificationBuilder {
    /// A builder with the default oracles: sources declaring standards are
    /// compliant, required reviews complete at 0.85, no ecosystem assessment.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            compliance: Arc::new(AssumeCompliant),
            peer_review: Arc::new(FixedPeerReview::default()),
            ecosystem: Arc::new(NoAssessment),
        }
    }

    pub fn with_compliance_oracle(mut self, oracle: Arc<dyn ComplianceOracle>) -> Self {
        self.compliance = oracle;
        self
    }

    pub fn with_peer_review_oracle(mut self, oracle: Arc<dyn PeerReviewOracle>) -> Self {
        self.peer_review = oracle;
        self
    }

    pub fn with_ecosystem_assessor(mut self, assessor: Arc<dyn EcosystemAssessor>) -> Self {
        self.ecosystem = assessor;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Build a record against an optional source selection.
    ///
    /// # Errors
    /// `DmeterError::NoSourceSelected` when `source` is `None`.
    pub fn build_for(
        &self,
        submission: &Submission,
        source: Option<&DataSource>,
    ) -> Result<VerificationRecord, DmeterError> {
        let source = source.ok_or(DmeterError::NoSourceSelected)?;
        Ok(self.build(submission, source))
    }

    pub fn build(&self, submission: &Submission, source: &DataSource) -> VerificationRecord {
        let now = self.clock.now();

        let confidence = source
            .data_quality
            .map(|q| unit_interval(q.reliability))
            .unwrap_or(DEFAULT_CONFIDENCE);

        let regulatory_status = source
            .regulatory_compliance
            .as_ref()
            .map(|c| self.compliance.assess(source, c, now));

        let peer_review_status = source
            .peer_review
            .as_ref()
            .filter(|p| p.required)
            .map(|p| self.peer_review.review(submission, source, p));

        let (cross_validation, calibration) = match source.kind {
            SourceKind::Satellite => (
                Some(CrossValidation {
                    sources: vec!["Ground Truth Stations".into(), "Other Satellites".into()],
                    agreement: SATELLITE_AGREEMENT,
                }),
                None,
            ),
            SourceKind::Human => (
                Some(CrossValidation {
                    sources: vec!["Official Stations".into(), "Community Validators".into()],
                    agreement: HUMAN_AGREEMENT,
                }),
                None,
            ),
            SourceKind::Iot => (
                None,
                Some(CalibrationStatus {
                    last_calibrated: now,
                    next_calibration_due: now + CALIBRATION_INTERVAL_SECS,
                }),
            ),
            SourceKind::Community => (None, None),
        };

        let ecosystem_services = source
            .ecosystem_services
            .as_ref()
            .and_then(|es| self.ecosystem.assess(source, es, now));

        VerificationRecord {
            source: source.name.clone(),
            timestamp: now,
            signature: sign_submission(submission, now),
            proof: verification_proof(submission, source, now),
            method: source.verification_method.clone(),
            confidence,
            cross_validation,
            calibration,
            regulatory_status,
            peer_review_status,
            ecosystem_services,
        }
    }
}

impl Default for VerificationBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
