use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::submission::{Submission, SubmissionQuery, SubmissionReceipt};
use dmeter_core::types::SubmissionId;
use dmeter_core::verification::VerificationRecord;
use dmeter_registry::SourceRegistry;
use dmeter_scoring::{calculate_reward, trust_score, RewardBreakdown};
use dmeter_verify::{VerificationHandle, VerificationSession};

use crate::db::{StateDb, StoreStats};

/// Trust, reward and verification for one submission, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    /// The submission as scored, with its default unit filled in.
    pub submission: Submission,
    pub trust_score: f64,
    pub reward: RewardBreakdown,
    pub verification: VerificationRecord,
}

/// A submission whose verification is in flight.
///
/// Dropping it cancels the verification; nothing is persisted.
pub struct PendingSubmission {
    submission: Submission,
    handle: VerificationHandle,
}

impl PendingSubmission {
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Percent complete, 0..=100.
    pub fn progress(&self) -> u8 {
        self.handle.progress()
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.handle.subscribe()
    }

    pub fn cancel(&mut self) {
        self.handle.cancel();
    }
}

/// The verify → score → persist pipeline.
///
/// Constructed explicitly from its collaborators and shared behind `Arc`.
pub struct ScoringEngine {
    registry: Arc<SourceRegistry>,
    session: VerificationSession,
    db: Arc<StateDb>,
}

impl ScoringEngine {
    pub fn new(registry: Arc<SourceRegistry>, session: VerificationSession, db: Arc<StateDb>) -> Self {
        Self {
            registry,
            session,
            db,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn db(&self) -> &Arc<StateDb> {
        &self.db
    }

    /// The registry entry the submission names.
    ///
    /// # Errors
    /// `NoSourceSelected` for a blank source, `SourceNotFound` for an unknown one.
    pub fn resolve_source(&self, submission: &Submission) -> Result<&DataSource, DmeterError> {
        let name = submission
            .selected_source()
            .ok_or(DmeterError::NoSourceSelected)?;
        self.registry.find_source_by_name(name)
    }

    /// Live reward preview for a draft. `None` while the draft fails
    /// validation or no known source is selected.
    pub fn preview_reward(&self, draft: &Submission) -> Option<RewardBreakdown> {
        draft.validate().ok()?;
        let source = self.resolve_source(draft).ok()?;
        Some(calculate_reward(&draft.data_type, source))
    }

    /// Verify and score synchronously without persisting anything.
    pub fn score(&self, submission: &Submission) -> Result<Scored, DmeterError> {
        submission.validate()?;
        let source = self.resolve_source(submission)?;
        let submission = submission.clone().with_default_unit();
        let verification = self.session.builder().build(&submission, source);
        Ok(score_verified(submission, source, verification))
    }

    /// Validate a submission and start verifying it. Must be called inside a
    /// tokio runtime.
    pub fn start_verification(
        &self,
        submission: Submission,
    ) -> Result<PendingSubmission, DmeterError> {
        submission.validate()?;
        let source = self.resolve_source(&submission)?.clone();
        let submission = submission.with_default_unit();
        debug!(source = %source.name, data_type = %submission.data_type, "verification started");
        let handle = self.session.start(submission.clone(), source);
        Ok(PendingSubmission { submission, handle })
    }

    /// Verify, score and persist a submission.
    pub async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt, DmeterError> {
        let pending = self.start_verification(submission)?;
        self.complete(pending).await
    }

    /// Wait for an in-flight verification, then score and persist it.
    ///
    /// Nothing is written if verification was cancelled.
    pub async fn complete(&self, pending: PendingSubmission) -> Result<SubmissionReceipt, DmeterError> {
        let PendingSubmission { submission, handle } = pending;
        let verification = handle.wait().await.inspect_err(|e| {
            warn!(error = %e, data_type = %submission.data_type, "verification did not complete");
        })?;

        let source = self.registry.find_source_by_name(&verification.source)?;
        let scored = score_verified(submission, source, verification);

        let receipt = SubmissionReceipt {
            id: SubmissionReceipt::derive_id(&scored.submission, scored.verification.timestamp),
            recorded_at: scored.verification.timestamp,
            submission: scored.submission,
            trust_score: scored.trust_score,
            reward_amount: scored.reward.amount,
            verification: scored.verification,
        };

        if self.db.put_receipt(&receipt)? {
            info!(
                id = %receipt.id,
                source = %receipt.verification.source,
                trust = receipt.trust_score,
                reward = receipt.reward_amount,
                "submission recorded"
            );
        } else {
            debug!(id = %receipt.id, "duplicate submission, keeping existing receipt");
        }
        Ok(receipt)
    }

    pub fn get_receipt(&self, id: &SubmissionId) -> Result<SubmissionReceipt, DmeterError> {
        self.db
            .get_receipt(id)?
            .ok_or_else(|| DmeterError::SubmissionNotFound(id.to_hex()))
    }

    /// Persisted receipts matching `query`, newest first.
    pub fn list_submissions(
        &self,
        query: &SubmissionQuery,
    ) -> Result<Vec<SubmissionReceipt>, DmeterError> {
        let receipts = self.db.query_receipts(query)?;
        debug!(
            location = query.location().unwrap_or("*"),
            data_type = query.data_type().unwrap_or("*"),
            matched = receipts.len(),
            "listed submissions"
        );
        Ok(receipts)
    }

    pub fn stats(&self) -> Result<StoreStats, DmeterError> {
        self.db.stats()
    }
}

fn score_verified(
    submission: Submission,
    source: &DataSource,
    verification: VerificationRecord,
) -> Scored {
    let trust = trust_score(source, &verification);
    let reward = calculate_reward(&submission.data_type, source);
    debug!(
        source = %source.name,
        data_type = %submission.data_type,
        trust,
        reward = reward.amount,
        "scored submission"
    );
    Scored {
        submission,
        trust_score: trust,
        reward,
        verification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dmeter_verify::{FixedClock, VerificationBuilder};

    const NOW: i64 = 1_750_000_000;

    fn engine() -> ScoringEngine {
        let builder = VerificationBuilder::new(Arc::new(FixedClock::new(NOW)));
        let session = VerificationSession::new(Arc::new(builder)).with_step(Duration::from_millis(1));
        ScoringEngine::new(
            Arc::new(SourceRegistry::builtin()),
            session,
            Arc::new(StateDb::open_temporary().unwrap()),
        )
    }

    fn reading(source: &str, data_type: &str) -> Submission {
        Submission {
            value: 21.5,
            location: "Lisbon".into(),
            data_type: data_type.into(),
            unit: String::new(),
            source: source.into(),
        }
    }

    #[test]
    fn preview_needs_a_known_source() {
        let e = engine();
        assert!(e.preview_reward(&reading("", "Temperature")).is_none());
        assert!(e.preview_reward(&reading("Hubble", "Temperature")).is_none());
        assert!(e.preview_reward(&reading("Sentinel-2", "")).is_none());
        assert_eq!(
            e.preview_reward(&reading("Sentinel-2", "Temperature")).unwrap().amount,
            13
        );
    }

    #[test]
    fn preview_hides_invalid_drafts() {
        let e = engine();
        let mut no_location = reading("Sentinel-2", "Temperature");
        no_location.location.clear();
        assert!(e.preview_reward(&no_location).is_none());

        let mut no_value = reading("Sentinel-2", "Temperature");
        no_value.value = f64::NAN;
        assert!(e.preview_reward(&no_value).is_none());
    }

    #[tokio::test]
    async fn score_and_submit_see_the_same_submission() {
        let e = engine();
        let scored = e.score(&reading("Sentinel-2", "Temperature")).unwrap();
        assert_eq!(scored.submission.unit, "°C");

        let receipt = e.submit(reading("Sentinel-2", "Temperature")).await.unwrap();
        assert_eq!(receipt.submission, scored.submission);
        assert_eq!(receipt.verification, scored.verification);
        assert_eq!(receipt.trust_score, scored.trust_score);
    }

    #[test]
    fn preview_of_unknown_type_is_zero() {
        let e = engine();
        let r = e.preview_reward(&reading("Sentinel-2", "Radiation")).unwrap();
        assert_eq!(r.amount, 0);
    }

    #[test]
    fn score_reports_lookup_errors() {
        let e = engine();
        assert!(matches!(
            e.score(&reading("", "Temperature")),
            Err(DmeterError::NoSourceSelected)
        ));
        assert!(matches!(
            e.score(&reading("Hubble", "Temperature")),
            Err(DmeterError::SourceNotFound(_))
        ));
        let mut bad = reading("Sentinel-2", "Temperature");
        bad.location.clear();
        assert!(matches!(e.score(&bad), Err(DmeterError::InvalidInput { .. })));
    }

    #[test]
    fn sentinel_scores() {
        let s = engine().score(&reading("Sentinel-2", "Temperature")).unwrap();
        // (0.285 + 0.15 · 2.83) · 0.98 · (1 + 0.95 · 0.1)
        let expected = (0.3 * 0.95 + 0.15 * (0.95 + 0.90 + 0.98)) * 0.98 * 1.095;
        assert!((s.trust_score - expected).abs() < 1e-9);
        assert_eq!(s.reward.amount, 13);
    }

    #[tokio::test]
    async fn submit_persists_receipt() {
        let e = engine();
        let receipt = e.submit(reading("Sentinel-2", "Temperature")).await.unwrap();
        assert_eq!(receipt.reward_amount, 13);
        assert_eq!(receipt.recorded_at, NOW);
        assert_eq!(receipt.submission.unit, "°C");
        assert!(receipt.verification.proof.starts_with("sat_"));

        assert_eq!(e.get_receipt(&receipt.id).unwrap(), receipt);
        let stats = e.stats().unwrap();
        assert_eq!(stats.submissions, 1);
        assert_eq!(stats.total_rewards, 13);
    }

    #[tokio::test]
    async fn cancelled_submission_writes_nothing() {
        let builder = VerificationBuilder::new(Arc::new(FixedClock::new(NOW)));
        let session = VerificationSession::new(Arc::new(builder)).with_step(Duration::from_secs(5));
        let e = ScoringEngine::new(
            Arc::new(SourceRegistry::builtin()),
            session,
            Arc::new(StateDb::open_temporary().unwrap()),
        );

        let mut pending = e.start_verification(reading("OpenAQ", "Air Quality")).unwrap();
        pending.cancel();
        let err = e.complete(pending).await.unwrap_err();
        assert!(matches!(err, DmeterError::VerificationCancelled));
        assert_eq!(e.stats().unwrap().submissions, 0);
    }

    #[tokio::test]
    async fn no_source_never_starts_verification() {
        let e = engine();
        assert!(matches!(
            e.submit(reading("  ", "Temperature")).await,
            Err(DmeterError::NoSourceSelected)
        ));
    }

    #[tokio::test]
    async fn listing_filters_recorded_submissions() {
        let clock = Arc::new(FixedClock::new(NOW));
        let builder = VerificationBuilder::new(clock.clone());
        let session = VerificationSession::new(Arc::new(builder)).with_step(Duration::from_millis(1));
        let e = ScoringEngine::new(
            Arc::new(SourceRegistry::builtin()),
            session,
            Arc::new(StateDb::open_temporary().unwrap()),
        );

        e.submit(reading("Sentinel-2", "Temperature")).await.unwrap();
        clock.set(NOW + 60);
        let mut porto = reading("Sentinel-2", "Temperature");
        porto.location = "Porto".into();
        e.submit(porto).await.unwrap();
        clock.set(NOW + 120);
        e.submit(reading("OpenAQ", "Air Quality")).await.unwrap();

        let lisbon = e
            .list_submissions(&SubmissionQuery {
                location: Some("Lisbon".into()),
                ..Default::default()
            })
            .unwrap();
        let types: Vec<_> = lisbon.iter().map(|r| r.submission.data_type.as_str()).collect();
        assert_eq!(types, vec!["Air Quality", "Temperature"]);

        let temperature = e
            .list_submissions(&SubmissionQuery {
                data_type: Some("Temperature".into()),
                from: Some(NOW + 30),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(temperature.len(), 1);
        assert_eq!(temperature[0].submission.location, "Porto");
    }

    #[test]
    fn missing_receipt_is_not_found() {
        let err = engine()
            .get_receipt(&SubmissionId::from_bytes([1; 32]))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
