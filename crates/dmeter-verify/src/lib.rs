//! dmeter-verify
//!
//! Turns a (submission, source) pair into a `VerificationRecord`: signature
//! and proof digests, kind-specific cross-validation or calibration, and the
//! verdicts of the compliance, peer-review and ecosystem oracles.
//!
//! All time comes from an injected `Clock`, so records are reproducible.

pub mod attest;
pub mod builder;
pub mod clock;
pub mod oracle;
pub mod session;

pub use attest::{sign_submission, verification_proof};
pub use builder::VerificationBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use oracle::{
    AssumeCompliant, AuditScheduleCompliance, ComplianceOracle, EcosystemAssessor,
    FixedPeerReview, NoAssessment, PeerReviewOracle, ReportedAssessment,
};
pub use session::{VerificationHandle, VerificationSession};
