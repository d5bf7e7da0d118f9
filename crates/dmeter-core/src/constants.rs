/// ─── dMeter Scoring Constants ───────────────────────────────────────────────
///
/// Every weight, bonus and rate used by the trust and reward calculators.
/// Changing any of these changes the reward a contributor receives for the
/// same submission; bump `REGISTRY_FORMAT_VERSION` alongside.

// ── Trust score: base weights ─────────────────────────────────────────────────

/// Weight of the source's static trust prior in the base score.
pub const TRUST_WEIGHT_PRIOR: f64 = 0.3;

/// Weight of each data-quality component (accuracy, precision, reliability).
pub const TRUST_WEIGHT_QUALITY: f64 = 0.15;

// ── Trust score: bonus factors ────────────────────────────────────────────────

/// Multiplier applied when the verification reports regulatory compliance.
pub const REGULATORY_BONUS: f64 = 1.1;

/// Scale applied to the peer-review average score: ×(1 + score · 0.1).
pub const PEER_REVIEW_SCALE: f64 = 0.1;

/// Node count that yields a full consensus-strength ratio of 1.0.
pub const CONSENSUS_NODE_REFERENCE: f64 = 1000.0;

/// Scale applied to each decentralization ratio: ×(1 + ratio · 0.05).
pub const DECENTRALIZATION_SCALE: f64 = 0.05;

/// Scale applied to the community score: ×(1 + score · 0.1).
pub const COMMUNITY_SCALE: f64 = 0.1;

/// Scale applied to each engagement ratio (activity, growth, governance).
pub const ENGAGEMENT_SCALE: f64 = 0.05;

/// Scale applied to cross-validation agreement: ×(1 + agreement · 0.1).
pub const CROSS_VALIDATION_SCALE: f64 = 0.1;

/// Scale applied to the ecosystem-service quality score.
pub const ECOSYSTEM_QUALITY_SCALE: f64 = 0.1;

/// Scale applied to the ecosystem-service coverage score.
pub const ECOSYSTEM_COVERAGE_SCALE: f64 = 0.05;

/// Upper bound of every trust score.
pub const TRUST_SCORE_MAX: f64 = 1.0;

/// Lower bound of every trust score.
pub const TRUST_SCORE_MIN: f64 = 0.0;

// ── Reward calculator ─────────────────────────────────────────────────────────

/// Source-kind reward multipliers.
pub const REWARD_MULTIPLIER_SATELLITE: f64 = 1.5;
pub const REWARD_MULTIPLIER_IOT: f64 = 1.2;
pub const REWARD_MULTIPLIER_HUMAN: f64 = 1.0;
pub const REWARD_MULTIPLIER_COMMUNITY: f64 = 1.3;

/// Flat multiplier for sources carrying regulatory compliance metadata.
pub const REWARD_COMPLIANCE_BONUS: f64 = 1.1;

/// Flat multiplier for sources carrying a peer-review policy.
pub const REWARD_PEER_REVIEW_BONUS: f64 = 1.085;

/// Base reward (tokens) for a data type not in the rate table.
pub const UNKNOWN_DATA_TYPE_RATE: u64 = 0;

/// Token ticker shown next to reward amounts.
pub const REWARD_TICKER: &str = "DMT";

// ── Verification defaults ─────────────────────────────────────────────────────

/// Confidence used when a source publishes no reliability figure.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Cross-validation agreement attached to satellite data.
pub const SATELLITE_AGREEMENT: f64 = 0.95;

/// Cross-validation agreement attached to human-reported data.
pub const HUMAN_AGREEMENT: f64 = 0.85;

/// Average peer-review score reported by the default review oracle.
pub const DEFAULT_PEER_REVIEW_SCORE: f64 = 0.85;

/// IoT devices are due for recalibration this long after verification (seconds).
pub const CALIBRATION_INTERVAL_SECS: i64 = 30 * 24 * 3600;

/// Number of progress steps in a verification session (10% each).
pub const VERIFICATION_PROGRESS_STEPS: u8 = 10;

/// Length of the hex digest embedded in signatures and proofs.
pub const ATTESTATION_DIGEST_HEX_LEN: usize = 32;

// ── Registry ──────────────────────────────────────────────────────────────────

/// Catalog format version understood by this build.
pub const REGISTRY_FORMAT_VERSION: u32 = 1;

// ── Submission queries ────────────────────────────────────────────────────────

/// Receipts returned by a listing when the caller sets no limit.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Hard cap on receipts returned by one listing.
pub const MAX_QUERY_LIMIT: usize = 1_000;
