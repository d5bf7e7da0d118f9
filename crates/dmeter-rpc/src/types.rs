use serde::{Deserialize, Serialize};

use dmeter_core::constants::REWARD_TICKER;
use dmeter_core::source::DataSource;
use dmeter_core::submission::{Submission, SubmissionReceipt};
use dmeter_core::types::{SourceKind, Timestamp, TokenAmount};
use dmeter_core::verification::VerificationRecord;
use dmeter_state::StoreStats;

/// One row of `dmeter_listSources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcSourceSummary {
    pub name: String,
    pub kind: SourceKind,
    pub description: String,
    pub trust_score: f64,
    pub verification_method: String,
    pub update_frequency: Option<String>,
}

impl From<&DataSource> for RpcSourceSummary {
    fn from(s: &DataSource) -> Self {
        Self {
            name: s.name.clone(),
            kind: s.kind,
            description: s.description.clone(),
            trust_score: s.trust_score,
            verification_method: s.verification_method.clone(),
            update_frequency: s.update_frequency.clone(),
        }
    }
}

/// A persisted submission as returned by `dmeter_submitData` and
/// `dmeter_getSubmission`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcReceipt {
    /// Hex submission id.
    pub id: String,
    pub submission: Submission,
    pub trust_score: f64,
    pub reward_amount: TokenAmount,
    pub ticker: String,
    pub verification: VerificationRecord,
    pub recorded_at: Timestamp,
}

impl From<SubmissionReceipt> for RpcReceipt {
    fn from(r: SubmissionReceipt) -> Self {
        Self {
            id: r.id.to_hex(),
            submission: r.submission,
            trust_score: r.trust_score,
            reward_amount: r.reward_amount,
            ticker: REWARD_TICKER.to_string(),
            verification: r.verification,
            recorded_at: r.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcStats {
    pub submissions: u64,
    pub total_rewards: TokenAmount,
    pub ticker: String,
}

impl From<StoreStats> for RpcStats {
    fn from(s: StoreStats) -> Self {
        Self {
            submissions: s.submissions,
            total_rewards: s.total_rewards,
            ticker: REWARD_TICKER.to_string(),
        }
    }
}

/// Returned by `dmeter_getVersion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVersionInfo {
    pub node_version: String,
    /// Bumped whenever the RPC surface changes incompatibly.
    pub api_version: u32,
    pub registry_version: u32,
    pub source_count: usize,
}
