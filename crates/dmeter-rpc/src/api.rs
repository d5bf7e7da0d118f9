use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use dmeter_core::source::DataSource;
use dmeter_core::submission::{Submission, SubmissionQuery};
use dmeter_scoring::RewardBreakdown;

use crate::types::{RpcReceipt, RpcSourceSummary, RpcStats, RpcVersionInfo};

/// dMeter JSON-RPC 2.0 API definition.
///
/// All method names are prefixed with "dmeter_" via `namespace = "dmeter"`.
#[rpc(server, namespace = "dmeter")]
pub trait DmeterApi {
    /// List registry sources, optionally filtered by kind
    /// ("satellite", "iot", "human", "community").
    #[method(name = "listSources")]
    async fn list_sources(&self, kind: Option<String>) -> RpcResult<Vec<RpcSourceSummary>>;

    /// Full descriptor of one source. Unknown names are a NotFound error.
    #[method(name = "getSource")]
    async fn get_source(&self, name: String) -> RpcResult<DataSource>;

    /// Reward breakdown for a draft, or null while the draft is invalid or no
    /// known source is selected.
    #[method(name = "previewReward")]
    async fn preview_reward(&self, draft: Submission) -> RpcResult<Option<RewardBreakdown>>;

    /// Verify, score and persist a submission.
    #[method(name = "submitData")]
    async fn submit_data(&self, submission: Submission) -> RpcResult<RpcReceipt>;

    /// A persisted receipt by hex id, or null.
    #[method(name = "getSubmission")]
    async fn get_submission(&self, id: String) -> RpcResult<Option<RpcReceipt>>;

    /// Persisted receipts filtered by location, data type and an inclusive
    /// `recorded_at` range, newest first. Omit the query to list the latest.
    #[method(name = "listSubmissions")]
    async fn list_submissions(&self, query: Option<SubmissionQuery>) -> RpcResult<Vec<RpcReceipt>>;

    #[method(name = "getStats")]
    async fn get_stats(&self) -> RpcResult<RpcStats>;

    #[method(name = "getVersion")]
    async fn get_version(&self) -> RpcResult<RpcVersionInfo>;
}
