use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use dmeter_core::source::DataSource;
use dmeter_core::submission::{Submission, SubmissionQuery};
use dmeter_rpc::{RpcReceipt, RpcSourceSummary, RpcStats, RpcVersionInfo};
use dmeter_scoring::RewardBreakdown;

/// Minimal JSON-RPC 2.0 client for talking to a running node.
///
/// Raw HTTP POST with serde_json; the CLI does not need the full jsonrpsee
/// client machinery.
pub struct NodeRpcClient {
    url: String,
    client: reqwest::Client,
}

impl NodeRpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Call a JSON-RPC method and return the `result` field.
    async fn call(&self, method: &str, params: Value) -> anyhow::Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("connecting to node at {}", self.url))?;

        let json: Value = resp.json().await.context("parsing RPC response")?;

        if let Some(err) = json.get("error") {
            let code = err["code"].as_i64().unwrap_or_default();
            let message = err["message"].as_str().unwrap_or("unknown error");
            bail!("RPC error {code}: {message}");
        }

        Ok(json["result"].clone())
    }

    async fn call_as<T: DeserializeOwned>(&self, method: &str, params: Value) -> anyhow::Result<T> {
        let result = self.call(method, params).await?;
        serde_json::from_value(result).with_context(|| format!("parsing {method} response"))
    }

    pub async fn list_sources(&self, kind: Option<&str>) -> anyhow::Result<Vec<RpcSourceSummary>> {
        let params = match kind {
            Some(k) => json!([k]),
            None => json!([]),
        };
        self.call_as("dmeter_listSources", params).await
    }

    pub async fn get_source(&self, name: &str) -> anyhow::Result<DataSource> {
        self.call_as("dmeter_getSource", json!([name])).await
    }

    pub async fn preview_reward(&self, draft: &Submission) -> anyhow::Result<Option<RewardBreakdown>> {
        self.call_as("dmeter_previewReward", json!([draft])).await
    }

    pub async fn submit_data(&self, submission: &Submission) -> anyhow::Result<RpcReceipt> {
        self.call_as("dmeter_submitData", json!([submission])).await
    }

    pub async fn get_submission(&self, id: &str) -> anyhow::Result<Option<RpcReceipt>> {
        self.call_as("dmeter_getSubmission", json!([id])).await
    }

    pub async fn list_submissions(&self, query: &SubmissionQuery) -> anyhow::Result<Vec<RpcReceipt>> {
        self.call_as("dmeter_listSubmissions", json!([query])).await
    }

    pub async fn get_stats(&self) -> anyhow::Result<RpcStats> {
        self.call_as("dmeter_getStats", json!([])).await
    }

    pub async fn get_version(&self) -> anyhow::Result<RpcVersionInfo> {
        self.call_as("dmeter_getVersion", json!([])).await
    }
}
