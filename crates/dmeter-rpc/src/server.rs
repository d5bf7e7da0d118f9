use std::net::SocketAddr;
use std::sync::Arc;

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObject;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::submission::{Submission, SubmissionQuery};
use dmeter_core::types::{SourceKind, SubmissionId};
use dmeter_scoring::RewardBreakdown;
use dmeter_state::ScoringEngine;

use crate::api::DmeterApiServer;
use crate::types::{RpcReceipt, RpcSourceSummary, RpcStats, RpcVersionInfo};

pub const API_VERSION: u32 = 1;

pub const ERR_NOT_FOUND: i32 = -32001;
pub const ERR_CANCELLED: i32 = -32002;
pub const ERR_NO_SOURCE: i32 = -32003;
pub const ERR_INVALID_PARAMS: i32 = -32602;
pub const ERR_INTERNAL: i32 = -32603;

fn rpc_err(code: i32, msg: impl Into<String>) -> ErrorObject<'static> {
    ErrorObject::owned(code, msg.into(), None::<()>)
}

fn to_rpc_err(e: DmeterError) -> ErrorObject<'static> {
    let code = match &e {
        DmeterError::SourceNotFound(_) | DmeterError::SubmissionNotFound(_) => ERR_NOT_FOUND,
        DmeterError::VerificationCancelled => ERR_CANCELLED,
        DmeterError::NoSourceSelected => ERR_NO_SOURCE,
        DmeterError::InvalidInput { .. } | DmeterError::UnknownSourceKind(_) => ERR_INVALID_PARAMS,
        _ => ERR_INTERNAL,
    };
    if code == ERR_INTERNAL {
        warn!(error = %e, "internal error serving RPC");
    }
    rpc_err(code, e.to_string())
}

/// Shared state passed to the RPC server.
pub struct RpcServerState {
    pub engine: Arc<ScoringEngine>,
    pub node_version: String,
}

/// The RPC server implementation.
pub struct RpcServer {
    state: Arc<RpcServerState>,
}

impl RpcServer {
    pub fn new(state: Arc<RpcServerState>) -> Self {
        Self { state }
    }

    /// Start the JSON-RPC server on `addr` (HTTP and WebSocket, permissive
    /// CORS). Returns the bound address and a handle to stop it.
    pub async fn start(self, addr: SocketAddr) -> anyhow::Result<(SocketAddr, ServerHandle)> {
        let middleware = tower::ServiceBuilder::new().layer(CorsLayer::permissive());
        let server = Server::builder()
            .set_http_middleware(middleware)
            .build(addr)
            .await?;
        let bound = server.local_addr()?;
        let handle = server.start(self.into_rpc());
        info!(addr = %bound, "RPC server started");
        Ok((bound, handle))
    }
}

#[async_trait]
impl DmeterApiServer for RpcServer {
    async fn list_sources(&self, kind: Option<String>) -> RpcResult<Vec<RpcSourceSummary>> {
        let registry = self.state.engine.registry();
        let sources: Vec<RpcSourceSummary> = match kind.as_deref().map(str::trim) {
            None | Some("") => registry.iter().map(RpcSourceSummary::from).collect(),
            Some(k) => {
                let kind: SourceKind = k.parse().map_err(to_rpc_err)?;
                registry.by_kind(kind).map(RpcSourceSummary::from).collect()
            }
        };
        Ok(sources)
    }

    async fn get_source(&self, name: String) -> RpcResult<DataSource> {
        self.state
            .engine
            .registry()
            .find_source_by_name(&name)
            .cloned()
            .map_err(to_rpc_err)
    }

    async fn preview_reward(&self, draft: Submission) -> RpcResult<Option<RewardBreakdown>> {
        Ok(self.state.engine.preview_reward(&draft))
    }

    async fn submit_data(&self, submission: Submission) -> RpcResult<RpcReceipt> {
        let receipt = self
            .state
            .engine
            .submit(submission)
            .await
            .map_err(to_rpc_err)?;
        Ok(receipt.into())
    }

    async fn get_submission(&self, id: String) -> RpcResult<Option<RpcReceipt>> {
        let id = SubmissionId::from_hex(&id)
            .map_err(|e| rpc_err(ERR_INVALID_PARAMS, format!("invalid submission id: {e}")))?;
        match self.state.engine.get_receipt(&id) {
            Ok(r) => Ok(Some(r.into())),
            Err(DmeterError::SubmissionNotFound(_)) => Ok(None),
            Err(e) => Err(to_rpc_err(e)),
        }
    }

    async fn list_submissions(&self, query: Option<SubmissionQuery>) -> RpcResult<Vec<RpcReceipt>> {
        let receipts = self
            .state
            .engine
            .list_submissions(&query.unwrap_or_default())
            .map_err(to_rpc_err)?;
        Ok(receipts.into_iter().map(RpcReceipt::from).collect())
    }

    async fn get_stats(&self) -> RpcResult<RpcStats> {
        let stats = self.state.engine.stats().map_err(to_rpc_err)?;
        Ok(stats.into())
    }

    async fn get_version(&self) -> RpcResult<RpcVersionInfo> {
        let registry = self.state.engine.registry();
        Ok(RpcVersionInfo {
            node_version: self.state.node_version.clone(),
            api_version: API_VERSION,
            registry_version: registry.version(),
            source_count: registry.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        let code = |e| to_rpc_err(e).code();
        assert_eq!(code(DmeterError::SourceNotFound("x".into())), ERR_NOT_FOUND);
        assert_eq!(code(DmeterError::VerificationCancelled), ERR_CANCELLED);
        assert_eq!(code(DmeterError::NoSourceSelected), ERR_NO_SOURCE);
        assert_eq!(code(DmeterError::invalid("location", "is required")), ERR_INVALID_PARAMS);
        assert_eq!(code(DmeterError::Storage("disk".into())), ERR_INTERNAL);
    }
}
