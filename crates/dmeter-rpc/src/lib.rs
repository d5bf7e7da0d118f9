//! dmeter-rpc
//!
//! JSON-RPC 2.0 server for dMeter nodes.
//!
//! Namespace: "dmeter"
//! Methods:
//!   dmeter_listSources    — registry sources, optionally by kind
//!   dmeter_getSource      — full source descriptor
//!   dmeter_previewReward  — live reward breakdown for a draft
//!   dmeter_submitData     — verify, score and persist a submission
//!   dmeter_getSubmission  — persisted receipt by id
//!   dmeter_listSubmissions — receipts by location, data type and time range
//!   dmeter_getStats       — submission count and rewards issued
//!   dmeter_getVersion     — node, API and registry versions

pub mod api;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerState};
pub use types::{RpcReceipt, RpcSourceSummary, RpcStats, RpcVersionInfo};
