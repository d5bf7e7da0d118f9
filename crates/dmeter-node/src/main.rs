//! dmeter-node — the dMeter scoring node binary.
//!
//! Startup sequence:
//!   1. Open (or create) the submission store
//!   2. Load the source registry (builtin, or `--registry` JSON)
//!   3. Wire the verification builder and its oracles
//!   4. Start the JSON-RPC 2.0 server
//!   5. Run until Ctrl-C, then stop the server and flush the store

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use dmeter_core::constants::DEFAULT_PEER_REVIEW_SCORE;
use dmeter_registry::SourceRegistry;
use dmeter_rpc::{RpcServer, RpcServerState};
use dmeter_state::{ScoringEngine, StateDb};
use dmeter_verify::{
    AssumeCompliant, AuditScheduleCompliance, ComplianceOracle, FixedPeerReview,
    ReportedAssessment, SystemClock, VerificationBuilder, VerificationSession,
};

/// How regulatory compliance is attested for sources that declare standards.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ComplianceMode {
    /// Every declared standard passes.
    Assume,
    /// Compliant only while the source's next audit is not overdue.
    AuditSchedule,
}

impl ComplianceMode {
    fn oracle(self) -> Arc<dyn ComplianceOracle> {
        match self {
            ComplianceMode::Assume => Arc::new(AssumeCompliant),
            ComplianceMode::AuditSchedule => Arc::new(AuditScheduleCompliance),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dmeter-node",
    version,
    about = "dMeter node — trust and reward scoring for environmental data"
)]
struct Args {
    /// Directory for the persistent submission store.
    #[arg(long, default_value = "~/.dmeter/data")]
    data_dir: PathBuf,

    /// JSON-RPC listen address.
    #[arg(long, default_value = "127.0.0.1:8646")]
    rpc_addr: SocketAddr,

    /// Source catalog JSON. The builtin catalog is used when omitted.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Regulatory compliance attestation.
    #[arg(long, value_enum, default_value_t = ComplianceMode::Assume)]
    compliance: ComplianceMode,

    /// Average score reported for sources that require peer review.
    #[arg(long, default_value_t = DEFAULT_PEER_REVIEW_SCORE)]
    peer_review_score: f64,

    /// Treat each source's catalogued ecosystem services as assessed.
    #[arg(long)]
    assess_ecosystem_services: bool,

    /// Interval between verification progress steps, in milliseconds.
    #[arg(long, default_value_t = 100)]
    verify_step_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,dmeter_node=debug")),
        )
        .init();

    let args = Args::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "dMeter node starting");

    // ── Submission store ──────────────────────────────────────────────────────
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let db = Arc::new(StateDb::open(&data_dir).context("opening submission store")?);
    let stats = db.stats().context("reading store stats")?;
    info!(
        submissions = stats.submissions,
        total_rewards = stats.total_rewards,
        dir = %data_dir.display(),
        "store opened"
    );

    // ── Source registry ───────────────────────────────────────────────────────
    let registry = match &args.registry {
        Some(path) => {
            let path = expand_tilde(path);
            SourceRegistry::load(&path)
                .with_context(|| format!("loading registry {}", path.display()))?
        }
        None => SourceRegistry::builtin(),
    };
    info!(
        sources = registry.len(),
        version = registry.version(),
        "source registry loaded"
    );

    // ── Verification ──────────────────────────────────────────────────────────
    if !(0.0..=1.0).contains(&args.peer_review_score) {
        warn!(
            score = args.peer_review_score,
            "peer review score outside [0, 1], clamping"
        );
    }
    debug!(compliance = ?args.compliance, "verification oracles configured");
    let mut builder = VerificationBuilder::new(Arc::new(SystemClock))
        .with_compliance_oracle(args.compliance.oracle())
        .with_peer_review_oracle(Arc::new(FixedPeerReview::new(args.peer_review_score)));
    if args.assess_ecosystem_services {
        builder = builder.with_ecosystem_assessor(Arc::new(ReportedAssessment));
    }
    let session = VerificationSession::new(Arc::new(builder))
        .with_step(Duration::from_millis(args.verify_step_ms));

    let engine = Arc::new(ScoringEngine::new(
        Arc::new(registry),
        session,
        Arc::clone(&db),
    ));

    // ── RPC server ────────────────────────────────────────────────────────────
    let rpc_state = Arc::new(RpcServerState {
        engine,
        node_version: env!("CARGO_PKG_VERSION").to_string(),
    });
    let (addr, rpc_handle) = RpcServer::new(rpc_state)
        .start(args.rpc_addr)
        .await
        .context("starting RPC server")?;

    info!(%addr, "node ready");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("shutting down");
    if rpc_handle.stop().is_err() {
        warn!("RPC server already stopped");
    }
    rpc_handle.stopped().await;
    db.flush().context("flushing submission store")?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
