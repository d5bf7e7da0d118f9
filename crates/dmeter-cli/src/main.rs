//! dmeter-cli
//!
//! Command-line client for a running dMeter node.
//!
//! Usage:
//!   dmeter-cli sources  [--kind <kind>] [--rpc <url>]
//!   dmeter-cli source   <name> [--rpc <url>]
//!   dmeter-cli preview  --data-type <type> --source <name> [--value <v>] [--location <loc>]
//!   dmeter-cli submit   --data-type <type> --source <name> --value <v> --location <loc> [--unit <u>]
//!   dmeter-cli show     <id>
//!   dmeter-cli list     [--location <loc>] [--data-type <type>] [--from <t>] [--to <t>] [--limit <n>]
//!   dmeter-cli stats
//!   dmeter-cli info

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use dmeter_core::constants::REWARD_TICKER;
use dmeter_core::submission::{Submission, SubmissionQuery};
use dmeter_core::types::Timestamp;
use dmeter_rpc::RpcReceipt;
use dmeter_scoring::RewardBreakdown;

mod rpc_client;
use rpc_client::NodeRpcClient;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "dmeter-cli",
    version,
    about = "dMeter client — browse sources, preview rewards and submit readings"
)]
struct Args {
    /// Node RPC endpoint.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8646")]
    rpc: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Reading {
    /// Measurement type, e.g. "Temperature" or "Air Quality".
    #[arg(long)]
    data_type: String,
    /// Registry source name, e.g. "Sentinel-2".
    #[arg(long)]
    source: String,
    /// Measured value. Required to submit; previews treat a missing value as 0.
    #[arg(long)]
    value: Option<f64>,
    #[arg(long, default_value = "")]
    location: String,
    /// Defaults to the data type's usual unit.
    #[arg(long, default_value = "")]
    unit: String,
}

impl Reading {
    /// A draft for previewing; missing fields stay blank.
    fn into_draft(self) -> Submission {
        Submission {
            value: self.value.unwrap_or_default(),
            location: self.location,
            data_type: self.data_type,
            unit: self.unit,
            source: self.source,
        }
    }

    /// A complete reading; `--value` and `--location` must be given.
    fn into_submission(self) -> anyhow::Result<Submission> {
        if self.value.is_none() {
            bail!("--value is required to submit");
        }
        if self.location.trim().is_empty() {
            bail!("--location is required to submit");
        }
        Ok(self.into_draft())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registry sources.
    Sources {
        /// Only sources of this kind (satellite, iot, human, community).
        #[arg(long)]
        kind: Option<String>,
    },

    /// Print one source's full descriptor as JSON.
    Source { name: String },

    /// Show the reward a reading would earn, without submitting it.
    Preview(Reading),

    /// Verify, score and record a reading.
    Submit(Reading),

    /// Print a recorded submission.
    Show { id: String },

    /// List recorded submissions, newest first.
    List {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        data_type: Option<String>,
        /// Earliest recording time: unix seconds, RFC 3339 or YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// Latest recording time; a bare date includes the whole day.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Submission count and rewards issued.
    Stats,

    /// Node and registry versions.
    Info,
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn,dmeter_cli=info")
        .init();

    let args = Args::parse();
    let client = NodeRpcClient::new(&args.rpc);

    match args.command {
        Command::Sources { kind } => {
            let sources = client.list_sources(kind.as_deref()).await?;
            for s in sources {
                println!(
                    "{:<40} {:<10} trust {:.2}  {}",
                    s.name, s.kind.as_str(), s.trust_score, s.verification_method
                );
            }
            Ok(())
        }

        Command::Source { name } => {
            let source = client.get_source(&name).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&source).context("formatting source")?
            );
            Ok(())
        }

        Command::Preview(reading) => {
            let draft = reading.into_draft();
            match client.preview_reward(&draft).await? {
                Some(breakdown) => print_breakdown(&breakdown),
                None => println!(
                    "Nothing to preview: the draft needs a location and a known source."
                ),
            }
            Ok(())
        }

        Command::Submit(reading) => {
            let submission = reading.into_submission()?;
            info!(source = %submission.source, "submitting reading");
            let receipt = client.submit_data(&submission).await?;
            print_receipt(&receipt);
            Ok(())
        }

        Command::Show { id } => {
            match client.get_submission(&id).await? {
                Some(receipt) => print_receipt(&receipt),
                None => bail!("no submission with id {id}"),
            }
            Ok(())
        }

        Command::List {
            location,
            data_type,
            from,
            to,
            limit,
        } => {
            let query = SubmissionQuery {
                location,
                data_type,
                from: from.as_deref().map(|t| parse_time(t, false)).transpose()?,
                to: to.as_deref().map(|t| parse_time(t, true)).transpose()?,
                limit,
            };
            let receipts = client.list_submissions(&query).await?;
            if receipts.is_empty() {
                println!("No submissions match.");
            }
            for r in receipts {
                println!(
                    "{}  {}  {:<14} {} {} @ {}  {} {}",
                    format_timestamp(r.recorded_at),
                    &r.id[..16.min(r.id.len())],
                    r.submission.data_type,
                    r.submission.value,
                    r.submission.unit,
                    r.submission.location,
                    r.reward_amount,
                    r.ticker
                );
            }
            Ok(())
        }

        Command::Stats => {
            let stats = client.get_stats().await?;
            println!("Submissions:   {}", stats.submissions);
            println!("Rewards issued: {} {}", stats.total_rewards, stats.ticker);
            Ok(())
        }

        Command::Info => {
            let v = client.get_version().await?;
            println!("Node version:     {}", v.node_version);
            println!("API version:      {}", v.api_version);
            println!("Registry version: {}", v.registry_version);
            println!("Sources:          {}", v.source_count);
            Ok(())
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_breakdown(b: &RewardBreakdown) {
    println!("Base rate:          {} {}", b.base_rate, REWARD_TICKER);
    println!("Source multiplier:  x{:.2}", b.source_multiplier);
    println!("Trust:              x{:.2}", b.trust);
    println!("Quality:            x{:.4}", b.quality);
    for (label, factor) in [
        ("Decentralization:", b.decentralization_bonus),
        ("Engagement:", b.engagement_bonus),
        ("Compliance:", b.compliance_bonus),
        ("Peer review:", b.peer_review_bonus),
    ] {
        if factor != 1.0 {
            println!("{label:<20}x{factor:.4}");
        }
    }
    println!("Reward:             {} {}  ({:.2})", b.amount, REWARD_TICKER, b.total);
}

fn print_receipt(r: &RpcReceipt) {
    println!("Submission:  {}", r.id);
    println!(
        "Reading:     {} {} {} at {}",
        r.submission.data_type, r.submission.value, r.submission.unit, r.submission.location
    );
    println!("Source:      {} ({})", r.verification.source, r.verification.method);
    println!("Proof:       {}", r.verification.proof);
    println!("Trust score: {:.4}", r.trust_score);
    println!("Reward:      {} {}", r.reward_amount, r.ticker);
    println!("Recorded:    {}", format_timestamp(r.recorded_at));
}

/// Unix seconds, an RFC 3339 instant or a `YYYY-MM-DD` date (UTC). A bare
/// date resolves to its first second, or its last when `end_of_day` is set.
fn parse_time(input: &str, end_of_day: bool) -> anyhow::Result<Timestamp> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<Timestamp>() {
        return Ok(secs);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(dt.timestamp());
    }
    let date = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("unrecognised time {input:?}"))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc().timestamp())
        .with_context(|| format!("time out of range: {input}"))
}

fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn submit_flags_build_a_submission() {
        let args = Args::try_parse_from([
            "dmeter-cli",
            "submit",
            "--data-type",
            "Air Quality",
            "--source",
            "OpenAQ",
            "--value",
            "42",
            "--location",
            "Delhi",
        ])
        .unwrap();
        let Command::Submit(reading) = args.command else {
            panic!("expected submit");
        };
        let s = reading.into_submission().unwrap();
        assert_eq!(s.data_type, "Air Quality");
        assert_eq!(s.value, 42.0);
        assert!(s.unit.is_empty());
        assert_eq!(args.rpc, "http://127.0.0.1:8646");
    }

    #[test]
    fn submit_requires_a_value() {
        let args = Args::try_parse_from([
            "dmeter-cli",
            "submit",
            "--data-type",
            "Temperature",
            "--source",
            "Sentinel-2",
            "--location",
            "Nairobi",
        ])
        .unwrap();
        let Command::Submit(reading) = args.command else {
            panic!("expected submit");
        };
        let err = reading.into_submission().unwrap_err();
        assert!(err.to_string().contains("--value"));
    }

    #[test]
    fn preview_draft_defaults_missing_value() {
        let args = Args::try_parse_from([
            "dmeter-cli",
            "preview",
            "--data-type",
            "Temperature",
            "--source",
            "Sentinel-2",
        ])
        .unwrap();
        let Command::Preview(reading) = args.command else {
            panic!("expected preview");
        };
        let draft = reading.into_draft();
        assert_eq!(draft.value, 0.0);
        assert!(draft.location.is_empty());
    }

    #[test]
    fn list_times_accept_several_forms() {
        assert_eq!(parse_time("1735689600", false).unwrap(), 1_735_689_600);
        assert_eq!(
            parse_time("2025-01-01T00:00:00Z", false).unwrap(),
            1_735_689_600
        );
        assert_eq!(parse_time("2025-01-01", false).unwrap(), 1_735_689_600);
        assert_eq!(parse_time("2025-01-01", true).unwrap(), 1_735_689_600 + 86_399);
        assert!(parse_time("last tuesday", false).is_err());
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(1_735_689_600), "2025-01-01 00:00:00 UTC");
    }
}
