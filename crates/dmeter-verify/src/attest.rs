//! Submission signatures and per-kind verification proofs.
//!
//! Both are BLAKE3 digests over a canonical JSON payload, truncated to
//! `ATTESTATION_DIGEST_HEX_LEN` hex characters and tagged with a prefix.

use dmeter_core::constants::ATTESTATION_DIGEST_HEX_LEN;
use dmeter_core::source::DataSource;
use dmeter_core::submission::Submission;
use dmeter_core::types::Timestamp;
use serde_json::json;

fn digest(payload: &serde_json::Value) -> String {
    let hash = blake3::hash(payload.to_string().as_bytes());
    let mut hex = hex::encode(hash.as_bytes());
    hex.truncate(ATTESTATION_DIGEST_HEX_LEN);
    hex
}

/// `sig_<digest>` over the reading itself and the verification time.
pub fn sign_submission(submission: &Submission, timestamp: Timestamp) -> String {
    let payload = json!({
        "value": submission.value,
        "location": submission.location,
        "data_type": submission.data_type,
        "timestamp": timestamp,
    });
    format!("sig_{}", digest(&payload))
}

/// `<kind>_<digest>` binding the reading to the source that produced it.
pub fn verification_proof(
    submission: &Submission,
    source: &DataSource,
    timestamp: Timestamp,
) -> String {
    let payload = json!({
        "source": source.name,
        "timestamp": timestamp,
        "location": submission.location,
        "data_type": submission.data_type,
        "value": submission.value,
    });
    format!("{}_{}", source.kind.proof_prefix(), digest(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmeter_core::types::SourceKind;

    fn reading() -> Submission {
        Submission {
            value: 7.1,
            location: "Lake Constance".into(),
            data_type: "Water Quality".into(),
            unit: "pH".into(),
            source: "OpenSense".into(),
        }
    }

    #[test]
    fn signature_is_stable_and_time_bound() {
        let a = sign_submission(&reading(), 100);
        assert_eq!(a, sign_submission(&reading(), 100));
        assert_ne!(a, sign_submission(&reading(), 101));
        assert!(a.starts_with("sig_"));
        assert_eq!(a.len(), 4 + ATTESTATION_DIGEST_HEX_LEN);
    }

    #[test]
    fn proof_prefix_follows_source_kind() {
        let iot = DataSource::new("OpenSense", SourceKind::Iot, 0.88, "Multi-sensor");
        let community = DataSource::new("Citizens", SourceKind::Community, 0.8, "Consensus");
        assert!(verification_proof(&reading(), &iot, 1).starts_with("iot_"));
        assert!(verification_proof(&reading(), &community, 1).starts_with("com_"));
    }
}
