use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use crate::error::DmeterError;
use crate::types::{DataType, SubmissionId, Timestamp, TokenAmount};
use crate::verification::VerificationRecord;

/// One environmental data point reported by a user or device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub value: f64,
    pub location: String,
    /// Display name of the measurement type, e.g. "Air Quality".
    pub data_type: String,
    #[serde(default)]
    pub unit: String,
    /// Name of the registry source the reading came from. Empty when the
    /// reporter has not picked one yet.
    #[serde(default)]
    pub source: String,
}

impl Submission {
    /// Known measurement type, if the display name is in the rate table.
    pub fn known_type(&self) -> Option<DataType> {
        DataType::from_name(&self.data_type)
    }

    /// The selected source name, or `None` while nothing is selected.
    pub fn selected_source(&self) -> Option<&str> {
        let s = self.source.trim();
        (!s.is_empty()).then_some(s)
    }

    /// Check the required fields: `data_type` and `location` must be present
    /// and `value` must be a finite number.
    pub fn validate(&self) -> Result<(), DmeterError> {
        if self.data_type.trim().is_empty() {
            return Err(DmeterError::invalid("data_type", "is required"));
        }
        if self.location.trim().is_empty() {
            return Err(DmeterError::invalid("location", "is required"));
        }
        if !self.value.is_finite() {
            return Err(DmeterError::invalid("value", "must be a finite number"));
        }
        Ok(())
    }

    /// Fill in the default unit for known data types when none was given.
    pub fn with_default_unit(mut self) -> Self {
        if self.unit.trim().is_empty() {
            if let Some(t) = self.known_type() {
                self.unit = t.unit().to_string();
            }
        }
        self
    }
}

/// The persisted outcome of a verified, scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: SubmissionId,
    pub submission: Submission,
    pub trust_score: f64,
    pub reward_amount: TokenAmount,
    pub verification: VerificationRecord,
    pub recorded_at: Timestamp,
}

impl SubmissionReceipt {
    /// Derive the receipt id from the submission and its verification time.
    pub fn derive_id(submission: &Submission, verified_at: Timestamp) -> SubmissionId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(submission.data_type.as_bytes());
        hasher.update(&[0]);
        hasher.update(submission.location.as_bytes());
        hasher.update(&[0]);
        hasher.update(submission.source.as_bytes());
        hasher.update(&[0]);
        hasher.update(&submission.value.to_le_bytes());
        hasher.update(&verified_at.to_le_bytes());
        SubmissionId::from_bytes(*hasher.finalize().as_bytes())
    }
}

/// Filter over persisted receipts.
///
/// `location` and `data_type` match exactly; blank strings mean "any".
/// `from` and `to` bound `recorded_at` inclusively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub from: Option<Timestamp>,
    #[serde(default)]
    pub to: Option<Timestamp>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SubmissionQuery {
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn earliest(&self) -> Timestamp {
        self.from.unwrap_or(Timestamp::MIN)
    }

    pub fn latest(&self) -> Timestamp {
        self.to.unwrap_or(Timestamp::MAX)
    }

    /// Requested limit, capped at `MAX_QUERY_LIMIT`.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT)
    }

    pub fn matches(&self, receipt: &SubmissionReceipt) -> bool {
        self.location()
            .map_or(true, |l| receipt.submission.location == l)
            && self
                .data_type()
                .map_or(true, |t| receipt.submission.data_type == t)
            && (self.earliest()..=self.latest()).contains(&receipt.recorded_at)
    }
}
