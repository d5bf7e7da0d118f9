use serde::{Deserialize, Serialize};

use crate::types::{SourceKind, Timestamp};

/// Descriptor of a data-origin class (not an individual device or sensor).
///
/// Entries are immutable once loaded into the registry. Probability-like
/// fields are expected in [0, 1] but consumers clamp them anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Unique registry key, e.g. "Sentinel-2".
    pub name: String,
    pub kind: SourceKind,
    #[serde(default)]
    pub description: String,
    /// Static trust prior in [0, 1].
    pub trust_score: f64,
    /// Verification technique reported on every record for this source.
    pub verification_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub calibration_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_compliance: Option<RegulatoryCompliance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_review: Option<PeerReviewPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decentralization: Option<Decentralization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem_services: Option<EcosystemServices>,
}

impl DataSource {
    /// A bare source with no optional metadata blocks.
    pub fn new(
        name: impl Into<String>,
        kind: SourceKind,
        trust_score: f64,
        verification_method: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            trust_score,
            verification_method: verification_method.into(),
            api_endpoint: None,
            calibration_required: false,
            update_frequency: None,
            data_quality: None,
            regulatory_compliance: None,
            peer_review: None,
            decentralization: None,
            engagement: None,
            ecosystem_services: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub accuracy: f64,
    pub precision: f64,
    pub reliability: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegulatoryCompliance {
    pub standards: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub last_audit: Timestamp,
    #[serde(default)]
    pub next_audit_due: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeerReviewPolicy {
    pub required: bool,
    #[serde(default)]
    pub min_reviewers: u32,
    #[serde(default)]
    pub review_timeframe: String,
    #[serde(default)]
    pub criteria: Vec<String>,
}

/// Validator-network metadata. Used only as a scoring bonus; nothing here
/// runs consensus.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decentralization {
    pub node_count: u64,
    pub consensus_required: bool,
    #[serde(default)]
    pub consensus_threshold: f64,
    #[serde(default)]
    pub community_governance: bool,
    #[serde(default)]
    pub staking_required: bool,
    #[serde(default)]
    pub min_stake_amount: u64,
    #[serde(default)]
    pub slashing_enabled: bool,
    #[serde(default)]
    pub slashing_threshold: f64,
    pub validator_count: u64,
    pub active_validators: u64,
    pub network_health: f64,
    pub decentralization_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub contributor_count: u64,
    #[serde(default)]
    pub validation_count: u64,
    pub community_score: f64,
    pub reputation_multiplier: f64,
    pub active_contributors: u64,
    pub contribution_history: ContributionHistory,
    #[serde(default)]
    pub community_roles: CommunityRoles,
    pub governance_participation: GovernanceParticipation,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionHistory {
    pub last_month: u64,
    pub last_quarter: u64,
    pub last_year: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommunityRoles {
    pub validators: u64,
    pub data_providers: u64,
    pub reviewers: u64,
    pub developers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GovernanceParticipation {
    pub proposals_submitted: u64,
    pub proposals_passed: u64,
    pub voting_power: f64,
}

// ── Ecosystem services ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Provisioning,
    Regulating,
    Cultural,
    Supporting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialScale {
    Local,
    Regional,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalScale {
    Instant,
    Daily,
    Monthly,
    Yearly,
}

/// One ecosystem service a source can attest to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemService {
    pub category: ServiceCategory,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit: String,
    pub measurement_method: String,
    pub confidence: f64,
    pub spatial_scale: SpatialScale,
    pub temporal_scale: TemporalScale,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub impacts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub reliability: f64,
    pub completeness: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EcosystemServices {
    #[serde(default)]
    pub services: Vec<EcosystemService>,
    /// Total assessed value in the valuation method's currency.
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub valuation_method: String,
    #[serde(default)]
    pub last_assessment: Timestamp,
    #[serde(default)]
    pub next_assessment_due: Timestamp,
    pub spatial_coverage: f64,
    pub temporal_coverage: f64,
    pub quality_metrics: QualityMetrics,
}
