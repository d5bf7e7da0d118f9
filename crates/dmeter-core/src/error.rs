use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmeterError {
    // ── Input errors ─────────────────────────────────────────────────────────
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("no data source selected")]
    NoSourceSelected,

    // ── Lookup errors ────────────────────────────────────────────────────────
    #[error("unknown data source: {0}")]
    SourceNotFound(String),

    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),

    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    // ── Registry errors ──────────────────────────────────────────────────────
    #[error("invalid source registry: {0}")]
    InvalidRegistry(String),

    #[error("duplicate source name in registry: {0}")]
    DuplicateSource(String),

    #[error("unsupported registry version {got} (expected {expected})")]
    UnsupportedRegistryVersion { expected: u32, got: u32 },

    // ── Verification errors ──────────────────────────────────────────────────
    #[error("verification cancelled")]
    VerificationCancelled,

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    // ── General ──────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl DmeterError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// True for the lookup failures a caller reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::SubmissionNotFound(_)
        )
    }
}
