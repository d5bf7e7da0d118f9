use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::types::SourceKind;
use serde::{Deserialize, Serialize};

/// On-disk form of the source registry: a versioned list of descriptors
/// grouped by source kind.
///
/// ```json
/// { "version": 1, "satellite": [...], "iot": [...], "human": [...], "community": [...] }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceCatalog {
    pub version: u32,
    #[serde(default)]
    pub satellite: Vec<DataSource>,
    #[serde(default)]
    pub iot: Vec<DataSource>,
    #[serde(default)]
    pub human: Vec<DataSource>,
    #[serde(default)]
    pub community: Vec<DataSource>,
}

impl SourceCatalog {
    pub fn group(&self, kind: SourceKind) -> &[DataSource] {
        match kind {
            SourceKind::Satellite => &self.satellite,
            SourceKind::Iot => &self.iot,
            SourceKind::Human => &self.human,
            SourceKind::Community => &self.community,
        }
    }

    pub fn group_mut(&mut self, kind: SourceKind) -> &mut Vec<DataSource> {
        match kind {
            SourceKind::Satellite => &mut self.satellite,
            SourceKind::Iot => &mut self.iot,
            SourceKind::Human => &mut self.human,
            SourceKind::Community => &mut self.community,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DmeterError> {
        serde_json::from_str(json)
            .map_err(|e| DmeterError::InvalidRegistry(format!("parsing catalog JSON: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String, DmeterError> {
        serde_json::to_string_pretty(self).map_err(|e| DmeterError::Serialization(e.to_string()))
    }
}
