//! dmeter-registry
//!
//! Immutable catalog of data-source descriptors, partitioned by source kind.
//!
//! The registry is the producer of every `DataSource` the scoring pipeline
//! sees, so loading normalises probability-like fields into [0, 1] and rejects
//! catalogs with blank or duplicate names, or entries filed under the wrong
//! kind. After construction nothing is ever mutated.

pub mod builtin;
pub mod catalog;

pub use builtin::builtin_catalog;
pub use catalog::SourceCatalog;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use dmeter_core::constants::REGISTRY_FORMAT_VERSION;
use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::types::{non_negative, unit_interval, SourceKind};

/// Read-only, name-indexed view over a validated source catalog.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    version: u32,
    /// Ordered satellite → iot → human → community, catalog order within.
    sources: Vec<DataSource>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    /// The stock catalog shipped with the node.
    pub fn builtin() -> Self {
        let catalog = builtin_catalog();
        let version = catalog.version;
        let sources = SourceKind::ALL
            .into_iter()
            .flat_map(|kind| catalog.group(kind).iter().cloned())
            .collect();
        Self::index(version, sources)
    }

    /// Validate and normalise a catalog.
    pub fn from_catalog(catalog: SourceCatalog) -> Result<Self, DmeterError> {
        if catalog.version != REGISTRY_FORMAT_VERSION {
            return Err(DmeterError::UnsupportedRegistryVersion {
                expected: REGISTRY_FORMAT_VERSION,
                got: catalog.version,
            });
        }

        let mut sources = Vec::new();
        let mut seen = HashSet::new();
        for kind in SourceKind::ALL {
            for entry in catalog.group(kind) {
                if entry.kind != kind {
                    return Err(DmeterError::InvalidRegistry(format!(
                        "source {:?} has kind {} but is listed under {}",
                        entry.name, entry.kind, kind
                    )));
                }
                let name = entry.name.trim();
                if name.is_empty() {
                    return Err(DmeterError::InvalidRegistry(format!(
                        "unnamed source under {kind}"
                    )));
                }
                if !seen.insert(name.to_string()) {
                    return Err(DmeterError::DuplicateSource(name.to_string()));
                }
                let mut source = normalise(entry.clone());
                source.name = name.to_string();
                sources.push(source);
            }
        }

        Ok(Self::index(catalog.version, sources))
    }

    pub fn from_json(json: &str) -> Result<Self, DmeterError> {
        Self::from_catalog(SourceCatalog::from_json(json)?)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> Result<Self, DmeterError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DmeterError::InvalidRegistry(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn index(version: u32, sources: Vec<DataSource>) -> Self {
        let mut index = HashMap::with_capacity(sources.len());
        for (i, s) in sources.iter().enumerate() {
            index.entry(s.name.clone()).or_insert(i);
        }
        Self {
            version,
            sources,
            index,
        }
    }

    /// Look up a source by its exact name.
    ///
    /// # Errors
    /// `DmeterError::SourceNotFound` if no source has that name.
    pub fn find_source_by_name(&self, name: &str) -> Result<&DataSource, DmeterError> {
        self.get(name)
            .ok_or_else(|| DmeterError::SourceNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&DataSource> {
        self.index.get(name).map(|&i| &self.sources[i])
    }

    pub fn by_kind(&self, kind: SourceKind) -> impl Iterator<Item = &DataSource> {
        self.sources.iter().filter(move |s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Regroup the registry into its on-disk catalog form.
    pub fn to_catalog(&self) -> SourceCatalog {
        let mut catalog = SourceCatalog {
            version: self.version,
            ..Default::default()
        };
        for s in &self.sources {
            catalog.group_mut(s.kind).push(s.clone());
        }
        catalog
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Clamp every probability-like field into [0, 1] and multipliers to >= 0.
fn normalise(mut s: DataSource) -> DataSource {
    s.trust_score = unit_interval(s.trust_score);

    if let Some(q) = s.data_quality.as_mut() {
        q.accuracy = unit_interval(q.accuracy);
        q.precision = unit_interval(q.precision);
        q.reliability = unit_interval(q.reliability);
    }

    if let Some(d) = s.decentralization.as_mut() {
        d.network_health = unit_interval(d.network_health);
        d.decentralization_score = unit_interval(d.decentralization_score);
        d.consensus_threshold = unit_interval(d.consensus_threshold);
        d.slashing_threshold = unit_interval(d.slashing_threshold);
    }

    if let Some(e) = s.engagement.as_mut() {
        e.community_score = unit_interval(e.community_score);
        e.governance_participation.voting_power =
            unit_interval(e.governance_participation.voting_power);
        e.reputation_multiplier = non_negative(e.reputation_multiplier);
    }

    if let Some(es) = s.ecosystem_services.as_mut() {
        es.spatial_coverage = unit_interval(es.spatial_coverage);
        es.temporal_coverage = unit_interval(es.temporal_coverage);
        let m = &mut es.quality_metrics;
        m.accuracy = unit_interval(m.accuracy);
        m.precision = unit_interval(m.precision);
        m.reliability = unit_interval(m.reliability);
        m.completeness = unit_interval(m.completeness);
        for svc in es.services.iter_mut() {
            svc.confidence = unit_interval(svc.confidence);
        }
    }

    s
}
