use std::path::Path;

use serde::{Deserialize, Serialize};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
};
use sled::Transactional;

use dmeter_core::error::DmeterError;
use dmeter_core::submission::{SubmissionQuery, SubmissionReceipt};
use dmeter_core::types::{SubmissionId, Timestamp, TokenAmount};

const STATS_KEY: &[u8] = b"stats";
const ID_LEN: usize = 32;

/// Running totals over every persisted receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub submissions: u64,
    pub total_rewards: TokenAmount,
}

/// Persistent submission store backed by sled.
///
/// Named trees:
///   submissions  — SubmissionId bytes → bincode(SubmissionReceipt)
///   meta         — utf8 key bytes     → bincode(StoreStats) under "stats"
///   by_time      — time ‖ id          → empty
///   by_location  — len ‖ location ‖ time ‖ id → empty
///   by_type      — len ‖ data_type ‖ time ‖ id → empty
///
/// `time` is `recorded_at` as an order-preserving big-endian u64 and `len`
/// a big-endian u32, so every index is sorted by time within its prefix.
pub struct StateDb {
    db: sled::Db,
    submissions: sled::Tree,
    meta: sled::Tree,
    by_time: sled::Tree,
    by_location: sled::Tree,
    by_type: sled::Tree,
}

fn storage(e: sled::Error) -> DmeterError {
    DmeterError::Storage(e.to_string())
}

fn serialization(e: bincode::Error) -> DmeterError {
    DmeterError::Serialization(e.to_string())
}

/// Signed timestamps mapped onto u64 so byte order matches numeric order.
fn time_key(ts: Timestamp) -> [u8; 8] {
    ((ts as u64) ^ (1 << 63)).to_be_bytes()
}

fn field_prefix(field: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(4 + field.len() + 8 + ID_LEN);
    key.extend_from_slice(&(field.len() as u32).to_be_bytes());
    key.extend_from_slice(field.as_bytes());
    key
}

fn index_key(prefix: &[u8], ts: Timestamp, id: &SubmissionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 8 + ID_LEN);
    key.extend_from_slice(prefix);
    key.extend_from_slice(&time_key(ts));
    key.extend_from_slice(id.as_bytes());
    key
}

impl StateDb {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DmeterError> {
        Self::from_db(sled::open(path).map_err(storage)?)
    }

    /// An in-memory store that is discarded on drop.
    pub fn open_temporary() -> Result<Self, DmeterError> {
        Self::from_db(sled::Config::new().temporary(true).open().map_err(storage)?)
    }

    fn from_db(db: sled::Db) -> Result<Self, DmeterError> {
        let submissions = db.open_tree("submissions").map_err(storage)?;
        let meta = db.open_tree("meta").map_err(storage)?;
        let by_time = db.open_tree("by_time").map_err(storage)?;
        let by_location = db.open_tree("by_location").map_err(storage)?;
        let by_type = db.open_tree("by_type").map_err(storage)?;
        Ok(Self {
            db,
            submissions,
            meta,
            by_time,
            by_location,
            by_type,
        })
    }

    // ── Receipts ─────────────────────────────────────────────────────────────

    /// Persist a receipt, index it and fold it into the running stats
    /// atomically.
    ///
    /// Returns `false` without writing if a receipt with the same id exists.
    pub fn put_receipt(&self, receipt: &SubmissionReceipt) -> Result<bool, DmeterError> {
        let key: &[u8] = receipt.id.as_bytes();
        let bytes = bincode::serialize(receipt).map_err(serialization)?;
        let ts = receipt.recorded_at;
        let time_index = index_key(&[], ts, &receipt.id);
        let location_index = index_key(&field_prefix(&receipt.submission.location), ts, &receipt.id);
        let type_index = index_key(&field_prefix(&receipt.submission.data_type), ts, &receipt.id);

        let trees = (
            &self.submissions,
            &self.meta,
            &self.by_time,
            &self.by_location,
            &self.by_type,
        );
        trees
            .transaction(
                |(subs, meta, by_time, by_location, by_type)| -> ConflictableTransactionResult<bool, DmeterError> {
                    if subs.get(key)?.is_some() {
                        return Ok(false);
                    }
                    let mut stats: StoreStats = match meta.get(STATS_KEY)? {
                        Some(raw) => bincode::deserialize(&raw).map_err(|e| {
                            ConflictableTransactionError::Abort(serialization(e))
                        })?,
                        None => StoreStats::default(),
                    };
                    stats.submissions += 1;
                    stats.total_rewards = stats.total_rewards.saturating_add(receipt.reward_amount);
                    let encoded = bincode::serialize(&stats)
                        .map_err(|e| ConflictableTransactionError::Abort(serialization(e)))?;

                    subs.insert(key, bytes.as_slice())?;
                    meta.insert(STATS_KEY, encoded)?;
                    by_time.insert(time_index.as_slice(), &[] as &[u8])?;
                    by_location.insert(location_index.as_slice(), &[] as &[u8])?;
                    by_type.insert(type_index.as_slice(), &[] as &[u8])?;
                    Ok(true)
                },
            )
            .map_err(|e: TransactionError<DmeterError>| match e {
                TransactionError::Abort(inner) => inner,
                TransactionError::Storage(e) => storage(e),
            })
    }

    pub fn get_receipt(&self, id: &SubmissionId) -> Result<Option<SubmissionReceipt>, DmeterError> {
        match self.submissions.get(id.as_bytes()).map_err(storage)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(serialization)?)),
            None => Ok(None),
        }
    }

    /// Receipts matching `query`, newest first.
    ///
    /// Scans the narrowest index the query names (location, then data type,
    /// then time alone) and checks the remaining filters per receipt.
    pub fn query_receipts(
        &self,
        query: &SubmissionQuery,
    ) -> Result<Vec<SubmissionReceipt>, DmeterError> {
        let limit = query.limit();
        if limit == 0 || query.earliest() > query.latest() {
            return Ok(Vec::new());
        }

        let (tree, prefix) = match (query.location(), query.data_type()) {
            (Some(location), _) => (&self.by_location, field_prefix(location)),
            (None, Some(data_type)) => (&self.by_type, field_prefix(data_type)),
            (None, None) => (&self.by_time, Vec::new()),
        };

        let mut lo = prefix.clone();
        lo.extend_from_slice(&time_key(query.earliest()));
        let mut hi = prefix;
        hi.extend_from_slice(&time_key(query.latest()));
        hi.extend_from_slice(&[0xFF; ID_LEN]);

        let mut out = Vec::new();
        for item in tree.range(lo..=hi).rev() {
            let (key, _) = item.map_err(storage)?;
            let id_bytes: [u8; ID_LEN] = key
                .get(key.len().saturating_sub(ID_LEN)..)
                .and_then(|tail| tail.try_into().ok())
                .ok_or_else(|| DmeterError::Storage("malformed index key".into()))?;
            let id = SubmissionId::from_bytes(id_bytes);
            let receipt = self
                .get_receipt(&id)?
                .ok_or_else(|| DmeterError::Storage(format!("index points at missing receipt {id}")))?;
            if query.matches(&receipt) {
                out.push(receipt);
                if out.len() == limit {
                    break;
                }
            }
        }
        Ok(out)
    }

    // ── Meta ──────────────────────────────────────────────────────────────────

    pub fn stats(&self) -> Result<StoreStats, DmeterError> {
        match self.meta.get(STATS_KEY).map_err(storage)? {
            Some(raw) => bincode::deserialize(&raw).map_err(serialization),
            None => Ok(StoreStats::default()),
        }
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), DmeterError> {
        self.db.flush().map_err(storage)?;
        Ok(())
    }
}
