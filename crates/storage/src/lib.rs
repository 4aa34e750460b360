//! Module state persistence.
//!
//! Each module keeps its state as a handful of single records under well-known
//! keys. A record is a JSON envelope carrying a schema version so that a node
//! never silently decodes a layout it does not understand.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Schema version written into every record envelope.
pub const RECORD_VERSION: u16 = 1;

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record {key} has unsupported version {found} (expected {expected})")]
    UnsupportedVersion {
        key: String,
        found: u16,
        expected: u16,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Raw byte-level store.
pub trait Storage: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put_raw(&self, key: &str, value: Vec<u8>) -> Result<()>;
    fn delete_raw(&self, key: &str) -> Result<()>;
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u16,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u16,
    data: T,
}

/// Write `value` as a versioned record under `key`.
pub fn put_record<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: Storage + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(&EnvelopeRef {
        version: RECORD_VERSION,
        data: value,
    })?;
    store.put_raw(key, bytes)
}

/// Read the record under `key`, if any.
pub fn get_record<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let Some(bytes) = store.get_raw(key)? else {
        return Ok(None);
    };
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    if envelope.version != RECORD_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: envelope.version,
            expected: RECORD_VERSION,
        });
    }
    Ok(Some(envelope.data))
}

/// Sled-backed implementation
pub struct SledStorage {
    db: Db,
    records: Tree,
}

impl SledStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree("module_records")?;
        Ok(Self { db, records })
    }
}

impl Storage for SledStorage {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.records.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn put_raw(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.records.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<()> {
        self.records.remove(key.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        tracing::debug!(target: "storage", "flushed module records");
        Ok(())
    }
}

/// In-memory testing backend
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.records.write().insert(key.to_string(), value);
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<()> {
        self.records.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        height: u64,
        label: String,
    }

    #[test]
    fn record_roundtrip_in_memory() {
        let store = MemoryStorage::new();
        assert!(get_record::<_, Sample>(&store, "x/sample").unwrap().is_none());

        let sample = Sample {
            height: 7,
            label: "seven".into(),
        };
        put_record(&store, "x/sample", &sample).unwrap();
        assert_eq!(get_record::<_, Sample>(&store, "x/sample").unwrap(), Some(sample));

        store.delete_raw("x/sample").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_unknown_version() {
        let store = MemoryStorage::new();
        store
            .put_raw("x/sample", br#"{"version":9,"data":{"height":1,"label":"a"}}"#.to_vec())
            .unwrap();

        let err = get_record::<_, Sample>(&store, "x/sample").unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 9, expected: RECORD_VERSION, .. }
        ));
    }
}
