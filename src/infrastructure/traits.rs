//! I/O boundary traits for testability
//!
//! The department store is the durable source of truth: flat records only.
//! Services build aggregates from it per operation and write back one record
//! per changed or removed node.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::FlatRecord;

/// Flat record store abstraction.
pub trait DepartmentStore: Send + Sync {
    /// All records, in store order.
    fn fetch_all_records(&self) -> io::Result<Vec<FlatRecord>>;

    /// Insert a record or replace the one with the same id.
    fn upsert_record(&self, record: &FlatRecord) -> io::Result<()>;

    /// Delete the record with `id`. Deleting a missing id is not an error.
    fn delete_record(&self, id: Uuid) -> io::Result<()>;
}

fn upsert_into(records: &mut Vec<FlatRecord>, record: &FlatRecord) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Process-local store, keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<FlatRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<FlatRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Vec<FlatRecord>>> {
        self.records
            .lock()
            .map_err(|_| io::Error::other("department store lock poisoned"))
    }
}

impl DepartmentStore for InMemoryStore {
    fn fetch_all_records(&self) -> io::Result<Vec<FlatRecord>> {
        Ok(self.lock()?.clone())
    }

    fn upsert_record(&self, record: &FlatRecord) -> io::Result<()> {
        upsert_into(&mut *self.lock()?, record);
        Ok(())
    }

    fn delete_record(&self, id: Uuid) -> io::Result<()> {
        self.lock()?.retain(|r| r.id != id);
        Ok(())
    }
}

/// On-disk layout of [`TomlFileStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default, rename = "department")]
    departments: Vec<FlatRecord>,
}

/// Store backed by a TOML file of `[[department]]` tables.
///
/// A missing file reads as an empty store. Every write rewrites the whole
/// file through a temporary sibling that is renamed into place.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<Vec<FlatRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let file: RecordFile = toml::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(file.departments)
    }

    #[instrument(level = "debug", skip(self, records), fields(path = %self.path.display()))]
    fn write(&self, records: Vec<FlatRecord>) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = toml::to_string_pretty(&RecordFile {
            departments: records,
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("wrote {} bytes", content.len());
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<FlatRecord>)) -> io::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| io::Error::other("department store lock poisoned"))?;
        let mut records = self.read()?;
        f(&mut records);
        self.write(records)
    }
}

impl DepartmentStore for TomlFileStore {
    fn fetch_all_records(&self) -> io::Result<Vec<FlatRecord>> {
        self.read()
    }

    fn upsert_record(&self, record: &FlatRecord) -> io::Result<()> {
        self.modify(|records| upsert_into(records, record))
    }

    fn delete_record(&self, id: Uuid) -> io::Result<()> {
        self.modify(|records| records.retain(|r| r.id != id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_existing_id_when_upserting_then_replaces_in_place() {
        let a = FlatRecord::root(Uuid::new_v4(), "A");
        let b = FlatRecord::root(Uuid::new_v4(), "B");
        let store = InMemoryStore::with_records(vec![a.clone(), b.clone()]);

        let renamed = FlatRecord::root(a.id, "A2");
        store.upsert_record(&renamed).unwrap();

        assert_eq!(store.fetch_all_records().unwrap(), vec![renamed, b]);
    }

    #[test]
    fn given_missing_id_when_deleting_then_is_noop() {
        let store = InMemoryStore::with_records(vec![FlatRecord::root(Uuid::new_v4(), "A")]);

        store.delete_record(Uuid::new_v4()).unwrap();

        assert_eq!(store.fetch_all_records().unwrap().len(), 1);
    }
}
