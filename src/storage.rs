use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};
use uuid::Uuid;

use crate::error::StorageError;

type Entries = BTreeMap<String, String>;

// 1. LocalStorage Contract
/// LocalStorage
///
/// String key/value storage holding the cached session. `apply` is the
/// primitive: an implementation must apply every write and removal of one call
/// in a single step so that readers never see half of a session.
pub trait LocalStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `set` and removes `remove` in one step. Absent keys are ignored.
    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StorageError>;

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.apply(entries, &[])
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.apply(&[], keys)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_many(&[(key, value)])
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key])
    }
}

/// StorageState
///
/// The shared handle to whichever storage backs the session.
pub type StorageState = Arc<dyn LocalStorage>;

fn apply_to(entries: &mut Entries, set: &[(&str, &str)], remove: &[&str]) {
    for (key, value) in set {
        entries.insert((*key).to_string(), (*value).to_string());
    }
    for key in remove {
        entries.remove(*key);
    }
}

// 2. The File Implementation
/// FileStorage
///
/// Persists entries as a single JSON object file. Every mutation writes a
/// temporary file next to the target and renames it over the original, so the
/// file on disk is always either the old or the new map.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_vec_pretty(entries).map_err(StorageError::Serialize)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, body)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Io(e));
        }
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        // Corrupt contents are discarded by the next write.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "replacing corrupt storage file");
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(key))
    }

    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StorageError> {
        self.mutate(|map| apply_to(map, set, remove))
    }
}

// 3. The In-Memory Implementation (For Tests)
/// MemoryStorage
///
/// Process-local storage. Used by the test suites and by callers that do not
/// want the session to outlive the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, e.g. `[("token", "abc"), ("user", r#"{"role":"teacher"}"#)]`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        apply_to(&mut entries, set, remove);
        Ok(())
    }
}
