use crate::domain::model::{storage_key, DynModel, Record};
use crate::domain::ports::Storage;
use crate::domain::registry::ModelRegistry;
use crate::utils::error::{ModelError, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Keeps tracked models as records and "persists" them into an in-memory JSON snapshot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, Record>>,
    snapshot: Mutex<Option<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|e| ModelError::StorageError {
        message: format!("storage lock poisoned: {}", e),
    })
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Result<BTreeMap<String, Record>> {
        Ok(lock(&self.objects)?.clone())
    }

    pub fn get(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
        Ok(lock(&self.objects)?.get(&storage_key(type_name, id)).cloned())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.objects)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(lock(&self.objects)?.is_empty())
    }

    /// JSON written by the last successful `persist_all`.
    pub fn snapshot(&self) -> Result<Option<String>> {
        Ok(lock(&self.snapshot)?.clone())
    }

    /// Tracks already-stored records. Each one is rebuilt through `registry`
    /// first so a corrupt record fails here rather than on first use.
    pub fn load_records<I>(&self, registry: &ModelRegistry, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut loaded = Vec::new();
        for record in records {
            let model = registry.reconstruct(&record)?;
            loaded.push((model.storage_key(), model.to_record()));
        }

        let count = loaded.len();
        lock(&self.objects)?.extend(loaded);
        tracing::info!("📥 Loaded {} records into storage", count);
        Ok(count)
    }

    /// Tracks every record of a snapshot written by `persist_all`, next to what is already tracked.
    pub fn reload(&self, registry: &ModelRegistry, snapshot: &str) -> Result<usize> {
        let records: BTreeMap<String, Record> = serde_json::from_str(snapshot)?;
        self.load_records(registry, records.into_values())
    }
}

impl Storage for MemoryStorage {
    fn register_new(&self, model: &dyn DynModel) -> Result<()> {
        let key = model.storage_key();
        tracing::debug!(key = %key, "Tracking new model");
        lock(&self.objects)?.insert(key, model.to_record());
        Ok(())
    }

    fn update(&self, model: &dyn DynModel) -> Result<()> {
        let key = model.storage_key();
        let mut objects = lock(&self.objects)?;
        match objects.get_mut(&key) {
            Some(record) => *record = model.to_record(),
            None => tracing::debug!(key = %key, "Model is not tracked, skipping update"),
        }
        Ok(())
    }

    fn persist_all(&self) -> Result<()> {
        let objects = lock(&self.objects)?;
        let json = serde_json::to_string_pretty(&*objects)?;
        *lock(&self.snapshot)? = Some(json);
        tracing::debug!("Persisted {} models", objects.len());
        Ok(())
    }
}
