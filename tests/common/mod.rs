#![allow(dead_code)]

use small_models::{DynModel, ModelError, Result, Storage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Storage double that only counts what the models ask of it.
#[derive(Default)]
pub struct RecordingStorage {
    registered: Mutex<Vec<String>>,
    updates: AtomicUsize,
    persists: AtomicUsize,
    fail_persist: bool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_persist: true,
            ..Self::default()
        }
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    pub fn register_count(&self) -> usize {
        self.registered.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

impl Storage for RecordingStorage {
    fn register_new(&self, model: &dyn DynModel) -> Result<()> {
        self.registered.lock().unwrap().push(model.storage_key());
        Ok(())
    }

    fn update(&self, _model: &dyn DynModel) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn persist_all(&self) -> Result<()> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        if self.fail_persist {
            return Err(ModelError::StorageError {
                message: "disk full".to_string(),
            });
        }
        Ok(())
    }
}

small_models::declare_model! {
    /// A variant the library itself knows nothing about.
    pub struct Place {
        pub city_id: String = String::new(),
        pub number_rooms: u32 = 0,
        pub amenity_ids: Vec<String> = Vec::new(),
    }
}
