use crate::domain::amenity::Amenity;
use crate::domain::model::{DynModel, Model, Record};
use crate::domain::ports::Storage;
use crate::utils::error::{ModelError, Result};
use std::collections::BTreeMap;

type Rebuild = fn(&Record) -> Result<Box<dyn DynModel>>;
type Create = fn(&dyn Storage) -> Result<Box<dyn DynModel>>;

#[derive(Clone, Copy)]
struct Constructors {
    rebuild: Rebuild,
    create: Create,
}

fn rebuild<M: Model>(record: &Record) -> Result<Box<dyn DynModel>> {
    Ok(Box::new(M::from_record(record)?))
}

fn create<M: Model>(storage: &dyn Storage) -> Result<Box<dyn DynModel>> {
    Ok(Box::new(M::create(storage)?))
}

/// Resolves the `__class__` tag of a record to the variant that owns it.
#[derive(Clone)]
pub struct ModelRegistry {
    constructors: BTreeMap<&'static str, Constructors>,
}

impl ModelRegistry {
    /// A registry that knows no variants.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.constructors.insert(
            M::TYPE_NAME,
            Constructors {
                rebuild: rebuild::<M>,
                create: create::<M>,
            },
        );
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    fn lookup(&self, type_name: &str) -> Result<Constructors> {
        self.constructors
            .get(type_name)
            .copied()
            .ok_or_else(|| ModelError::UnknownModelType {
                type_name: type_name.to_string(),
            })
    }

    /// Rebuilds whichever variant the record's type tag names.
    pub fn reconstruct(&self, record: &Record) -> Result<Box<dyn DynModel>> {
        let type_name = record.type_tag().ok_or(ModelError::MissingTypeTag)?;
        (self.lookup(type_name)?.rebuild)(record)
    }

    /// Fresh instance of the variant called `type_name`, registered with `storage`.
    pub fn create(&self, type_name: &str, storage: &dyn Storage) -> Result<Box<dyn DynModel>> {
        (self.lookup(type_name)?.create)(storage)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<Amenity>();
        registry
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
