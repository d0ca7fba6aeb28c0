pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::MemoryStorage;
pub use config::SeedConfig;
pub use domain::amenity::Amenity;
pub use domain::model::{DynModel, Model, ModelBase, Record, TYPE_TAG};
pub use domain::ports::Storage;
pub use domain::registry::ModelRegistry;
pub use utils::error::{ModelError, Result};

#[doc(hidden)]
pub use serde_json as __serde_json;
