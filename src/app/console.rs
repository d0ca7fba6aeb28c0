use crate::adapters::memory::MemoryStorage;
use crate::config::Command;
use crate::domain::model::DynModel;
use crate::domain::ports::Storage;
use crate::domain::registry::ModelRegistry;
use crate::utils::error::{ModelError, Result};
use crate::utils::validation::parse_assignment;

/// Runs one CLI command against `storage` and returns the lines to print.
pub fn execute(
    command: &Command,
    registry: &ModelRegistry,
    storage: &MemoryStorage,
) -> Result<Vec<String>> {
    match command {
        Command::Create { type_name, set } => {
            let mut model = registry.create(type_name, storage)?;
            for assignment in set {
                let (key, value) = parse_assignment(assignment)?;
                model.set_attribute(&key, value)?;
            }
            model.save(storage)?;
            tracing::info!("✅ Created {}", model.storage_key());
            Ok(vec![model.id().to_string(), model.render()])
        }
        Command::Show { type_name, id } => {
            let record = storage
                .get(type_name, id)?
                .ok_or_else(|| ModelError::NotFound {
                    type_name: type_name.clone(),
                    id: id.clone(),
                })?;
            Ok(vec![registry.reconstruct(&record)?.render()])
        }
        Command::All { type_name } => {
            let mut lines = Vec::new();
            for record in storage.all()?.into_values() {
                if type_name
                    .as_deref()
                    .is_some_and(|wanted| record.type_tag() != Some(wanted))
                {
                    continue;
                }
                lines.push(registry.reconstruct(&record)?.render());
            }
            Ok(lines)
        }
        Command::Dump => {
            storage.persist_all()?;
            Ok(vec![storage.snapshot()?.unwrap_or_default()])
        }
    }
}
