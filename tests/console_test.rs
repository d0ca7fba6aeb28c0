#![cfg(feature = "cli")]

use anyhow::Result;
use small_models::app::console::execute;
use small_models::config::Command;
use small_models::{MemoryStorage, ModelError, ModelRegistry, SeedConfig};

fn seeded_storage(registry: &ModelRegistry) -> Result<MemoryStorage> {
    let seed = SeedConfig::from_toml_str(
        r#"
[[records]]
__class__ = "Amenity"
id = "abc-123"
created_at = "2024-01-01T00:00:00"
updated_at = "2024-01-01T00:00:00"
name = "Wifi"
"#,
    )?;
    let storage = MemoryStorage::new();
    storage.load_records(registry, seed.records)?;
    Ok(storage)
}

#[test]
fn test_create_applies_assignments_and_saves() -> Result<()> {
    let registry = ModelRegistry::default();
    let storage = MemoryStorage::new();
    let command = Command::Create {
        type_name: "Amenity".to_string(),
        set: vec!["name=Sauna".to_string(), "floor=2".to_string()],
    };

    let lines = execute(&command, &registry, &storage)?;

    assert_eq!(lines.len(), 2);
    let tracked = storage.get("Amenity", &lines[0])?.unwrap();
    assert_eq!(tracked.get_str("name"), Some("Sauna"));
    assert_eq!(tracked.get("floor"), Some(&serde_json::json!(2)));
    assert!(lines[1].starts_with(&format!("[Amenity] ({})", lines[0])));
    assert!(storage.snapshot()?.is_some());
    Ok(())
}

#[test]
fn test_create_rejects_reserved_and_unknown() -> Result<()> {
    let registry = ModelRegistry::default();
    let storage = MemoryStorage::new();

    let reserved = Command::Create {
        type_name: "Amenity".to_string(),
        set: vec!["id=mine".to_string()],
    };
    assert!(matches!(
        execute(&reserved, &registry, &storage),
        Err(ModelError::ReadOnlyAttribute { .. })
    ));

    let unknown = Command::Create {
        type_name: "Spaceship".to_string(),
        set: vec![],
    };
    assert!(matches!(
        execute(&unknown, &registry, &storage),
        Err(ModelError::UnknownModelType { .. })
    ));
    Ok(())
}

#[test]
fn test_show_found_and_missing() -> Result<()> {
    let registry = ModelRegistry::default();
    let storage = seeded_storage(&registry)?;

    let show = Command::Show {
        type_name: "Amenity".to_string(),
        id: "abc-123".to_string(),
    };
    let lines = execute(&show, &registry, &storage)?;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[Amenity] (abc-123)"));
    assert!(lines[0].contains(r#""name":"Wifi""#));

    let missing = Command::Show {
        type_name: "Amenity".to_string(),
        id: "nope".to_string(),
    };
    let err = execute(&missing, &registry, &storage).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { ref id, .. } if id == "nope"));
    Ok(())
}

#[test]
fn test_all_filters_by_type() -> Result<()> {
    let registry = ModelRegistry::default();
    let storage = seeded_storage(&registry)?;

    let all = execute(&Command::All { type_name: None }, &registry, &storage)?;
    assert_eq!(all.len(), 1);

    let places = execute(
        &Command::All {
            type_name: Some("Place".to_string()),
        },
        &registry,
        &storage,
    )?;
    assert!(places.is_empty());
    Ok(())
}

#[test]
fn test_dump_prints_the_persisted_snapshot() -> Result<()> {
    let registry = ModelRegistry::default();
    let storage = seeded_storage(&registry)?;

    let lines = execute(&Command::Dump, &registry, &storage)?;

    let snapshot: serde_json::Value = serde_json::from_str(&lines[0])?;
    assert_eq!(snapshot["Amenity.abc-123"]["name"], serde_json::json!("Wifi"));
    Ok(())
}
