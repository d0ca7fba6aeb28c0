mod common;

use anyhow::Result;
use common::{Place, RecordingStorage};
use serde_json::json;
use small_models::{Amenity, DynModel, Model, ModelError, ModelRegistry, Record};

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_reconstruct_dispatches_on_type_tag() -> Result<()> {
    let storage = RecordingStorage::new();
    let mut registry = ModelRegistry::default();
    registry.register::<Place>();

    let mut place = Place::create(&storage)?;
    place.number_rooms = 3;
    let amenity = Amenity::create(&storage)?;

    let rebuilt_place = registry.reconstruct(&place.to_record())?;
    let rebuilt_amenity = registry.reconstruct(&amenity.to_record())?;

    assert_eq!(rebuilt_place.type_name(), "Place");
    assert_eq!(rebuilt_place.as_any().downcast_ref::<Place>(), Some(&place));
    assert_eq!(rebuilt_amenity.as_any().downcast_ref::<Amenity>(), Some(&amenity));
    assert_eq!(storage.register_count(), 2);
    Ok(())
}

#[test]
fn test_unknown_type_tag_is_an_error() {
    let registry = ModelRegistry::default();
    let err = registry
        .reconstruct(&record(json!({ "id": "x", "__class__": "Place" })))
        .unwrap_err();

    assert!(matches!(err, ModelError::UnknownModelType { ref type_name } if type_name == "Place"));
}

#[test]
fn test_reconstruct_propagates_format_errors() {
    let registry = ModelRegistry::default();
    let err = registry
        .reconstruct(&record(json!({
            "id": "x",
            "updated_at": "yesterday",
            "__class__": "Amenity"
        })))
        .unwrap_err();

    assert!(matches!(err, ModelError::FormatError { ref field, .. } if field == "updated_at"));
}

#[test]
fn test_create_by_type_name() -> Result<()> {
    let storage = RecordingStorage::new();
    let registry = ModelRegistry::default();

    let amenity = registry.create("Amenity", &storage)?;

    assert_eq!(amenity.type_name(), "Amenity");
    assert_eq!(storage.registered(), vec![amenity.storage_key()]);
    assert!(matches!(
        registry.create("Place", &storage),
        Err(ModelError::UnknownModelType { .. })
    ));
    Ok(())
}

#[test]
fn test_boxed_model_renders_and_saves() -> Result<()> {
    let storage = RecordingStorage::new();
    let registry = ModelRegistry::default();

    let mut model = registry.create("Amenity", &storage)?;
    model.set_attribute("name", json!("Parking"))?;
    model.save(&storage)?;

    assert_eq!(storage.persist_count(), 1);
    assert!(model.to_string().starts_with("[Amenity] ("));
    assert_eq!(model.to_record().get_str("name"), Some("Parking"));
    Ok(())
}
