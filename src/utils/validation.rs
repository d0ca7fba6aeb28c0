use crate::domain::registry::ModelRegistry;
use crate::utils::error::{ModelError, Result};
use serde_json::Value;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ModelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ModelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_known_type(field_name: &str, type_name: &str, registry: &ModelRegistry) -> Result<()> {
    if !registry.contains(type_name) {
        return Err(ModelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: type_name.to_string(),
            reason: format!(
                "Unknown model type. Known types: {}",
                registry.type_names().collect::<Vec<_>>().join(", ")
            ),
        });
    }
    Ok(())
}

/// 解析 `key=value` 形式的屬性設定；value 能解析成 JSON 就用 JSON，否則當字串
pub fn parse_assignment(input: &str) -> Result<(String, Value)> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| ModelError::InvalidConfigValueError {
            field: "set".to_string(),
            value: input.to_string(),
            reason: "Expected key=value".to_string(),
        })?;

    let key = key.trim();
    validate_non_empty_string("set", key)?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("seed", "seed.toml").is_ok());
        assert!(validate_path("seed", "").is_err());
        assert!(validate_path("seed", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_known_type() {
        let registry = ModelRegistry::default();
        assert!(validate_known_type("__class__", "Amenity", &registry).is_ok());
        assert!(validate_known_type("__class__", "Spaceship", &registry).is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("name=Wifi").unwrap(),
            ("name".to_string(), json!("Wifi"))
        );
        assert_eq!(
            parse_assignment("rooms=3").unwrap(),
            ("rooms".to_string(), json!(3))
        );
        assert_eq!(
            parse_assignment("motto=a=b").unwrap(),
            ("motto".to_string(), json!("a=b"))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment(" =x").is_err());
    }
}
