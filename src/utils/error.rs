use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid format for `{field}` ({value:?}): {reason}")]
    FormatError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown model type: {type_name}")]
    UnknownModelType { type_name: String },

    #[error("No {type_name} with id {id}")]
    NotFound { type_name: String, id: String },

    #[error("Record has no `__class__` type tag")]
    MissingTypeTag,

    #[error("Attribute `{name}` is read-only")]
    ReadOnlyAttribute { name: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for `{field}` ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ModelError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ModelError::FormatError { field, .. } => {
                format!("Record field `{}` is malformed", field)
            }
            ModelError::UnknownModelType { type_name } => {
                format!("`{}` is not a known model type", type_name)
            }
            ModelError::NotFound { type_name, id } => format!("No {} with id {}", type_name, id),
            ModelError::MissingTypeTag => "Record does not say which model it is".to_string(),
            ModelError::ReadOnlyAttribute { name } => format!("`{}` cannot be changed", name),
            ModelError::IoError(_) | ModelError::ConfigError { .. } => {
                "Could not load the configuration file".to_string()
            }
            ModelError::MissingConfigError { field }
            | ModelError::InvalidConfigValueError { field, .. } => {
                format!("Configuration value `{}` is invalid", field)
            }
            ModelError::StorageError { .. } | ModelError::SerializationError(_) => {
                "Storage failed to persist models".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
