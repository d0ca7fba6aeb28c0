use crate::domain::model::{Record, TYPE_TAG};
use crate::domain::registry::ModelRegistry;
use crate::utils::error::{ModelError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// 啟動時預先載入的資料與日誌設定
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedConfig {
    pub logging: LoggingConfig,
    pub records: Vec<Record>,
}

// TOML 原生日期時間需先轉成字串，所以紀錄先以 toml::Table 讀入
#[derive(Deserialize)]
struct RawSeedConfig {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    records: Vec<toml::Table>,
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl SeedConfig {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ModelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawSeedConfig = toml::from_str(content).map_err(|e| ModelError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;

        Ok(Self {
            logging: raw.logging,
            records: raw
                .records
                .into_iter()
                .map(|table| {
                    table
                        .into_iter()
                        .map(|(key, value)| (key, toml_to_json(value)))
                        .collect()
                })
                .collect(),
        })
    }

    /// 確認每筆資料的類型都已註冊
    pub fn validate_against(&self, registry: &ModelRegistry) -> Result<()> {
        self.validate()?;
        for (index, record) in self.records.iter().enumerate() {
            let field = format!("records[{}].{}", index, TYPE_TAG);
            validation::validate_known_type(&field, record.type_tag().unwrap_or_default(), registry)?;
        }
        Ok(())
    }
}

impl Validate for SeedConfig {
    fn validate(&self) -> Result<()> {
        for (index, record) in self.records.iter().enumerate() {
            let field = format!("records[{}].{}", index, TYPE_TAG);
            match record.type_tag() {
                Some(tag) => validation::validate_non_empty_string(&field, tag)?,
                None => return Err(ModelError::MissingConfigError { field }),
            }
        }
        Ok(())
    }
}
