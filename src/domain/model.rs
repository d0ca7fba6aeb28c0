use crate::domain::ports::Storage;
use crate::utils::error::{ModelError, Result};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Reserved record key naming the variant a record belongs to.
pub const TYPE_TAG: &str = "__class__";
pub const ID_KEY: &str = "id";
pub const CREATED_AT_KEY: &str = "created_at";
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Canonical text form of timestamps. Fixed width, so lexical order is chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const ACCEPTED_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn is_reserved_key(key: &str) -> bool {
    matches!(key, TYPE_TAG | ID_KEY | CREATED_AT_KEY | UPDATED_AT_KEY)
}

pub fn storage_key(type_name: &str, id: &str) -> String {
    format!("{}.{}", type_name, id)
}

/// Flat attribute mapping: the serialized form of a model instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.get_str(TYPE_TAG)
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(data: BTreeMap<String, Value>) -> Self {
        Self { data }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Current UTC time at the precision the canonical text form keeps.
pub fn now() -> NaiveDateTime {
    truncate_to_micros(Utc::now().naive_utc())
}

fn truncate_to_micros(ts: NaiveDateTime) -> NaiveDateTime {
    let nanos = ts.nanosecond() / 1_000 * 1_000;
    ts.with_nanosecond(nanos).unwrap_or(ts)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses the serialized form of a timestamp.
///
/// Accepts the canonical form, the same without fractional seconds, a space
/// instead of `T`, and RFC 3339 text with an offset (converted to UTC).
pub fn parse_timestamp(field: &str, value: &Value) -> Result<NaiveDateTime> {
    let text = value.as_str().ok_or_else(|| ModelError::FormatError {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected a date-time string".to_string(),
    })?;

    let mut last_error = None;
    for format in ACCEPTED_TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(ts) => return Ok(truncate_to_micros(ts)),
            Err(e) => last_error = Some(e),
        }
    }

    DateTime::parse_from_rfc3339(text)
        .map(|ts| truncate_to_micros(ts.with_timezone(&Utc).naive_utc()))
        .map_err(|rfc_error| ModelError::FormatError {
            field: field.to_string(),
            value: text.to_string(),
            reason: last_error.unwrap_or(rfc_error).to_string(),
        })
}

/// State every model variant shares: identity, timestamps and undeclared attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBase {
    id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    extra: Record,
    // Declared fields whose incoming value was set aside in `extra`, with the
    // field value at that moment. A later direct assignment makes the field win.
    shadowed: BTreeMap<String, Value>,
}

impl ModelBase {
    /// New identity, both timestamps set to the same instant.
    pub fn fresh() -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            extra: Record::new(),
            shadowed: BTreeMap::new(),
        }
    }

    /// Reads the reserved keys of `record`. Every other key is left to the variant.
    pub fn from_record(record: &Record) -> Result<Self> {
        let id = match record.get(ID_KEY) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(ModelError::FormatError {
                    field: ID_KEY.to_string(),
                    value: other.to_string(),
                    reason: "expected a string identifier".to_string(),
                })
            }
            None => Uuid::new_v4().to_string(),
        };

        let created_at = record
            .get(CREATED_AT_KEY)
            .map(|value| parse_timestamp(CREATED_AT_KEY, value))
            .transpose()?;
        let updated_at = record
            .get(UPDATED_AT_KEY)
            .map(|value| parse_timestamp(UPDATED_AT_KEY, value))
            .transpose()?;

        let created_at = created_at.or(updated_at).unwrap_or_else(now);
        let updated_at = updated_at.unwrap_or(created_at);

        Ok(Self {
            id,
            created_at,
            updated_at,
            extra: Record::new(),
            shadowed: BTreeMap::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Attributes the variant does not declare, or whose value did not fit the declared type.
    pub fn extra(&self) -> &Record {
        &self.extra
    }

    // Never moves backwards, even if the wall clock does.
    fn touch(&mut self) {
        self.updated_at = now().max(self.updated_at);
    }

    fn shadow(&mut self, key: &str, raw: Value, declared: Value) {
        self.extra.insert(key, raw);
        self.shadowed.insert(key.to_string(), declared);
    }

    fn unshadow(&mut self, key: &str) {
        self.extra.remove(key);
        self.shadowed.remove(key);
    }
}

fn assign_field<M: Model>(model: &mut M, key: &str, value: Value) {
    let Some(rejected) = model.set_field(key, value) else {
        model.base_mut().unshadow(key);
        return;
    };

    match model.declared_fields().remove(key) {
        Some(declared) => {
            tracing::warn!(
                model = M::TYPE_NAME,
                field = %key,
                "Value does not fit the declared field, keeping it as an extra attribute"
            );
            model.base_mut().shadow(key, rejected, declared);
        }
        None => {
            model.base_mut().extra.insert(key, rejected);
        }
    }
}

fn assign_fields<M: Model>(model: &mut M, record: &Record) {
    for (key, value) in record.iter() {
        if !is_reserved_key(key) {
            assign_field(model, key, value.clone());
        }
    }
}

/// A concrete model variant. Usually implemented through [`declare_model!`](crate::declare_model).
pub trait Model: fmt::Debug + Send + Sync + Sized + 'static {
    const TYPE_NAME: &'static str;

    /// Wraps `base` with every declared field at its default.
    fn from_base(base: ModelBase) -> Self;

    fn base(&self) -> &ModelBase;

    fn base_mut(&mut self) -> &mut ModelBase;

    /// Current values of the declared fields.
    fn declared_fields(&self) -> Record;

    /// Stores `value` in the declared field `name`. Hands the value back when
    /// no such field exists or the value does not fit its type.
    fn set_field(&mut self, name: &str, value: Value) -> Option<Value>;

    /// Fresh instance, registered with `storage`.
    fn create(storage: &dyn Storage) -> Result<Self> {
        let model = Self::from_base(ModelBase::fresh());
        storage.register_new(&model)?;
        tracing::debug!(model = Self::TYPE_NAME, id = %model.base().id(), "Created model");
        Ok(model)
    }

    /// Rebuilds an instance from a record. Storage is not notified.
    fn from_record(record: &Record) -> Result<Self> {
        let mut model = Self::from_base(ModelBase::from_record(record)?);

        if let Some(tag) = record.type_tag() {
            if tag != Self::TYPE_NAME {
                tracing::debug!(
                    model = Self::TYPE_NAME,
                    tag,
                    "Record type tag differs from the model being rebuilt"
                );
            }
        }

        assign_fields(&mut model, record);
        Ok(model)
    }

    /// Rebuilds from `fields` when they carry an `id`. Without one the record
    /// describes a new instance: it is created fresh, takes the non-reserved
    /// fields and is registered with `storage`.
    fn construct(fields: Option<&Record>, storage: &dyn Storage) -> Result<Self> {
        match fields {
            Some(record) if record.contains_key(ID_KEY) => Self::from_record(record),
            Some(record) => {
                let mut model = Self::from_base(ModelBase::fresh());
                assign_fields(&mut model, record);
                storage.register_new(&model)?;
                tracing::debug!(model = Self::TYPE_NAME, id = %model.base().id(), "Created model");
                Ok(model)
            }
            None => Self::create(storage),
        }
    }
}

/// Object-safe view over any [`Model`], used wherever the variant is only known at runtime.
pub trait DynModel: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> NaiveDateTime;

    fn updated_at(&self) -> NaiveDateTime;

    /// Every attribute of the instance, timestamps in canonical text form.
    fn attributes(&self) -> Record;

    /// `attributes` plus the type tag.
    fn to_record(&self) -> Record;

    /// Human-readable form for logs and diagnostics.
    fn render(&self) -> String;

    /// Refreshes `updated_at` and asks `storage` to persist everything it tracks.
    fn save(&mut self, storage: &dyn Storage) -> Result<()>;

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    fn storage_key(&self) -> String {
        storage_key(self.type_name(), self.id())
    }

    fn as_any(&self) -> &dyn Any;
}

impl<M: Model> DynModel for M {
    fn type_name(&self) -> &'static str {
        M::TYPE_NAME
    }

    fn id(&self) -> &str {
        self.base().id()
    }

    fn created_at(&self) -> NaiveDateTime {
        self.base().created_at()
    }

    fn updated_at(&self) -> NaiveDateTime {
        self.base().updated_at()
    }

    fn attributes(&self) -> Record {
        let base = self.base();
        let mut record = self.declared_fields();
        for (key, value) in base.extra.iter() {
            if let Some(pinned) = base.shadowed.get(key) {
                // assigned directly since the value was set aside
                if record.get(key) != Some(pinned) {
                    continue;
                }
            }
            record.insert(key.clone(), value.clone());
        }
        record.insert(ID_KEY, base.id.clone());
        record.insert(CREATED_AT_KEY, format_timestamp(&base.created_at));
        record.insert(UPDATED_AT_KEY, format_timestamp(&base.updated_at));
        record
    }

    fn to_record(&self) -> Record {
        let mut record = self.attributes();
        record.insert(TYPE_TAG, M::TYPE_NAME);
        record
    }

    fn render(&self) -> String {
        format!("[{}] ({}) {}", M::TYPE_NAME, self.base().id(), self.attributes())
    }

    fn save(&mut self, storage: &dyn Storage) -> Result<()> {
        self.base_mut().touch();
        storage.update(&*self)?;
        storage.persist_all()?;
        tracing::debug!(model = M::TYPE_NAME, id = %self.base().id(), "Saved model");
        Ok(())
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        if is_reserved_key(name) {
            return Err(ModelError::ReadOnlyAttribute {
                name: name.to_string(),
            });
        }

        assign_field(self, name, value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for dyn DynModel + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
