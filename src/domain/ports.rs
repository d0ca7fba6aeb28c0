use crate::domain::model::DynModel;
use crate::utils::error::Result;

/// The storage collaborator models report to. Handed in explicitly, never reached globally.
pub trait Storage: Send + Sync {
    /// Start tracking a freshly created model. Not a durable write.
    fn register_new(&self, model: &dyn DynModel) -> Result<()>;

    /// Refresh the tracked copy of `model` before a persist.
    fn update(&self, _model: &dyn DynModel) -> Result<()> {
        Ok(())
    }

    /// Durably write every tracked model.
    fn persist_all(&self) -> Result<()>;
}
