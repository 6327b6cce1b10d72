use crate::error::StoreResult;
use crate::model::store::{LoadReport, StoreData};

/// Source of truth, read back on the next start.
pub trait PrimaryStore {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> StoreResult<Option<(StoreData, LoadReport)>>;
    fn save(&self, data: &StoreData) -> StoreResult<()>;
}

/// Write-only rendering for people to read. Never parsed back.
pub trait MirrorSink {
    fn render(&self, data: &StoreData) -> anyhow::Result<()>;
}
