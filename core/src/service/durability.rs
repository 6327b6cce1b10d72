use tracing::{info, warn};

use crate::config::StorePaths;
use crate::error::StoreResult;
use crate::model::store::{LoadReport, StoreData};
use crate::repository::{FileStoreRepository, MirrorSink, PrimaryStore, TextReportWriter};

/// Result of a successful persist. The primary write always succeeded; the
/// mirror may not have.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub mirror_error: Option<String>,
}

/// Drives the primary store and the mirror, in that order.
pub struct DurabilityLayer<P: PrimaryStore, M: MirrorSink> {
    primary: P,
    mirror: M,
}

impl DurabilityLayer<FileStoreRepository, TextReportWriter> {
    pub fn from_paths(paths: &StorePaths) -> Self {
        Self::new(
            FileStoreRepository::new(&paths.primary),
            TextReportWriter::new(&paths.mirror),
        )
    }
}

impl<P: PrimaryStore, M: MirrorSink> DurabilityLayer<P, M> {
    pub fn new(primary: P, mirror: M) -> Self {
        Self { primary, mirror }
    }

    pub fn load(&self) -> StoreResult<(StoreData, LoadReport)> {
        Ok(self.primary.load()?.unwrap_or_default())
    }

    pub fn persist(&self, data: &StoreData) -> StoreResult<PersistReport> {
        self.primary.save(data)?;
        info!(
            "Persisted {} todo(s) and {} expense(s)",
            data.todos.len(),
            data.expenses.len()
        );
        Ok(PersistReport {
            mirror_error: self.render_mirror(data),
        })
    }

    /// Renders the mirror, logging and returning its failure instead of
    /// propagating it.
    fn render_mirror(&self, data: &StoreData) -> Option<String> {
        match self.mirror.render(data) {
            Ok(()) => None,
            Err(e) => {
                warn!("Mirror render failed: {:#}", e);
                Some(format!("{:#}", e))
            }
        }
    }
}
