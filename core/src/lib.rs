pub mod config;
pub mod date;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use config::StorePaths;
pub use error::{StoreError, StoreResult};
pub use model::amount::Amount;
pub use model::expense::{ExpenseRecord, MonthlyExpenses, YearMonth};
pub use model::store::{LoadReport, SkippedRecord, StoreData};
pub use model::todo::{TodoCounts, TodoFilter, TodoRecord, TodoSort, TodoStatus, TodoView};
pub use repository::{FileStoreRepository, MirrorSink, PrimaryStore, TextReportWriter};
pub use service::durability::{DurabilityLayer, PersistReport};
pub use service::record_store::{BatchOutcome, Completion, RecordStore};

/// The store as the CLI uses it: JSON primary file plus text report.
pub type FileRecordStore = RecordStore<FileStoreRepository, TextReportWriter>;

/// Opens the file-backed store described by `paths`.
pub fn open_file_store(paths: &StorePaths) -> StoreResult<(FileRecordStore, LoadReport)> {
    RecordStore::open(DurabilityLayer::from_paths(paths))
}
