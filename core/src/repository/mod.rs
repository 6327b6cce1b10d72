pub mod file;
pub mod report;
pub mod traits;

// Re-export
pub use file::FileStoreRepository;
pub use report::{render_report, TextReportWriter};
pub use traits::{MirrorSink, PrimaryStore};
