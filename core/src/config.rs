use std::path::{Path, PathBuf};

pub const STORE_FILE_NAME: &str = "pocketdesk.json";
pub const REPORT_FILE_NAME: &str = "pocketdesk.txt";

/// Locations of the primary store and its human-readable mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub primary: PathBuf,
    pub mirror: PathBuf,
}

impl StorePaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            primary: dir.join(STORE_FILE_NAME),
            mirror: dir.join(REPORT_FILE_NAME),
        }
    }
}

impl Default for StorePaths {
    /// Both files live in the working directory.
    fn default() -> Self {
        Self::in_dir(".")
    }
}
