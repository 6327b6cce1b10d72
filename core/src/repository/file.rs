use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::store::{LoadReport, RawStoreData, StoreData};
use crate::repository::traits::PrimaryStore;

/// JSON primary store. Writes go to a sibling temp file that is renamed over
/// the target, so an interrupted write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct FileStoreRepository {
    file_path: PathBuf,
}

impl FileStoreRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.file_path.with_extension("json.tmp")
    }

    fn write_atomically(&self, data: &StoreData) -> io::Result<()> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data).map_err(io::Error::other)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&temp_path, &self.file_path)
    }
}

impl PrimaryStore for FileStoreRepository {
    fn load(&self) -> StoreResult<Option<(StoreData, LoadReport)>> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", self.file_path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::LoadFailure {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        let raw: RawStoreData = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            if source.is_io() {
                StoreError::LoadFailure {
                    path: self.file_path.clone(),
                    source: source.into(),
                }
            } else {
                StoreError::CorruptStore {
                    path: self.file_path.clone(),
                    source,
                }
            }
        })?;

        let (data, report) = raw.into_store();
        debug!(
            "Loaded {} todo(s) and {} expense(s) from {}",
            data.todos.len(),
            data.expenses.len(),
            self.file_path.display()
        );
        Ok(Some((data, report)))
    }

    fn save(&self, data: &StoreData) -> StoreResult<()> {
        self.write_atomically(data).map_err(|source| {
            let temp_path = self.temp_path();
            if let Err(e) = fs::remove_file(&temp_path) {
                debug!("Could not remove {}: {}", temp_path.display(), e);
            }
            StoreError::PersistFailure {
                path: self.file_path.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::amount::Amount;
    use crate::model::expense::ExpenseRecord;
    use crate::model::todo::TodoRecord;
    use chrono::NaiveDate;

    fn sample() -> StoreData {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut done = TodoRecord::new("file taxes".to_string(), date);
        done.done = true;
        StoreData {
            todos: vec![TodoRecord::new("buy milk".to_string(), date), done],
            expenses: vec![ExpenseRecord::new("coffee".to_string(), "3.20".parse::<Amount>().unwrap(), date)],
        }
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStoreRepository::new(dir.path().join("store.json"));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStoreRepository::new(dir.path().join("nested").join("store.json"));
        let data = sample();

        repo.save(&data).unwrap();
        let (loaded, report) = repo.load().unwrap().unwrap();

        assert_eq!(loaded, data);
        assert!(report.skipped.is_empty());
        assert!(!repo.temp_path().exists());
    }

    #[test]
    fn test_unparsable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        for content in ["not json", "[1, 2, 3]", "{\"todos\": 5}"] {
            fs::write(&path, content).unwrap();
            let repo = FileStoreRepository::new(&path);
            assert!(matches!(repo.load(), Err(StoreError::CorruptStore { .. })), "{content:?}");
        }
    }

    #[test]
    fn test_unreadable_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::create_dir(&path).unwrap();

        let repo = FileStoreRepository::new(&path);
        assert!(matches!(repo.load(), Err(StoreError::LoadFailure { .. })));
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let repo = FileStoreRepository::new(blocker.join("store.json"));
        assert!(matches!(repo.save(&sample()), Err(StoreError::PersistFailure { .. })));
    }
}
