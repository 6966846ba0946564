use horology_core::storage::{SaveStorage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A save slot backed by one file. Writes go through a sibling temp file
/// and a rename, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        }
    }

    fn persist(&mut self, payload: &str) -> Result<(), StorageError> {
        let temp = self.temp_path();
        let write_error = |e: std::io::Error| StorageError::Write(format!("{}: {e}", temp.display()));
        fs::write(&temp, payload).map_err(write_error)?;
        fs::rename(&temp, &self.path).map_err(write_error)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Clear(format!("{}: {e}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "horology_headless_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = make_test_dir("missing");
        let storage = FileStorage::new(dir.join("save.json"));
        assert_eq!(storage.load().unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn persist_replaces_and_leaves_no_temp() {
        let dir = make_test_dir("persist");
        let mut storage = FileStorage::new(dir.join("save.json"));
        storage.persist("first").unwrap();
        storage.persist("second").unwrap();

        assert_eq!(storage.load().unwrap().as_deref(), Some("second"));
        assert!(!dir.join("save.json.tmp").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = make_test_dir("clear");
        let mut storage = FileStorage::new(dir.join("save.json"));
        storage.persist("x").unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
