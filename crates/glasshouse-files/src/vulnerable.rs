use std::fs;
use std::path::PathBuf;

use glasshouse_types::models::FileContent;

use crate::FileStore;

/// Serves files by joining the requested name straight onto the base
/// directory. `..` segments are resolved as ordinary navigation when the
/// file is opened, so a request can walk out of the base directory.
/// [`crate::SecureFileRepository`] is the contained counterpart.
pub struct VulnerableFileRepository {
    base_dir: PathBuf,
}

impl VulnerableFileRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl FileStore for VulnerableFileRepository {
    fn get_file(&self, filename: &str) -> Option<FileContent> {
        let path = self.base_dir.join(filename);
        let content = fs::read_to_string(path).ok()?;
        Some(FileContent {
            filename: filename.to_string(),
            content,
        })
    }
}
