use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use glasshouse_types::models::FileContent;

use crate::FileStore;
use crate::contain::is_within_root;

/// Serves files only from within its root. The root is canonicalized
/// once at construction; every requested path is canonicalized and
/// checked for containment before the read.
pub struct SecureFileRepository {
    root: PathBuf,
}

impl SecureFileRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let root = fs::canonicalize(base_dir)
            .with_context(|| format!("canonicalizing file root {}", base_dir.display()))?;
        Ok(Self { root })
    }
}

impl FileStore for SecureFileRepository {
    fn get_file(&self, filename: &str) -> Option<FileContent> {
        // Canonicalization resolves `..` segments, symlinks, and
        // absolute-path overrides before the containment check runs, so
        // the check sees the path the read would actually touch.
        let resolved = fs::canonicalize(self.root.join(filename)).ok()?;
        if !is_within_root(&self.root, &resolved) {
            warn!("Rejected file request escaping the root: {}", filename);
            return None;
        }

        let content = fs::read_to_string(&resolved).ok()?;
        Some(FileContent {
            filename: filename.to_string(),
            content,
        })
    }
}
