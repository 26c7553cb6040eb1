mod contain;
mod secure;
mod vulnerable;

pub use contain::is_within_root;
pub use secure::SecureFileRepository;
pub use vulnerable::VulnerableFileRepository;

use glasshouse_types::models::FileContent;

/// File-serving capability. Both repositories resolve a relative name
/// against a base directory and read the file in one scoped
/// open-read-close call; every failure mode (missing file, denied
/// access, rejected path) collapses to `None`.
pub trait FileStore: Send + Sync {
    fn get_file(&self, filename: &str) -> Option<FileContent>;
}
