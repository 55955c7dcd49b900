//! Flat-directory file store.

use crate::error::StorageError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Storage for served files, backed by a single directory.
///
/// Every stored file lives directly under the root; there are no
/// subdirectories. The root is created on open if it does not exist.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens or creates the store at the given directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists stored file names, sorted lexicographically.
    ///
    /// Directories under the root are skipped, as are names that are
    /// not valid UTF-8. Sorting keeps repeated listings of an unchanged
    /// directory byte-identical.
    pub fn list_files(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Writes a file, creating it or replacing its previous content.
    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        let path = self.root.join(name);

        let mut file = File::create(&path).map_err(|e| StorageError::CreateFailed {
            name: name.to_string(),
            source: e,
        })?;
        file.write_all(content)
            .map_err(|e| StorageError::WriteFailed {
                name: name.to_string(),
                source: e,
            })?;

        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    /// Reads a whole file.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_name(name)?;
        Ok(fs::read(self.root.join(name))?)
    }
}

/// Rejects names that could escape the root directory.
///
/// A valid name is a single non-empty path component: no separators,
/// and not the `.` or `..` traversal entries.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StorageError::InvalidFileName(name.to_string()));
    }
    Ok(())
}
