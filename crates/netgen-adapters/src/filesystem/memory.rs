//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use netgen_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WriteOutcome},
    },
    error::NetgenResult,
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> NetgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str, overwrite: bool) -> NetgenResult<WriteOutcome> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        let existed = inner.files.contains_key(path);
        if existed && !overwrite {
            return Ok(WriteOutcome::AlreadyExists);
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(if existed {
            WriteOutcome::Replaced
        } else {
            WriteOutcome::Created
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("out/sw1.config"), "x", false).is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        assert_eq!(
            fs.write_file(Path::new("out/sw1.config"), "x", false).unwrap(),
            WriteOutcome::Created
        );
    }

    #[test]
    fn guarded_overwrite() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out")).unwrap();
        let path = Path::new("out/sw1.config");

        fs.write_file(path, "first", false).unwrap();
        assert_eq!(fs.write_file(path, "second", false).unwrap(), WriteOutcome::AlreadyExists);
        assert_eq!(fs.read_file(path).as_deref(), Some("first"));

        assert_eq!(fs.write_file(path, "third", true).unwrap(), WriteOutcome::Replaced);
        assert_eq!(fs.read_file(path).as_deref(), Some("third"));
        assert_eq!(fs.list_files(), vec![PathBuf::from("out/sw1.config")]);
    }
}
