//! Local filesystem adapter using std::fs and `tempfile`.
//!
//! Every write goes to a temporary file in the target directory first and is
//! then persisted over (or next to) the destination, so readers only ever
//! see the old content or the complete new content.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use netgen_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WriteOutcome},
    },
    error::{NetgenError, NetgenResult},
};

/// Production filesystem implementation.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> NetgenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str, overwrite: bool) -> NetgenResult<WriteOutcome> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut staged =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temporary file"))?;
        staged
            .write_all(content.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write temporary file"))?;
        trace!(temp = %staged.path().display(), "Staged output");

        if overwrite {
            let existed = path.exists();
            staged
                .persist(path)
                .map_err(|e| map_io_error(path, e.error, "replace file"))?;
            return Ok(if existed {
                WriteOutcome::Replaced
            } else {
                WriteOutcome::Created
            });
        }

        // No-clobber persist: the existence check and the rename are one step.
        match staged.persist_noclobber(path) {
            Ok(_) => Ok(WriteOutcome::Created),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(WriteOutcome::AlreadyExists)
            }
            Err(e) => Err(map_io_error(path, e.error, "write file")),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> NetgenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_then_refuses_to_clobber() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sw1.config");
        let fs = LocalFilesystem::new();

        assert_eq!(fs.write_file(&path, "first", false).unwrap(), WriteOutcome::Created);
        assert_eq!(
            fs.write_file(&path, "second", false).unwrap(),
            WriteOutcome::AlreadyExists
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn overwrite_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sw1.config");
        let fs = LocalFilesystem::new();

        fs.write_file(&path, "first", false).unwrap();
        assert_eq!(fs.write_file(&path, "second", true).unwrap(), WriteOutcome::Replaced);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sw1.config");
        let fs = LocalFilesystem::new();

        fs.write_file(&path, "a", false).unwrap();
        fs.write_file(&path, "b", false).unwrap();
        fs.write_file(&path, "c", true).unwrap();

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("sw1.config")]);
    }

    #[test]
    fn missing_parent_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope").join("sw1.config");

        let err = LocalFilesystem::new().write_file(&path, "x", false).unwrap_err();
        assert!(err.is_device_scoped());
    }

    #[test]
    fn create_dir_all_nested() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&dir).unwrap();
        assert!(fs.exists(&dir));
    }
}
