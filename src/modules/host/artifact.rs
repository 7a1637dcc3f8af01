use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::SelfArtifact;

/// A file on disk acting as the single-use entry point
pub struct FileArtifact {
    path: PathBuf,
}

impl FileArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The running binary itself
    pub fn current_executable() -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelfArtifact for FileArtifact {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn is_present(&self) -> bool {
        self.path.is_file()
    }

    fn is_writable(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.is_file() && !meta.permissions().readonly())
            .unwrap_or(false)
    }

    fn delete(&mut self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_artifact_lifecycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inject-admin.trigger");
        fs::write(&path, b"").unwrap();

        let mut artifact = FileArtifact::new(&path);
        assert_eq!(artifact.name(), "inject-admin.trigger");
        assert!(artifact.is_present());
        assert!(artifact.is_writable());

        assert!(artifact.delete());
        assert!(!artifact.is_present());
        assert!(!artifact.is_writable());
        assert!(!artifact.delete());
    }

    #[test]
    fn test_read_only_artifact_is_not_writable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.trigger");
        fs::write(&path, b"").unwrap();

        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let artifact = FileArtifact::new(&path);
        assert!(artifact.is_present());
        assert!(!artifact.is_writable());
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let dir = tempdir().unwrap();
        let artifact = FileArtifact::new(dir.path());
        assert!(!artifact.is_present());
        assert!(!artifact.is_writable());
    }
}
