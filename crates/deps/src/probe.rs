//! [`IoProbe`] backed by the local file system.

use std::path::Path;

use chrono::{DateTime, Utc};
use wfm_core::CollaboratorError;

use crate::context::IoProbe;

/// Reads file metadata directly; slow or hung mounts block the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl IoProbe for FsProbe {
    fn exists(&self, path: &str) -> Result<bool, CollaboratorError> {
        Ok(Path::new(path).try_exists()?)
    }

    fn size(&self, path: &str) -> Result<u64, CollaboratorError> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn mtime(&self, path: &str) -> Result<DateTime<Utc>, CollaboratorError> {
        Ok(std::fs::metadata(path)?.modified()?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn probes_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();
        let path = file.path().to_str().unwrap();

        assert!(FsProbe.exists(path).unwrap());
        assert_eq!(FsProbe.size(path).unwrap(), 10);
        let age = Utc::now() - FsProbe.mtime(path).unwrap();
        assert!(age < chrono::Duration::minutes(5));
    }

    #[test]
    fn missing_file_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.nc");
        let path = path.to_str().unwrap();
        assert!(!FsProbe.exists(path).unwrap());
        assert!(matches!(FsProbe.size(path), Err(CollaboratorError::Io(_))));
    }
}
