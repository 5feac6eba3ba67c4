//! Upload directory for artifacts awaiting validation.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{EfakturError, Result};
use crate::invoice::polarity::normalize_extension;

/// An artifact stored under a collision-free name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    /// Lowercased extension without the leading dot.
    pub extension: String,
}

/// Directory-backed artifact store.
///
/// Concurrent requests may share one store; every artifact gets its own name.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy a caller's file into the store.
    ///
    /// The extension is taken from the source file name.
    pub fn ingest(&self, source: &Path) -> Result<StoredArtifact> {
        if !source.exists() {
            return Err(EfakturError::NotFound(source.to_path_buf()));
        }

        let extension = source
            .extension()
            .map(|ext| normalize_extension(&ext.to_string_lossy()))
            .unwrap_or_default();

        let artifact = self.allocate(&extension)?;
        std::fs::copy(source, &artifact.path)?;
        debug!("Ingested {} as {}", source.display(), artifact.path.display());
        Ok(artifact)
    }

    /// Write raw bytes into the store.
    pub fn store(&self, data: &[u8], extension: &str) -> Result<StoredArtifact> {
        let artifact = self.allocate(&normalize_extension(extension))?;
        std::fs::write(&artifact.path, data)?;
        debug!("Stored {} bytes as {}", data.len(), artifact.path.display());
        Ok(artifact)
    }

    /// Remove an artifact. A file that is already gone is not an error.
    pub fn discard(&self, artifact: &StoredArtifact) -> Result<()> {
        match std::fs::remove_file(&artifact.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Artifact {} already removed", artifact.path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn allocate(&self, extension: &str) -> Result<StoredArtifact> {
        std::fs::create_dir_all(&self.root)?;
        Ok(StoredArtifact {
            path: self.root.join(artifact_name(extension)),
            extension: extension.to_string(),
        })
    }
}

/// `<unix-millis>-<8 hex chars>.<ext>`, or without the dot for an empty extension.
pub fn artifact_name(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    if extension.is_empty() {
        format!("{}-{}", millis, &suffix[..8])
    } else {
        format!("{}-{}.{}", millis, &suffix[..8], extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_artifact_name_shape() {
        let name = artifact_name("pdf");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        let (millis, suffix) = stem.split_once('-').unwrap();

        assert_eq!(ext, "pdf");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_names_do_not_collide() {
        let names: HashSet<String> = (0..500).map(|_| artifact_name("jpg")).collect();
        assert_eq!(names.len(), 500);
    }

    #[test]
    fn test_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("storages"));

        let artifact = store.store(b"%PDF-1.4", ".PDF").unwrap();

        assert_eq!(artifact.extension, "pdf");
        assert!(artifact.path.starts_with(store.root()));
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_ingest_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Faktur.JPG");
        std::fs::write(&source, b"jpeg bytes").unwrap();
        let store = ArtifactStore::new(dir.path().join("uploads"));

        let artifact = store.ingest(&source).unwrap();
        assert_eq!(artifact.extension, "jpg");
        assert!(artifact.path.exists());
        assert!(source.exists());

        store.discard(&artifact).unwrap();
        assert!(!artifact.path.exists());
        store.discard(&artifact).unwrap();
    }

    #[test]
    fn test_ingest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = store.ingest(&dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, EfakturError::NotFound(_)));
    }
}
