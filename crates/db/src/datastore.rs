use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::document::CustomerDocument;
use crate::repositories::RepositoryError;

/// Whole-document access to the JSON file backing the customer store.
///
/// Callers are responsible for serializing read-modify-write cycles; this type only
/// guarantees that a save either replaces the file completely or leaves it untouched.
#[derive(Clone, Debug)]
pub struct JsonDatastore {
    path: PathBuf,
}

impl JsonDatastore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing or blank file is an empty store.
    pub async fn load(&self) -> Result<CustomerDocument, RepositoryError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(
                    event_name = "db.datastore.missing",
                    path = %self.path.display(),
                    "datastore file absent; treating as empty"
                );
                return Ok(CustomerDocument::default());
            }
            Err(source) => {
                return Err(RepositoryError::StorageRead { path: self.path.clone(), source })
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(CustomerDocument::default());
        }

        serde_json::from_slice(&raw)
            .map_err(|source| RepositoryError::Decode { path: self.path.clone(), source })
    }

    /// Writes the full document to a sibling temp file and renames it over the target.
    pub async fn save(&self, document: &CustomerDocument) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec(document)
            .map_err(|source| RepositoryError::Encode { path: self.path.clone(), source })?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| self.write_error(source))?;
        }

        let staging = self.staging_path();
        if let Err(source) = write_and_swap(&staging, &self.path, &payload).await {
            let _ = fs::remove_file(&staging).await;
            return Err(self.write_error(source));
        }

        debug!(
            event_name = "db.datastore.saved",
            path = %self.path.display(),
            records = document.len(),
            "datastore document persisted"
        );
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "datastore".to_string());
        self.path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
    }

    fn write_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::StorageWrite { path: self.path.clone(), source }
    }
}

async fn write_and_swap(staging: &Path, target: &Path, payload: &[u8]) -> std::io::Result<()> {
    fs::write(staging, payload).await?;
    fs::File::open(staging).await?.sync_all().await?;
    fs::rename(staging, target).await
}
