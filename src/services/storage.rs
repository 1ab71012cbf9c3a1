use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use log::{info, warn};

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Gcs(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "Storage I/O error: {}", err),
            StorageError::Gcs(msg) => write!(f, "GCS error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Local document store with an optional GCS mirror. Documents are served
/// from disk; the mirror only exists so links outlive the pod.
pub struct DocumentStore {
    dir: PathBuf,
    bucket: Option<String>,
}

impl DocumentStore {
    pub fn new(dir: PathBuf, bucket: Option<String>) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, bucket })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Uploads a finished document to the configured bucket and returns its
    /// public URL, or `None` when no bucket is configured.
    pub async fn mirror_to_gcs(&self, filename: &str) -> Result<Option<String>, StorageError> {
        let bucket = match &self.bucket {
            Some(bucket) => bucket.clone(),
            None => return Ok(None),
        };

        let bytes = std::fs::read(self.path_for(filename))?;

        let config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| StorageError::Gcs(format!("Failed to create GCS client: {}", e)))?;
        let client = Client::new(config);

        let upload_type = UploadType::Simple(Media::new(filename.to_string()));
        let upload_request = UploadObjectRequest {
            bucket: bucket.clone(),
            ..Default::default()
        };
        client
            .upload_object(&upload_request, bytes, &upload_type)
            .await
            .map_err(|e| StorageError::Gcs(format!("Failed to upload to GCS: {}", e)))?;

        let public_url = format!("https://storage.googleapis.com/{}/{}", bucket, filename);
        info!("Mirrored {} to gs://{}", filename, bucket);
        Ok(Some(public_url))
    }

    /// Deletes generated PDFs older than `max_age` and returns how many were
    /// removed. Non-PDF files in the directory are left alone.
    pub fn sweep(&self, max_age: Duration) -> usize {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Sweep could not read {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .map(|age| age > max_age)
                .unwrap_or(false);
            if expired {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Sweep could not remove {}: {}", path.display(), e),
                }
            }
        }
        if removed > 0 {
            info!("Swept {} expired PDF(s) from {}", removed, self.dir.display());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> DocumentStore {
        let dir = std::env::temp_dir().join(format!("travel-store-test-{}", tag));
        let _ = std::fs::remove_dir_all(&dir);
        DocumentStore::new(dir, None).expect("create store")
    }

    #[test]
    fn new_creates_the_directory() {
        let store = temp_store("create");
        assert!(store.dir().is_dir());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn path_for_joins_under_the_store_dir() {
        let store = temp_store("path");
        assert_eq!(store.path_for("a.pdf"), store.dir().join("a.pdf"));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn sweep_removes_only_expired_pdfs() {
        let store = temp_store("sweep");
        std::fs::write(store.path_for("fresh.pdf"), b"%PDF").unwrap();
        std::fs::write(store.path_for("notes.txt"), b"keep").unwrap();

        // Nothing is older than an hour yet.
        assert_eq!(store.sweep(Duration::from_secs(3600)), 0);
        // With a zero threshold every PDF is expired; the txt file survives.
        assert_eq!(store.sweep(Duration::ZERO), 1);
        assert!(!store.path_for("fresh.pdf").exists());
        assert!(store.path_for("notes.txt").exists());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[actix_web::test]
    async fn mirror_is_a_no_op_without_a_bucket() {
        let store = temp_store("mirror");
        std::fs::write(store.path_for("doc.pdf"), b"%PDF").unwrap();
        let url = store.mirror_to_gcs("doc.pdf").await.expect("no-op mirror");
        assert!(url.is_none());
        let _ = std::fs::remove_dir_all(store.dir());
    }
}
