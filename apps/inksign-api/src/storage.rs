//! Disk storage for uploaded PDF bytes
//!
//! Files live flat under one root directory under server-chosen names.
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a concurrent reader sees either the old bytes or the new ones.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store, creating the root directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage name for a new document: the id plus the upload's extension
    pub fn storage_name(id: &str, original_filename: &str) -> String {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "pdf".to_string());
        format!("{}.{}", id, ext)
    }

    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(name)?).await
    }

    /// Replace the file's contents atomically
    pub async fn write_atomic(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.path_for(name)?;
        let temp = self.root.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));

        let result = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp, &target).await
        }
        .await;

        if result.is_err() {
            // Best effort; the original error is what matters
            let _ = fs::remove_file(&temp).await;
        }
        result
    }

    /// Names are generated by the server; anything path-like is refused
    fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        let is_plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && name != "..";
        if !is_plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage name: {}", name),
            ));
        }
        Ok(self.root.join(name))
    }
}
