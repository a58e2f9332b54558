use crate::core::Storage;
use crate::utils::error::{PackError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 以 `base_path` 為根目錄的本地檔案存儲
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let unique = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), unique))
}

#[cfg(unix)]
async fn make_world_writable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o666)).await
}

#[cfg(not(unix))]
async fn make_world_writable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl Storage for LocalStorage {
    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    /// 先寫入同目錄的暫存檔再改名覆蓋，讀取方只會看到完整的舊檔或新檔
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.resolve(path);
        let write_error = |source| PackError::WriteError {
            path: full_path.clone(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let temp_path = temp_sibling(&full_path);
        let written = async {
            tokio::fs::write(&temp_path, data).await?;
            make_world_writable(&temp_path).await?;
            tokio::fs::rename(&temp_path, &full_path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(e));
        }

        Ok(full_path)
    }

    async fn modified(&self, path: &str) -> Result<SystemTime> {
        let metadata = tokio::fs::metadata(self.resolve(path)).await?;
        Ok(metadata.modified()?)
    }
}
